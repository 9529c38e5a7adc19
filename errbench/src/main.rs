//! # errbench
//!
//! Measures what it costs to propagate a recoverable error out of tight
//! loops and deep call chains, for each propagation strategy, across failure
//! rates and thread counts.
//!
//! # Usage
//!
//! ```bash
//! # All strategies, default thread sweep
//! errbench
//!
//! # Selected strategies (aliases accepted)
//! errbench tagged exceptions LEAF
//!
//! # Explicit thread counts, both workloads, JSON lines
//! errbench --threads "1 4 16" --workload all --format json
//!
//! # Config file with debug logging
//! errbench --config config/errbench.toml -v
//! ```

use clap::{Parser, ValueEnum};
use errbench::harness::{WorkloadKind, sweep_strategy};
use errbench::report::{OutputFormat, Reporter};
use errbench::{HarnessError, ThreadSweep};
use errbench_common::config::{BenchConfig, ConfigLoader};
use errbench_strategies::{Strategy, UnknownStrategy, dual_channel};
use std::path::PathBuf;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum WorkloadArg {
    Sqrt,
    Fib,
    All,
}

impl WorkloadArg {
    fn kinds(self) -> &'static [WorkloadKind] {
        match self {
            Self::Sqrt => &[WorkloadKind::Sqrt],
            Self::Fib => &[WorkloadKind::Fib],
            Self::All => &WorkloadKind::ALL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Table,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Table => OutputFormat::Table,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// errbench - error propagation cost benchmark
#[derive(Parser, Debug)]
#[command(name = "errbench")]
#[command(version)]
#[command(about = "Compare the runtime cost of error propagation strategies")]
#[command(long_about = None)]
#[command(after_help = methods_help())]
struct Args {
    /// Strategies to run (default: all). Names: baseline, unwinding,
    /// sum-type, scoped-handler, tagged, dual-channel, boxed.
    #[arg(value_name = "METHOD")]
    methods: Vec<String>,

    /// Thread counts: one integer as a doubling cap, or a
    /// whitespace-separated list used verbatim.
    #[arg(long, value_name = "SPEC")]
    threads: Option<String>,

    /// Workload to sweep.
    #[arg(long, value_enum, default_value_t = WorkloadArg::Sqrt)]
    workload: WorkloadArg,

    /// Result output format.
    #[arg(long, value_enum, default_value_t = FormatArg::Table)]
    format: FormatArg,

    /// Pin worker i to CPU i mod ncpu.
    #[arg(long)]
    pin: bool,

    /// Path to a TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    log_json: bool,
}

fn main() {
    let args = Args::parse();

    let strategies = match resolve_methods(&args.methods) {
        Ok(s) => s,
        Err(e) => {
            println!("{e}");
            std::process::exit(1);
        }
    };

    let config = load_config(&args);
    let level = match &config {
        _ if args.verbose => Level::DEBUG,
        Ok(c) => c.log_level.into(),
        Err(_) => Level::INFO,
    };
    setup_tracing(level, args.log_json);

    if let Err(e) = config.and_then(|c| run(&args, &strategies, &c)) {
        error!("FATAL: {}", e);
        std::process::exit(1);
    }
}

/// Strategy table shown after the option list.
fn methods_help() -> String {
    let mut help = String::from("Methods:");
    for s in Strategy::ALL {
        help.push_str(&format!("\n  {:<16}{}", s.name(), s.description()));
        if !s.aliases().is_empty() {
            help.push_str(&format!(" (aliases: {})", s.aliases().join(", ")));
        }
    }
    help
}

/// Map positional names to strategies; no names selects all of them.
fn resolve_methods(names: &[String]) -> Result<Vec<Strategy>, UnknownStrategy> {
    if names.is_empty() {
        return Ok(Strategy::ALL.to_vec());
    }
    names.iter().map(|n| n.parse()).collect()
}

fn load_config(args: &Args) -> Result<BenchConfig, HarnessError> {
    let config = match &args.config {
        Some(path) => BenchConfig::load(path)?,
        None => BenchConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn run(args: &Args, strategies: &[Strategy], config: &BenchConfig) -> Result<(), HarnessError> {
    info!("errbench v{} starting", env!("CARGO_PKG_VERSION"));

    let sweep = match &args.threads {
        Some(spec) => ThreadSweep::parse(spec)?,
        None => ThreadSweep::default_for(num_cpus::get()),
    };
    debug!(threads = %sweep, rates = ?config.failure_rates, "sweep configured");

    if strategies.contains(&Strategy::DualChannel) && !dual_channel::NATIVE {
        warn!("no carry-flag routine for this target, dual-channel runs the tagged strategy");
    }

    let kinds = args.workload.kinds();
    let label_workload = kinds.len() > 1;
    let mut reporter = Reporter::new(std::io::stdout().lock(), args.format.into());
    for &kind in kinds {
        for &strategy in strategies {
            sweep_strategy(
                &mut reporter,
                strategy,
                kind,
                label_workload,
                config,
                &sweep,
                args.pin,
            )?;
        }
    }

    info!("errbench finished");
    Ok(())
}

/// Setup tracing subscriber; logs go to stderr, results to stdout.
fn setup_tracing(level: Level, json: bool) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}

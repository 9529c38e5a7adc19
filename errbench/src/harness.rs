//! Benchmark execution.
//!
//! [`do_test`] runs one worker's full outer loop for one strategy and
//! workload and times it. [`run_multithreaded`] runs one worker per thread,
//! each with its own PRNG seeded by its index, and keeps only the slowest
//! worker's time. The shared state between workers is limited to three
//! atomics: the maximum elapsed time, the failure sum and the consistency
//! flag.

use std::hint::black_box;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use errbench_common::config::{BenchConfig, WorkloadConfig};
use errbench_common::rng::XorShift64Star;
use errbench_strategies::{Strategy, Workload};
use tracing::{debug, warn};

use crate::affinity;
use crate::error::HarnessError;
use crate::report::{Reporter, RunRecord};
use crate::sweep::ThreadSweep;

/// Which workload a run exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkloadKind {
    /// Array square-root transform; faults poison one element.
    Sqrt,
    /// Depth-bounded Fibonacci; faults shorten the budget.
    Fib,
}

impl WorkloadKind {
    /// Both workloads, in report order.
    pub const ALL: [WorkloadKind; 2] = [WorkloadKind::Sqrt, WorkloadKind::Fib];

    /// Short name used in reports.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sqrt => "sqrt",
            Self::Fib => "fib",
        }
    }
}

/// Result of one worker's run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestOutcome {
    /// Wall time of the outer loop.
    pub elapsed: Duration,
    /// Failed invocations reported by the strategy.
    pub failures: u64,
    /// Whether the failure accounting was possible for this run.
    pub consistent: bool,
}

/// Aggregate over all workers of one configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Slowest worker's elapsed time. Never zero.
    pub max_elapsed: Duration,
    /// Sum of all workers' failures.
    pub failures: u64,
    /// False if any worker was inconsistent.
    pub consistent: bool,
}

/// Failure rates a strategy is swept at.
///
/// A fail-fast strategy aborts on the first fault, so it only runs at 0.
pub fn failure_rates_for(strategy: Strategy, configured: &[u32]) -> Vec<u32> {
    if strategy.is_fail_fast() {
        vec![0]
    } else {
        configured.to_vec()
    }
}

/// Run one worker's outer loop with the PRNG seeded from `seed`.
///
/// `config.error_rate` must be 0 for a fail-fast strategy.
pub fn do_test(
    strategy: Strategy,
    kind: WorkloadKind,
    config: &WorkloadConfig,
    seed: u64,
) -> TestOutcome {
    debug_assert!(!strategy.is_fail_fast() || config.error_rate == 0);
    let mut rng = XorShift64Star::new(seed);
    match kind {
        WorkloadKind::Sqrt => sqrt_loop(strategy, config, &mut rng),
        WorkloadKind::Fib => fib_loop(strategy, config, &mut rng),
    }
}

fn sqrt_loop(strategy: Strategy, config: &WorkloadConfig, rng: &mut XorShift64Star) -> TestOutcome {
    let mut values = vec![1.0f64; config.values_len];
    let poison = config.poison_index;
    let mut failures = 0u64;

    let start = Instant::now();
    for _ in 0..config.repeat {
        if rng.chance_permille(config.error_rate) {
            values[poison] = -1.0;
        }
        let mut workload = Workload::Sqrt {
            values: &mut values,
        };
        failures += u64::from(strategy.run(&mut workload, config.inner_repeat));
        values[poison] = 1.0;
    }
    let elapsed = start.elapsed();

    let bound = u64::from(config.inner_repeat) * u64::from(config.repeat);
    TestOutcome {
        elapsed,
        failures,
        consistent: failures <= bound,
    }
}

fn fib_loop(strategy: Strategy, config: &WorkloadConfig, rng: &mut XorShift64Star) -> TestOutcome {
    let expected = config.fib_expected();
    let success_budget = config.fib_success_budget();
    let failure_budget = config.fib_failure_budget();
    let mut failures = 0u64;
    let mut unexpected = 0u64;

    let start = Instant::now();
    for _ in 0..config.repeat {
        let budget = if rng.chance_permille(config.error_rate) {
            failure_budget
        } else {
            success_budget
        };
        match strategy.fib(black_box(config.fib_depth), budget) {
            0 => failures += 1,
            v if v == expected => {}
            _ => unexpected += 1,
        }
    }
    let elapsed = start.elapsed();

    TestOutcome {
        elapsed,
        failures,
        consistent: unexpected == 0 && failures <= u64::from(config.repeat),
    }
}

/// `do_test`, reporting an inconsistent run on stderr.
fn run_worker(
    strategy: Strategy,
    kind: WorkloadKind,
    config: &WorkloadConfig,
    seed: u64,
) -> TestOutcome {
    let outcome = do_test(strategy, kind, config, seed);
    if !outcome.consistent {
        eprintln!("invalid result!");
        warn!(
            strategy = strategy.name(),
            workload = kind.name(),
            rate = config.error_rate,
            seed,
            failures = outcome.failures,
            "invalid result!"
        );
    }
    outcome
}

fn duration_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX).max(1)
}

/// Raise `max` to `candidate` unless it already holds a larger value.
pub fn record_max(max: &AtomicU64, candidate: u64) {
    let mut current = max.load(Ordering::Relaxed);
    while candidate > current {
        match max.compare_exchange_weak(current, candidate, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => break,
            Err(actual) => current = actual,
        }
    }
}

/// Run `threads` workers concurrently and aggregate their outcomes.
///
/// With one thread (or zero) the worker runs on the calling thread with
/// seed 0. Otherwise worker *i* gets seed *i* and, when `pin` is set, is
/// pinned to CPU *i mod ncpu*. Blocks until every worker has finished.
///
/// # Errors
///
/// Returns `HarnessError::Affinity` if pinning fails and
/// `HarnessError::WorkerPanicked` if a worker panics.
pub fn run_multithreaded(
    strategy: Strategy,
    kind: WorkloadKind,
    config: &WorkloadConfig,
    threads: usize,
    pin: bool,
) -> Result<RunSummary, HarnessError> {
    if threads <= 1 {
        let outcome = run_worker(strategy, kind, config, 0);
        return Ok(RunSummary {
            max_elapsed: Duration::from_nanos(duration_nanos(outcome.elapsed)),
            failures: outcome.failures,
            consistent: outcome.consistent,
        });
    }

    let max_nanos = AtomicU64::new(0);
    let failures = AtomicU64::new(0);
    let consistent = AtomicBool::new(true);
    let cpus = num_cpus::get();
    let config = *config;

    thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|worker| {
                let (max_nanos, failures, consistent) = (&max_nanos, &failures, &consistent);
                s.spawn(move || -> Result<(), HarnessError> {
                    if pin {
                        affinity::pin_current_thread(
                            worker,
                            affinity::cpu_for_worker(worker, cpus),
                        )?;
                    }
                    let outcome = run_worker(strategy, kind, &config, worker as u64);
                    record_max(max_nanos, duration_nanos(outcome.elapsed));
                    failures.fetch_add(outcome.failures, Ordering::Relaxed);
                    if !outcome.consistent {
                        consistent.store(false, Ordering::Relaxed);
                    }
                    Ok(())
                })
            })
            .collect();

        let mut first_error = None;
        for (worker, handle) in handles.into_iter().enumerate() {
            let joined = handle
                .join()
                .map_err(|_| HarnessError::WorkerPanicked(worker))
                .and_then(|r| r);
            if let Err(e) = joined {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    })?;

    let summary = RunSummary {
        max_elapsed: Duration::from_nanos(max_nanos.into_inner()),
        failures: failures.into_inner(),
        consistent: consistent.into_inner(),
    };
    debug!(
        strategy = strategy.name(),
        workload = kind.name(),
        rate = config.error_rate,
        threads,
        elapsed_us = summary.max_elapsed.as_micros() as u64,
        failures = summary.failures,
        "run complete"
    );
    Ok(summary)
}

/// Measure `strategy` on `kind` at every rate and thread count.
///
/// Writes the banner, one measurement per (rate, thread count), and closes
/// each rate's row. `label_workload` adds the workload to the banner.
///
/// # Errors
///
/// Propagates run and output errors.
pub fn sweep_strategy<W: Write>(
    reporter: &mut Reporter<W>,
    strategy: Strategy,
    kind: WorkloadKind,
    label_workload: bool,
    config: &BenchConfig,
    sweep: &ThreadSweep,
    pin: bool,
) -> Result<(), HarnessError> {
    let label = label_workload.then(|| kind.name());
    reporter.begin_strategy(strategy.name(), label, sweep)?;
    for rate in failure_rates_for(strategy, &config.failure_rates) {
        let workload = config.workload.with_error_rate(rate);
        for &threads in sweep.counts() {
            let summary = run_multithreaded(strategy, kind, &workload, threads, pin)?;
            reporter.record(&RunRecord {
                strategy: strategy.name(),
                workload: kind.name(),
                error_rate_permille: rate,
                thread_count: threads,
                elapsed_millis: summary.max_elapsed.as_secs_f64() * 1000.0,
                failures: summary.failures,
            })?;
        }
        reporter.end_rate(rate)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(rate: u32) -> WorkloadConfig {
        WorkloadConfig {
            repeat: 200,
            ..WorkloadConfig::default()
        }
        .with_error_rate(rate)
    }

    #[test]
    fn record_max_keeps_largest() {
        let max = AtomicU64::new(0);
        record_max(&max, 5);
        record_max(&max, 3);
        assert_eq!(max.load(Ordering::Relaxed), 5);
        record_max(&max, 9);
        assert_eq!(max.load(Ordering::Relaxed), 9);
    }

    #[test]
    fn baseline_swept_at_zero_only() {
        assert_eq!(failure_rates_for(Strategy::Baseline, &[0, 1, 10]), vec![0]);
        assert_eq!(failure_rates_for(Strategy::Tagged, &[0, 1, 10]), vec![0, 1, 10]);
    }

    #[test]
    fn zero_rate_has_no_failures() {
        for kind in WorkloadKind::ALL {
            let outcome = do_test(Strategy::Baseline, kind, &small(0), 0);
            assert_eq!(outcome.failures, 0);
            assert!(outcome.consistent);
        }
    }

    #[test]
    fn certain_injection_fails_every_call() {
        let config = small(1000);
        let sqrt = do_test(Strategy::SumType, WorkloadKind::Sqrt, &config, 1);
        assert_eq!(sqrt.failures, 200 * u64::from(config.inner_repeat));
        assert!(sqrt.consistent);
        let fib = do_test(Strategy::SumType, WorkloadKind::Fib, &config, 1);
        assert_eq!(fib.failures, 200);
        assert!(fib.consistent);
    }

    #[test]
    fn single_thread_runs_inline_with_seed_zero() {
        let config = small(100);
        let inline = run_multithreaded(Strategy::Tagged, WorkloadKind::Sqrt, &config, 1, false)
            .unwrap();
        let direct = do_test(Strategy::Tagged, WorkloadKind::Sqrt, &config, 0);
        assert_eq!(inline.failures, direct.failures);
        assert!(inline.max_elapsed > Duration::ZERO);
    }

    #[test]
    fn workers_sum_failures_of_their_seeds() {
        let config = small(100);
        let summary =
            run_multithreaded(Strategy::Boxed, WorkloadKind::Fib, &config, 3, false).unwrap();
        let expected: u64 = (0..3)
            .map(|seed| do_test(Strategy::Boxed, WorkloadKind::Fib, &config, seed).failures)
            .sum();
        assert_eq!(summary.failures, expected);
        assert!(summary.consistent);
        assert!(summary.max_elapsed > Duration::ZERO);
    }

    #[test]
    fn more_threads_never_report_fewer_failures() {
        let config = small(100);
        let mut previous = 0;
        for threads in 1..=4 {
            let summary =
                run_multithreaded(Strategy::Tagged, WorkloadKind::Sqrt, &config, threads, false)
                    .unwrap();
            assert!(summary.failures >= previous, "{threads} threads");
            previous = summary.failures;
        }
    }

    #[test]
    fn sweep_writes_one_row_per_rate() {
        let config = BenchConfig {
            failure_rates: vec![0, 10],
            workload: WorkloadConfig {
                repeat: 20,
                ..WorkloadConfig::default()
            },
            ..BenchConfig::default()
        };
        let sweep = ThreadSweep::parse("1 2").unwrap();
        let mut reporter = Reporter::new(Vec::new(), crate::report::OutputFormat::Table);
        sweep_strategy(
            &mut reporter,
            Strategy::SumType,
            WorkloadKind::Fib,
            true,
            &config,
            &sweep,
            false,
        )
        .unwrap();
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "testing sum-type (fib) using 1 2 threads");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("failure rate 0%: "));
        assert!(lines[2].starts_with("failure rate 1%: "));
        assert_eq!(lines[2].split_whitespace().count(), 5);
    }

    #[test]
    fn baseline_sweep_has_single_row() {
        let config = BenchConfig {
            workload: WorkloadConfig {
                repeat: 20,
                ..WorkloadConfig::default()
            },
            ..BenchConfig::default()
        };
        let sweep = ThreadSweep::doubling(1);
        let mut reporter = Reporter::new(Vec::new(), crate::report::OutputFormat::Table);
        sweep_strategy(
            &mut reporter,
            Strategy::Baseline,
            WorkloadKind::Sqrt,
            false,
            &config,
            &sweep,
            false,
        )
        .unwrap();
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(text.lines().count(), 2);
    }
}

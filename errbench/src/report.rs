//! Report rendering.
//!
//! The table format prints, per strategy, a banner naming the sweep and one
//! row per failure rate with the worst-case milliseconds at each thread
//! count. The JSON format prints one [`RunRecord`] per line.

use std::io::Write;

use serde::Serialize;

use crate::error::HarnessError;
use crate::sweep::ThreadSweep;

/// Output format of the result stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable table.
    #[default]
    Table,
    /// One JSON object per line.
    Json,
}

/// One measured configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRecord {
    pub strategy: &'static str,
    pub workload: &'static str,
    pub error_rate_permille: u32,
    pub thread_count: usize,
    pub elapsed_millis: f64,
    pub failures: u64,
}

/// Permille rate as a percentage in shortest form: 0, 0.1, 1, 10, 2.5.
pub fn format_rate(permille: u32) -> String {
    let whole = permille / 10;
    match permille % 10 {
        0 => whole.to_string(),
        tenth => format!("{whole}.{tenth}"),
    }
}

/// `testing <name> using <counts> threads`, with the workload in
/// parentheses when several workloads are swept.
pub fn banner(strategy: &str, workload: Option<&str>, sweep: &ThreadSweep) -> String {
    match workload {
        Some(w) => format!("testing {strategy} ({w}) using {sweep} threads"),
        None => format!("testing {strategy} using {sweep} threads"),
    }
}

/// Smallest elapsed time a table cell shows, in milliseconds.
pub const MIN_CELL_MILLIS: f64 = 0.001;

/// `failure rate <pct>%: <d1> <d2> ...`, milliseconds with three decimals.
///
/// Cells never print as zero: anything below [`MIN_CELL_MILLIS`] shows as
/// that floor.
pub fn rate_row(permille: u32, millis: &[f64]) -> String {
    let mut row = format!("failure rate {}%:", format_rate(permille));
    for ms in millis {
        row.push_str(&format!(" {:.3}", ms.max(MIN_CELL_MILLIS)));
    }
    row
}

/// Writes records to an output stream in the selected format.
pub struct Reporter<W: Write> {
    out: W,
    format: OutputFormat,
    pending: Vec<f64>,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            pending: Vec::new(),
        }
    }

    /// Start a strategy's section.
    pub fn begin_strategy(
        &mut self,
        strategy: &str,
        workload: Option<&str>,
        sweep: &ThreadSweep,
    ) -> Result<(), HarnessError> {
        if self.format == OutputFormat::Table {
            writeln!(self.out, "{}", banner(strategy, workload, sweep))?;
        }
        Ok(())
    }

    /// Add one measurement to the current row.
    pub fn record(&mut self, record: &RunRecord) -> Result<(), HarnessError> {
        match self.format {
            OutputFormat::Table => self.pending.push(record.elapsed_millis),
            OutputFormat::Json => {
                writeln!(self.out, "{}", serde_json::to_string(record)?)?;
            }
        }
        Ok(())
    }

    /// Close the row for `permille`.
    pub fn end_rate(&mut self, permille: u32) -> Result<(), HarnessError> {
        if self.format == OutputFormat::Table {
            writeln!(self.out, "{}", rate_row(permille, &self.pending))?;
        }
        self.pending.clear();
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ms: f64) -> RunRecord {
        RunRecord {
            strategy: "tagged",
            workload: "sqrt",
            error_rate_permille: 10,
            thread_count: 2,
            elapsed_millis: ms,
            failures: 40,
        }
    }

    #[test]
    fn rates_print_in_shortest_form() {
        assert_eq!(format_rate(0), "0");
        assert_eq!(format_rate(1), "0.1");
        assert_eq!(format_rate(10), "1");
        assert_eq!(format_rate(100), "10");
        assert_eq!(format_rate(25), "2.5");
    }

    #[test]
    fn banner_lists_thread_counts() {
        let sweep = ThreadSweep::doubling(4);
        assert_eq!(banner("boxed", None, &sweep), "testing boxed using 1 2 4 threads");
        assert_eq!(
            banner("boxed", Some("fib"), &sweep),
            "testing boxed (fib) using 1 2 4 threads"
        );
    }

    #[test]
    fn table_output() {
        let mut reporter = Reporter::new(Vec::new(), OutputFormat::Table);
        let sweep = ThreadSweep::doubling(2);
        reporter.begin_strategy("tagged", None, &sweep).unwrap();
        reporter.record(&record(12.346)).unwrap();
        reporter.record(&record(13.0)).unwrap();
        reporter.end_rate(1).unwrap();
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(
            text,
            "testing tagged using 1 2 threads\nfailure rate 0.1%: 12.346 13.000\n"
        );
    }

    #[test]
    fn short_runs_never_print_zero() {
        assert_eq!(rate_row(0, &[0.004]), "failure rate 0%: 0.004");
        assert_eq!(rate_row(0, &[0.000_001]), "failure rate 0%: 0.001");
        assert_eq!(rate_row(10, &[0.0004, 2.5]), "failure rate 1%: 0.001 2.500");
    }

    #[test]
    fn json_output_is_one_record_per_line() {
        let mut reporter = Reporter::new(Vec::new(), OutputFormat::Json);
        let sweep = ThreadSweep::doubling(1);
        reporter.begin_strategy("tagged", None, &sweep).unwrap();
        reporter.record(&record(1.5)).unwrap();
        reporter.end_rate(10).unwrap();
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 1);
        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["strategy"], "tagged");
        assert_eq!(value["error_rate_permille"], 10);
        assert_eq!(value["elapsed_millis"], 1.5);
    }
}

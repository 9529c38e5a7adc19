//! errbench Harness
//!
//! Drives the propagation strategies concurrently under deterministic fault
//! injection and reports the worst-case elapsed time per configuration.
//!
//! # Module Structure
//!
//! - [`harness`] - Single-worker runs and the multithreaded aggregator
//! - [`sweep`] - Thread-count sweeps
//! - [`report`] - Table and JSON rendering of run records
//! - [`affinity`] - Optional worker-to-CPU pinning
//! - [`error`] - Harness error type

pub mod affinity;
pub mod error;
pub mod harness;
pub mod report;
pub mod sweep;

pub use error::HarnessError;
pub use harness::{RunSummary, TestOutcome, WorkloadKind};
pub use report::{OutputFormat, RunRecord};
pub use sweep::ThreadSweep;

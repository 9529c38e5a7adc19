//! errbench Strategies
//!
//! The two synthetic workloads, implemented once per error propagation
//! strategy, behind one closed [`Strategy`] enum.
//!
//! Every strategy module exposes the same pair of entry points:
//!
//! - `sqrt(values, repeat) -> u32`: square-root the buffer in place
//!   `repeat` times, returning how many passes hit a negative value.
//! - `fib(n, budget) -> u32`: naive recursive Fibonacci with a depth
//!   budget, returning the value or 0 when the budget ran out.
//!
//! Strategies differ only in how the failure travels back to the entry
//! point. For the same inputs they return the same counts.
//!
//! # Module Structure
//!
//! - [`workload`] - Workload descriptions handed to [`Strategy::run`]
//! - [`strategy`] - The closed strategy set and its dispatch
//! - [`baseline`] - No error handling; faults abort the process
//! - [`unwinding`] - Panic-carried marker caught at the entry point
//! - [`sum_type`] - `Result` checked and forwarded by every frame
//! - [`scoped`] - Error ids propagated with `?`, handled once in a scope
//! - [`tagged`] - The two-word tagged encoding with `try_value!`
//! - [`dual_channel`] - Failure signalled in the carry flag
//! - [`boxed`] - `Result` with a boxed trait-object error
//!
//! # Usage
//!
//! ```rust
//! use errbench_strategies::{Strategy, Workload};
//!
//! let mut values = [1.0f64; 100];
//! values[10] = -1.0;
//! let mut workload = Workload::Sqrt { values: &mut values };
//! assert_eq!(Strategy::Tagged.run(&mut workload, 10), 10);
//! assert_eq!(Strategy::Boxed.fib(15, 16), 610);
//! ```

pub mod baseline;
pub mod boxed;
pub mod dual_channel;
pub mod scoped;
pub mod strategy;
pub mod sum_type;
pub mod tagged;
pub mod unwinding;
pub mod workload;

pub use strategy::{Strategy, UnknownStrategy};
pub use workload::Workload;

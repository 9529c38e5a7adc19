//! errbench Common Library
//!
//! Shared building blocks for measuring what error propagation costs:
//! the single domain error, the error code model, the tagged result
//! encoding every non-baseline strategy is built on, the deterministic
//! fault-injection PRNG, and the configuration types.
//!
//! # Module Structure
//!
//! - [`error`] - The domain error kind
//! - [`tagged`] - Compact value/error encoding with a reserved tag bit
//! - [`rng`] - Deterministic xorshift generator for fault injection
//! - [`config`] - Workload configuration and TOML loading
//! - [`consts`] - Workspace-wide defaults
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use errbench_common::prelude::*;
//!
//! fn checked_sqrt(v: f64) -> Tagged<f64> {
//!     if v < 0.0 {
//!         return Tagged::<f64>::failure(ErrorKind::OutOfDomain.into());
//!     }
//!     Tagged::<f64>::success(v.sqrt())
//! }
//!
//! fn hypot(a: f64, b: f64) -> Tagged<f64> {
//!     let s = errbench_common::try_value!(checked_sqrt(a * a + b * b));
//!     Tagged::<f64>::success(s)
//! }
//!
//! assert_eq!(*hypot(3.0, 4.0).value(), 5.0);
//! ```

pub mod config;
pub mod consts;
pub mod error;
pub mod prelude;
pub mod rng;
pub mod tagged;

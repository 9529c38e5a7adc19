//! The domain error kind.
//!
//! Every workload in the benchmark fails the same way: a value falls outside
//! the domain of the operation (a negative square-root input, or a recursion
//! that ran out of depth budget). One zero-payload kind covers all of it, so
//! strategies differ only in how they carry the failure, never in what they
//! carry.

use thiserror::Error;

/// The single recoverable failure of the benchmark workloads.
///
/// Zero-sized: carrying it costs nothing beyond the discriminant of whatever
/// encoding wraps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ErrorKind {
    /// Negative input to square root, or an exhausted depth budget.
    #[error("value out of domain")]
    OutOfDomain,
}

static_assertions::assert_eq_size!(ErrorKind, ());

//! Common re-exports.

pub use crate::config::{BenchConfig, ConfigError, ConfigLoader, LogLevel, WorkloadConfig};
pub use crate::consts::*;
pub use crate::error::ErrorKind;
pub use crate::rng::XorShift64Star;
pub use crate::tagged::{
    Encode, ErrorCategory, ErrorCode, ErrorReturn, GENERIC_CATEGORY, InlineResult, Outcome,
    SlotResult, Tagged, VariantResult, throw_value,
};

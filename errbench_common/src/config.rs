//! Configuration loading traits and types.
//!
//! This module provides the workload parameters shared by the strategies and
//! the harness, plus a standardized way to load them from a TOML file.
//!
//! # Usage
//!
//! ```rust,no_run
//! use errbench_common::config::{BenchConfig, ConfigError, ConfigLoader};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = BenchConfig::load(Path::new("errbench.toml"))?;
//!     config.validate()?;
//!     println!("repeat: {}", config.workload.repeat);
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::consts::{
    DEFAULT_FAILURE_RATES, DEFAULT_FIB_DEPTH, DEFAULT_INNER_REPEAT, DEFAULT_POISON_INDEX,
    DEFAULT_REPEAT, DEFAULT_VALUES_LEN, MAX_FIB_DEPTH, PERMILLE,
};

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, detailed tracing information.
    Trace,
    /// Debug information useful during development.
    Debug,
    /// General information about application operation.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Parameters of one measurement.
///
/// `error_rate` drives a single probabilistic fault injection per outer
/// iteration; it is set per sweep row rather than read from the file.
///
/// # TOML Example
///
/// ```toml
/// [workload]
/// repeat = 10000
/// inner_repeat = 10
/// values_len = 100
/// poison_index = 10
/// fib_depth = 15
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadConfig {
    /// Injection probability in parts per thousand.
    #[serde(skip)]
    pub error_rate: u32,
    /// Outer iterations per worker.
    pub repeat: u32,
    /// Passes over the buffer per array-transform call.
    pub inner_repeat: u32,
    /// Number of values in the array-transform buffer.
    pub values_len: usize,
    /// Slot poisoned with `-1.0` on injection.
    pub poison_index: usize,
    /// Fibonacci argument of the recursive workload.
    pub fib_depth: u32,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            error_rate: 0,
            repeat: DEFAULT_REPEAT,
            inner_repeat: DEFAULT_INNER_REPEAT,
            values_len: DEFAULT_VALUES_LEN,
            poison_index: DEFAULT_POISON_INDEX,
            fib_depth: DEFAULT_FIB_DEPTH,
        }
    }
}

impl WorkloadConfig {
    /// Copy of this configuration with a different injection rate.
    pub const fn with_error_rate(mut self, error_rate: u32) -> Self {
        self.error_rate = error_rate;
        self
    }

    /// Depth budget that lets the recursion reach every base case.
    pub const fn fib_success_budget(&self) -> u32 {
        self.fib_depth.saturating_add(1)
    }

    /// Depth budget injected on a fault; exhausted before any base case.
    pub const fn fib_failure_budget(&self) -> u32 {
        self.fib_depth.saturating_sub(2)
    }

    /// fib(`fib_depth`), computed iteratively with wrapping arithmetic.
    pub const fn fib_expected(&self) -> u32 {
        let (mut a, mut b) = (0u32, 1u32);
        let mut i = 0;
        while i < self.fib_depth {
            let next = a.wrapping_add(b);
            a = b;
            b = next;
            i += 1;
        }
        a
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if:
    /// - `repeat` or `inner_repeat` is zero
    /// - `values_len` is zero, or `poison_index` is out of bounds
    /// - `fib_depth` is below 3 (the failure budget would be zero for
    ///   every call, including the base cases)
    /// - `fib_depth` is above [`MAX_FIB_DEPTH`] (the result overflows `u32`)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repeat == 0 {
            return Err(ConfigError::ValidationError(
                "repeat must be at least 1".to_string(),
            ));
        }
        if self.inner_repeat == 0 {
            return Err(ConfigError::ValidationError(
                "inner_repeat must be at least 1".to_string(),
            ));
        }
        if self.values_len == 0 {
            return Err(ConfigError::ValidationError(
                "values_len cannot be zero".to_string(),
            ));
        }
        if self.poison_index >= self.values_len {
            return Err(ConfigError::ValidationError(format!(
                "poison_index {} out of bounds for {} values",
                self.poison_index, self.values_len
            )));
        }
        if self.fib_depth < 3 {
            return Err(ConfigError::ValidationError(format!(
                "fib_depth {} too small (minimum 3)",
                self.fib_depth
            )));
        }
        if self.fib_depth > MAX_FIB_DEPTH {
            return Err(ConfigError::ValidationError(format!(
                "fib_depth {} too large (maximum {MAX_FIB_DEPTH})",
                self.fib_depth
            )));
        }
        Ok(())
    }
}

/// Top-level benchmark configuration file.
///
/// # TOML Example
///
/// ```toml
/// log_level = "debug"
/// failure_rates = [0, 1, 10, 100]
///
/// [workload]
/// repeat = 2000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Logging verbosity level.
    pub log_level: LogLevel,
    /// Failure rates swept per strategy, in parts per thousand.
    pub failure_rates: Vec<u32>,
    /// Workload parameters.
    pub workload: WorkloadConfig,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            failure_rates: DEFAULT_FAILURE_RATES.to_vec(),
            workload: WorkloadConfig::default(),
        }
    }
}

impl BenchConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `failure_rates` is empty,
    /// contains a rate of 1000 or more, or the workload section is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.failure_rates.is_empty() {
            return Err(ConfigError::ValidationError(
                "failure_rates cannot be empty".to_string(),
            ));
        }
        if let Some(rate) = self.failure_rates.iter().find(|&&r| r >= PERMILLE) {
            return Err(ConfigError::ValidationError(format!(
                "failure rate {rate} out of range (must be below {PERMILLE})"
            )));
        }
        self.workload.validate()
    }
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "loading configuration");

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation: any serde-deserializable struct can be loaded.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

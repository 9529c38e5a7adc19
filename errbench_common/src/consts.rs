//! Workspace-wide constants.
//!
//! Single source of truth for benchmark defaults. The values reproduce the
//! reference measurement setup; every one of them can be overridden from the
//! TOML configuration.

/// Outer iterations executed by each worker per measurement.
pub const DEFAULT_REPEAT: u32 = 10_000;

/// Full passes over the value buffer per array-transform call.
pub const DEFAULT_INNER_REPEAT: u32 = 10;

/// Length of the array-transform buffer.
pub const DEFAULT_VALUES_LEN: usize = 100;

/// Buffer slot overwritten with a negative value when a fault is injected.
pub const DEFAULT_POISON_INDEX: usize = 10;

/// Fibonacci argument for the recursive workload (fib(15) = 610).
pub const DEFAULT_FIB_DEPTH: u32 = 15;

/// Largest Fibonacci argument whose result fits a `u32` (fib(46)).
pub const MAX_FIB_DEPTH: u32 = 46;

/// Failure rates swept by default, in parts per thousand.
pub const DEFAULT_FAILURE_RATES: [u32; 4] = [0, 1, 10, 100];

/// Denominator of the error injection rate.
pub const PERMILLE: u32 = 1000;

/// Upper bound on the number of thread counts in one sweep.
pub const MAX_SWEEP_LEN: usize = 64;

/// Multiplier applied to xorshift output (xorshift64*).
pub const XORSHIFT_STAR_MULTIPLIER: u64 = 0x2545_F491_4F6C_DD1D;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_are_consistent() {
        assert!(DEFAULT_REPEAT > 0);
        assert!(DEFAULT_INNER_REPEAT > 0);
        assert!(DEFAULT_POISON_INDEX < DEFAULT_VALUES_LEN);
        assert!((3..=MAX_FIB_DEPTH).contains(&DEFAULT_FIB_DEPTH));
        assert!(MAX_SWEEP_LEN > 0);
    }

    #[test]
    fn default_rates_are_valid_permille() {
        assert!(DEFAULT_FAILURE_RATES.iter().all(|&r| r < PERMILLE));
        assert_eq!(DEFAULT_FAILURE_RATES[0], 0, "baseline row must come first");
    }
}

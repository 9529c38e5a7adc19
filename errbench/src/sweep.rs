//! Thread-count sweeps.
//!
//! A sweep is the ordered list of thread counts one strategy is measured
//! at. It is either built by doubling up to a cap, or given verbatim.

use core::fmt;

use errbench_common::consts::MAX_SWEEP_LEN;
use heapless::Vec;

use crate::error::HarnessError;

/// Ordered thread counts, at most [`MAX_SWEEP_LEN`] entries, none zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadSweep {
    counts: Vec<usize, MAX_SWEEP_LEN>,
}

impl ThreadSweep {
    /// 1, 2, 4, ... up to `cap`. A cap of zero is treated as one.
    pub fn powers_of_two(cap: usize) -> Self {
        let cap = cap.max(1);
        let mut counts = Vec::new();
        let mut n = 1usize;
        while n <= cap {
            // Capacity holds every power of two of a 64-bit usize.
            let _ = counts.push(n);
            match n.checked_mul(2) {
                Some(next) => n = next,
                None => break,
            }
        }
        Self { counts }
    }

    /// [`powers_of_two`](Self::powers_of_two) up to `cap`, plus `cap` itself
    /// when it is not a power of two.
    pub fn doubling(cap: usize) -> Self {
        let mut sweep = Self::powers_of_two(cap);
        if cap > 1 && !cap.is_power_of_two() {
            // At most 63 powers precede a non-power cap.
            let _ = sweep.counts.push(cap);
        }
        sweep
    }

    /// Powers of two up to half of `hardware_threads`.
    pub fn default_for(hardware_threads: usize) -> Self {
        Self::powers_of_two(hardware_threads / 2)
    }

    /// Parse a `--threads` argument.
    ///
    /// A single integer is a doubling cap; several whitespace-separated
    /// integers are used verbatim.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::ThreadSpec` for an empty spec, a count that is
    /// zero or not an integer, or more than [`MAX_SWEEP_LEN`] counts.
    pub fn parse(spec: &str) -> Result<Self, HarnessError> {
        let invalid = |reason: String| HarnessError::ThreadSpec {
            spec: spec.to_string(),
            reason,
        };
        let mut counts: Vec<usize, MAX_SWEEP_LEN> = Vec::new();
        for token in spec.split_whitespace() {
            let n: usize = token
                .parse()
                .map_err(|_| invalid(format!("'{token}' is not a thread count")))?;
            if n == 0 {
                return Err(invalid("thread counts must be at least 1".to_string()));
            }
            counts
                .push(n)
                .map_err(|_| invalid(format!("more than {MAX_SWEEP_LEN} thread counts")))?;
        }
        match counts.as_slice() {
            [] => Err(invalid("no thread counts given".to_string())),
            [cap] => Ok(Self::doubling(*cap)),
            _ => Ok(Self { counts }),
        }
    }

    /// The thread counts, in order.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }
}

impl fmt::Display for ThreadSweep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, n) in self.counts.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{n}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubling_stops_at_cap() {
        assert_eq!(ThreadSweep::doubling(8).counts(), &[1, 2, 4, 8]);
        assert_eq!(ThreadSweep::doubling(1).counts(), &[1]);
    }

    #[test]
    fn doubling_appends_non_power_cap() {
        assert_eq!(ThreadSweep::doubling(6).counts(), &[1, 2, 4, 6]);
        assert_eq!(ThreadSweep::doubling(0).counts(), &[1]);
    }

    #[test]
    fn default_is_half_the_hardware_threads() {
        assert_eq!(ThreadSweep::default_for(16).counts(), &[1, 2, 4, 8]);
        assert_eq!(ThreadSweep::default_for(1).counts(), &[1]);
        assert_eq!(ThreadSweep::default_for(12).counts(), &[1, 2, 4]);
        assert_eq!(ThreadSweep::default_for(0).counts(), &[1]);
    }

    #[test]
    fn single_value_is_a_cap() {
        assert_eq!(ThreadSweep::parse("4").unwrap().counts(), &[1, 2, 4]);
        assert_eq!(ThreadSweep::parse(" 3 ").unwrap().counts(), &[1, 2, 3]);
    }

    #[test]
    fn list_is_verbatim() {
        let sweep = ThreadSweep::parse("3 1  7").unwrap();
        assert_eq!(sweep.counts(), &[3, 1, 7]);
        assert_eq!(sweep.to_string(), "3 1 7");
    }

    #[test]
    fn rejects_bad_specs() {
        for spec in ["", "   ", "0", "2 0", "two", "1 -3"] {
            assert!(
                matches!(ThreadSweep::parse(spec), Err(HarnessError::ThreadSpec { .. })),
                "{spec:?} should be rejected"
            );
        }
        let too_many = vec!["1"; MAX_SWEEP_LEN + 1].join(" ");
        assert!(ThreadSweep::parse(&too_many).is_err());
    }
}

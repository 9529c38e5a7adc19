//! The closed set of propagation strategies.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::workload::Workload;
use crate::{baseline, boxed, dual_channel, scoped, sum_type, tagged, unwinding};

/// Name that matches no strategy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown method {0}")]
pub struct UnknownStrategy(pub String);

/// One way of carrying the workload failure back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// No error handling; a fault aborts the process.
    Baseline,
    /// Panic payload caught at the entry point.
    Unwinding,
    /// `Result<T, ErrorKind>`, checked and forwarded by every frame.
    SumType,
    /// Error ids propagated with `?`, handled once by a scope.
    ScopedHandler,
    /// Two-word tagged encoding with `try_value!`.
    Tagged,
    /// Payload in a register, failure in the carry flag.
    DualChannel,
    /// `Result<T, Box<dyn Error>>` propagated with `?`.
    Boxed,
}

impl Strategy {
    /// Every strategy, in report order.
    pub const ALL: [Strategy; 7] = [
        Strategy::Baseline,
        Strategy::Unwinding,
        Strategy::SumType,
        Strategy::ScopedHandler,
        Strategy::Tagged,
        Strategy::DualChannel,
        Strategy::Boxed,
    ];

    /// Canonical name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::Unwinding => "unwinding",
            Self::SumType => "sum-type",
            Self::ScopedHandler => "scoped-handler",
            Self::Tagged => "tagged",
            Self::DualChannel => "dual-channel",
            Self::Boxed => "boxed",
        }
    }

    /// Other accepted names.
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Baseline => &[],
            Self::Unwinding => &["exceptions"],
            Self::SumType => &["std::expected", "expected"],
            Self::ScopedHandler => &["LEAF", "leaf"],
            Self::Tagged => &["herbceptionemulation"],
            Self::DualChannel => &["herbceptions"],
            Self::Boxed => &["outcome"],
        }
    }

    /// One-line description for the CLI help.
    pub const fn description(self) -> &'static str {
        match self {
            Self::Baseline => "no error handling, faults abort (reference point)",
            Self::Unwinding => "panic payload unwound to the entry point",
            Self::SumType => "Result<T, ErrorKind> checked by every frame",
            Self::ScopedHandler => "error ids with handler scopes",
            Self::Tagged => "two-word tagged value/error encoding",
            Self::DualChannel => "carry-flag error signalling",
            Self::Boxed => "Result<T, Box<dyn Error>> with ?",
        }
    }

    /// Look up a strategy by canonical name or alias.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.name() == name || s.aliases().iter().any(|a| *a == name))
    }

    /// Does a fault end the process instead of being counted?
    pub const fn is_fail_fast(self) -> bool {
        matches!(self, Self::Baseline)
    }

    /// Square-root `values` in place `repeat` times; returns the failed passes.
    pub fn sqrt(self, values: &mut [f64], repeat: u32) -> u32 {
        match self {
            Self::Baseline => baseline::sqrt(values, repeat),
            Self::Unwinding => unwinding::sqrt(values, repeat),
            Self::SumType => sum_type::sqrt(values, repeat),
            Self::ScopedHandler => scoped::sqrt(values, repeat),
            Self::Tagged => tagged::sqrt(values, repeat),
            Self::DualChannel => dual_channel::sqrt(values, repeat),
            Self::Boxed => boxed::sqrt(values, repeat),
        }
    }

    /// fib(`n`) with a depth budget; 0 if the budget runs out.
    pub fn fib(self, n: u32, budget: u32) -> u32 {
        match self {
            Self::Baseline => baseline::fib(n, budget),
            Self::Unwinding => unwinding::fib(n, budget),
            Self::SumType => sum_type::fib(n, budget),
            Self::ScopedHandler => scoped::fib(n, budget),
            Self::Tagged => tagged::fib(n, budget),
            Self::DualChannel => dual_channel::fib(n, budget),
            Self::Boxed => boxed::fib(n, budget),
        }
    }

    /// Run `workload`, returning the number of failed invocations.
    ///
    /// The array workload is invoked once with `repeat` passes; the
    /// Fibonacci workload is invoked `repeat` times.
    pub fn run(self, workload: &mut Workload<'_>, repeat: u32) -> u32 {
        match workload {
            Workload::Sqrt { values } => self.sqrt(values, repeat),
            Workload::Fib { n, budget } => {
                let (n, budget) = (*n, *budget);
                let expected = crate::workload::fib_reference(n);
                (0..repeat)
                    .filter(|_| self.fib(n, budget) != expected)
                    .count() as u32
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}

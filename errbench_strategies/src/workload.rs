//! Workload descriptions.

/// One invocation's worth of work for [`Strategy::run`](crate::Strategy::run).
#[derive(Debug)]
pub enum Workload<'a> {
    /// Square-root every element of the buffer in place.
    ///
    /// A negative element fails the pass; elements before it stay
    /// transformed.
    Sqrt {
        /// Buffer transformed in place.
        values: &'a mut [f64],
    },
    /// fib(`n`) by binary recursion, failing when `budget` runs out.
    Fib {
        /// Fibonacci argument.
        n: u32,
        /// Remaining depth budget; each call consumes one.
        budget: u32,
    },
}

impl Workload<'_> {
    /// Short name used in reports.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sqrt { .. } => "sqrt",
            Self::Fib { .. } => "fib",
        }
    }
}

/// Reference fib(`n`) with wrapping arithmetic, for checking strategy output.
pub const fn fib_reference(n: u32) -> u32 {
    let (mut a, mut b) = (0u32, 1u32);
    let mut i = 0;
    while i < n {
        let next = a.wrapping_add(b);
        a = b;
        b = next;
        i += 1;
    }
    a
}

/// Smallest depth budget with which fib(`n`) completes.
///
/// The deepest chain of calls walks `n, n-1, ..., 1`, one budget unit per
/// call, and the budget is checked before the base case.
pub const fn fib_min_budget(n: u32) -> u32 {
    if n == 0 { 1 } else { n }
}

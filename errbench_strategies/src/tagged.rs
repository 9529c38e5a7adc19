//! The two-word tagged encoding, propagated frame by frame with
//! [`try_value!`].

use std::hint::black_box;

use errbench_common::error::ErrorKind;
use errbench_common::tagged::{Outcome, Tagged, throw_value};
use errbench_common::try_value;

#[inline(never)]
fn do_sqrt(values: &mut [f64]) -> Tagged<()> {
    for v in values.iter_mut() {
        if *v < 0.0 {
            return throw_value(ErrorKind::OutOfDomain.into()).into();
        }
        *v = v.sqrt();
    }
    Tagged::<()>::success(())
}

/// Square-root `values` in place `repeat` times; returns the failed passes.
pub fn sqrt(values: &mut [f64], repeat: u32) -> u32 {
    let mut failures = 0;
    for _ in 0..repeat {
        if do_sqrt(values).has_error() {
            failures += 1;
        }
    }
    failures
}

#[inline(never)]
pub(crate) fn do_fib(n: u32, budget: u32) -> Tagged<u32> {
    if budget == 0 {
        return throw_value(ErrorKind::OutOfDomain.into()).into();
    }
    if n < 2 {
        return Tagged::<u32>::success(n);
    }
    let n2 = try_value!(black_box(do_fib(n - 2, budget - 1)));
    let n1 = try_value!(black_box(do_fib(n - 1, budget - 1)));
    Tagged::<u32>::success(n2.wrapping_add(n1))
}

/// fib(`n`), or 0 if `budget` runs out.
pub fn fib(n: u32, budget: u32) -> u32 {
    let r = do_fib(n, budget);
    if r.has_error() { 0 } else { r.release() }
}

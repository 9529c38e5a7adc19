//! No error handling at all.
//!
//! The zero-overhead reference point. A fault here is a bug in the harness,
//! so both workloads abort the process on one. Never run with a nonzero
//! injection rate.

use std::hint::black_box;
use std::process;

#[inline(never)]
fn do_sqrt(values: &mut [f64]) {
    for v in values.iter_mut() {
        if *v < 0.0 {
            process::abort();
        }
        *v = v.sqrt();
    }
}

/// Square-root `values` in place `repeat` times. Always returns 0.
pub fn sqrt(values: &mut [f64], repeat: u32) -> u32 {
    for _ in 0..repeat {
        do_sqrt(values);
    }
    0
}

#[inline(never)]
fn do_fib(n: u32, budget: u32) -> u32 {
    if budget == 0 {
        process::abort();
    }
    if n < 2 {
        return n;
    }
    let n2 = black_box(do_fib(n - 2, budget - 1));
    let n1 = black_box(do_fib(n - 1, budget - 1));
    n2.wrapping_add(n1)
}

/// fib(`n`); aborts if `budget` is too small.
pub fn fib(n: u32, budget: u32) -> u32 {
    do_fib(n, budget)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqrt_transforms_in_place() {
        let mut values = [16.0, 1.0, 0.0];
        assert_eq!(sqrt(&mut values, 2), 0);
        assert_eq!(values, [2.0, 1.0, 0.0]);
    }

    #[test]
    fn fib_with_enough_budget() {
        assert_eq!(fib(15, 16), 610);
        assert_eq!(fib(20, 21), 6765);
    }
}

//! Results with a boxed trait-object error, propagated with `?`.
//!
//! The general-purpose shape: any error type converts into [`BoxError`], so
//! callers lose the layout advantage of a zero-sized error kind.

use std::hint::black_box;

use errbench_common::error::ErrorKind;

/// Type-erased, thread-safe error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result carrying a [`BoxError`].
pub type BoxResult<T> = Result<T, BoxError>;

static_assertions::assert_eq_size!(BoxResult<()>, [usize; 2]);

#[inline(never)]
fn do_sqrt(values: &mut [f64]) -> BoxResult<()> {
    for v in values.iter_mut() {
        if *v < 0.0 {
            return Err(ErrorKind::OutOfDomain.into());
        }
        *v = v.sqrt();
    }
    Ok(())
}

/// Square-root `values` in place `repeat` times; returns the failed passes.
pub fn sqrt(values: &mut [f64], repeat: u32) -> u32 {
    let mut failures = 0;
    for _ in 0..repeat {
        if let Err(e) = black_box(do_sqrt(values)) {
            drop(e);
            failures += 1;
        }
    }
    failures
}

#[inline(never)]
fn do_fib(n: u32, budget: u32) -> BoxResult<u32> {
    if budget == 0 {
        return Err(ErrorKind::OutOfDomain.into());
    }
    if n < 2 {
        return Ok(n);
    }
    let n2 = black_box(do_fib(n - 2, budget - 1))?;
    let n1 = black_box(do_fib(n - 1, budget - 1))?;
    Ok(n2.wrapping_add(n1))
}

/// fib(`n`), or 0 if `budget` runs out.
pub fn fib(n: u32, budget: u32) -> u32 {
    do_fib(n, budget).unwrap_or(0)
}

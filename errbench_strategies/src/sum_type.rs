//! Sum-type results, checked and forwarded explicitly by every frame.

use std::hint::black_box;

use errbench_common::error::ErrorKind;

#[inline(never)]
fn do_sqrt(values: &mut [f64]) -> Result<(), ErrorKind> {
    for v in values.iter_mut() {
        if *v < 0.0 {
            return Err(ErrorKind::OutOfDomain);
        }
        *v = v.sqrt();
    }
    Ok(())
}

/// Square-root `values` in place `repeat` times; returns the failed passes.
pub fn sqrt(values: &mut [f64], repeat: u32) -> u32 {
    let mut failures = 0;
    for _ in 0..repeat {
        if do_sqrt(values).is_err() {
            failures += 1;
        }
    }
    failures
}

#[inline(never)]
fn do_fib(n: u32, budget: u32) -> Result<u32, ErrorKind> {
    if budget == 0 {
        return Err(ErrorKind::OutOfDomain);
    }
    if n < 2 {
        return Ok(n);
    }
    let n2 = match black_box(do_fib(n - 2, budget - 1)) {
        Ok(v) => v,
        Err(e) => return Err(e),
    };
    let n1 = match black_box(do_fib(n - 1, budget - 1)) {
        Ok(v) => v,
        Err(e) => return Err(e),
    };
    Ok(n2.wrapping_add(n1))
}

/// fib(`n`), or 0 if `budget` runs out.
pub fn fib(n: u32, budget: u32) -> u32 {
    match do_fib(n, budget) {
        Ok(v) => v,
        Err(_) => 0,
    }
}

//! Stack unwinding.
//!
//! The failure is a panic payload carrying [`ErrorKind`], raised with
//! [`panic::resume_unwind`] so the panic hook stays silent, and caught once
//! at the entry point. Payloads of any other type are re-raised untouched.
//!
//! Requires `panic = "unwind"`.

use std::hint::black_box;
use std::panic::{self, AssertUnwindSafe};

use errbench_common::error::ErrorKind;

#[cold]
#[inline(never)]
fn raise(kind: ErrorKind) -> ! {
    panic::resume_unwind(Box::new(kind))
}

/// Run `f`, turning a raised [`ErrorKind`] into `Err`.
fn catch<T>(f: impl FnOnce() -> T) -> Result<T, ErrorKind> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(v) => Ok(v),
        Err(payload) => match payload.downcast::<ErrorKind>() {
            Ok(kind) => Err(*kind),
            Err(other) => panic::resume_unwind(other),
        },
    }
}

#[inline(never)]
fn do_sqrt(values: &mut [f64]) {
    for v in values.iter_mut() {
        if *v < 0.0 {
            raise(ErrorKind::OutOfDomain);
        }
        *v = v.sqrt();
    }
}

/// Square-root `values` in place `repeat` times; returns the failed passes.
pub fn sqrt(values: &mut [f64], repeat: u32) -> u32 {
    let mut failures = 0;
    for _ in 0..repeat {
        if catch(|| do_sqrt(values)).is_err() {
            failures += 1;
        }
    }
    failures
}

#[inline(never)]
fn do_fib(n: u32, budget: u32) -> u32 {
    if budget == 0 {
        raise(ErrorKind::OutOfDomain);
    }
    if n < 2 {
        return n;
    }
    let n2 = black_box(do_fib(n - 2, budget - 1));
    let n1 = black_box(do_fib(n - 1, budget - 1));
    n2.wrapping_add(n1)
}

/// fib(`n`), or 0 if `budget` runs out.
pub fn fib(n: u32, budget: u32) -> u32 {
    catch(|| do_fib(n, budget)).unwrap_or(0)
}

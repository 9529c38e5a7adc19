//! Scoped handlers.
//!
//! Functions return [`Scoped<T>`], whose error is only a small [`ErrorId`];
//! the error object itself is parked in a thread-local slot by
//! [`new_error`], and only while some [`try_handle_some`] scope is open to
//! receive it. Frames propagate with plain `?` and never see the object.
//! The scope that opened the slot matches the id and runs its handler once.
//!
//! ```rust
//! use errbench_common::error::ErrorKind;
//! use errbench_strategies::scoped::{new_error, try_handle_some, Scoped};
//!
//! fn half(v: u32) -> Scoped<u32> {
//!     if v % 2 == 1 {
//!         return Err(new_error(ErrorKind::OutOfDomain));
//!     }
//!     Ok(v / 2)
//! }
//!
//! let r = try_handle_some(|| half(7), |ErrorKind::OutOfDomain| 0);
//! assert_eq!(r, Ok(0));
//! ```

use std::cell::Cell;
use std::hint::black_box;
use std::num::NonZeroU32;

use errbench_common::error::ErrorKind;

/// Identity of one raised error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorId(NonZeroU32);

static_assertions::assert_eq_size!(Result<u32, ErrorId>, u64);

/// Result whose error is an [`ErrorId`].
pub type Scoped<T> = Result<T, ErrorId>;

thread_local! {
    static OPEN_SCOPES: Cell<u32> = const { Cell::new(0) };
    static NEXT_ID: Cell<u32> = const { Cell::new(1) };
    static PENDING: Cell<Option<(ErrorId, ErrorKind)>> = const { Cell::new(None) };
}

/// Raise `kind`, returning the id to propagate.
///
/// The error object is kept only if a handler scope is open on this thread;
/// otherwise the id is all that remains.
#[cold]
pub fn new_error(kind: ErrorKind) -> ErrorId {
    let raw = NEXT_ID.with(|next| {
        let id = next.get();
        next.set(id.checked_add(1).unwrap_or(1));
        id
    });
    let id = ErrorId(NonZeroU32::new(raw).unwrap_or(NonZeroU32::MIN));
    if OPEN_SCOPES.with(Cell::get) > 0 {
        PENDING.with(|p| p.set(Some((id, kind))));
    }
    id
}

struct ScopeGuard;

impl ScopeGuard {
    fn open() -> Self {
        OPEN_SCOPES.with(|n| n.set(n.get() + 1));
        ScopeGuard
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        OPEN_SCOPES.with(|n| n.set(n.get().saturating_sub(1)));
    }
}

/// Run `body` in a handler scope.
///
/// If `body` fails with an error raised inside the scope, `handler` turns
/// the error object into the scope's value. An id whose object is not held
/// here (raised outside any scope, or already taken) is forwarded.
pub fn try_handle_some<T>(
    body: impl FnOnce() -> Scoped<T>,
    handler: impl FnOnce(ErrorKind) -> T,
) -> Scoped<T> {
    let result = {
        let _scope = ScopeGuard::open();
        body()
    };
    match result {
        Ok(v) => Ok(v),
        Err(id) => match PENDING.with(Cell::take) {
            Some((pending, kind)) if pending == id => Ok(handler(kind)),
            other => {
                PENDING.with(|p| p.set(other));
                Err(id)
            }
        },
    }
}

#[inline(never)]
fn do_sqrt(values: &mut [f64]) -> Scoped<()> {
    for v in values.iter_mut() {
        if *v < 0.0 {
            return Err(new_error(ErrorKind::OutOfDomain));
        }
        *v = v.sqrt();
    }
    Ok(())
}

/// Did a handled pass fail? `Ok(false)` was handled in scope; an `Err` is
/// an id the scope did not hold, and counts as a failure as well.
fn pass_failed(outcome: Scoped<bool>) -> bool {
    !matches!(outcome, Ok(true))
}

/// Square-root `values` in place `repeat` times; returns the failed passes.
pub fn sqrt(values: &mut [f64], repeat: u32) -> u32 {
    let mut failures = 0;
    for _ in 0..repeat {
        let outcome = try_handle_some(
            || {
                do_sqrt(values)?;
                Ok(true)
            },
            |ErrorKind::OutOfDomain| false,
        );
        if pass_failed(outcome) {
            failures += 1;
        }
    }
    failures
}

#[inline(never)]
fn do_fib(n: u32, budget: u32) -> Scoped<u32> {
    if budget == 0 {
        return Err(new_error(ErrorKind::OutOfDomain));
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
    try_handle_some(|| do_fib(n, budget), |ErrorKind::OutOfDomain| 0).unwrap_or(0)
}

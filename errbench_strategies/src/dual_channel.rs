//! Failure signalled in the carry flag.
//!
//! The recursive Fibonacci routine returns its payload in `eax` and reports
//! failure by setting CF. Every frame tests CF right after its call and, if
//! set, returns with CF still set without touching the payload register.
//! This is the floor for propagation cost: the error never occupies any
//! bits of the value channel.
//!
//! The routine exists only for x86_64 Linux ([`NATIVE`]). Elsewhere both
//! entry points fall back to the tagged strategy, and the array workload
//! always does, since its call overhead is negligible.

use errbench_common::error::ErrorKind;
use errbench_common::tagged::{ErrorCode, ErrorReturn, Outcome};

/// Is the carry-flag routine compiled in on this target?
pub const NATIVE: bool = cfg!(all(target_arch = "x86_64", target_os = "linux"));

/// Square-root `values` in place `repeat` times; returns the failed passes.
pub fn sqrt(values: &mut [f64], repeat: u32) -> u32 {
    crate::tagged::sqrt(values, repeat)
}

/// Result of one carry-flag call, decoded after the flag was read.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarryResult {
    value: u32,
    carry: bool,
}

impl Outcome for CarryResult {
    type Value = u32;

    #[inline]
    fn success(value: u32) -> Self {
        Self {
            value,
            carry: false,
        }
    }

    #[inline]
    fn has_error(&self) -> bool {
        self.carry
    }

    #[inline]
    fn value(&self) -> &u32 {
        if self.carry {
            panic!("carry result: value accessed in the wrong state");
        }
        &self.value
    }

    #[inline]
    fn error_return(&self) -> ErrorReturn {
        if !self.carry {
            panic!("carry result: error accessed in the wrong state");
        }
        ErrorReturn::from(ErrorKind::OutOfDomain)
    }

    #[inline]
    fn release(self) -> u32 {
        *self.value()
    }
}

impl From<ErrorReturn> for CarryResult {
    #[inline]
    fn from(_: ErrorReturn) -> Self {
        Self {
            value: 0,
            carry: true,
        }
    }
}

impl CarryResult {
    /// The flag carries no code; every failure is out of domain.
    pub fn code(&self) -> Option<ErrorCode> {
        self.carry.then(|| ErrorKind::OutOfDomain.into())
    }
}

#[cfg(all(target_arch = "x86_64", target_os = "linux"))]
mod native {
    use core::arch::asm;

    /// Run the routine; returns the payload register and the carry flag.
    #[inline(never)]
    pub(super) fn fib(n: u32, budget: u32) -> (u32, bool) {
        let value: u32;
        let carry: u8;
        // SAFETY: the routine only uses the stack through balanced
        // call/push/pop, restores rbp, r14 and rbx before returning, and
        // writes no other registers than the declared operands and flags.
        unsafe {
            asm!(
                "call 3f",
                "setc {carry}",
                "jmp 8f",
                // fib(edi = n, esi = budget) -> eax, CF on failure
                "3:",
                "push rbp",
                "push r14",
                "push rbx",
                "test esi, esi",
                "je 7f",
                "mov r14d, edi",
                "mov eax, edi",
                "cmp edi, 2",
                "jb 5f",
                "mov ebx, esi",
                "dec ebx",
                "lea edi, [r14 - 2]",
                "mov esi, ebx",
                "call 3b",
                "jc 6f",
                "mov ebp, eax",
                "lea edi, [r14 - 1]",
                "mov esi, ebx",
                "call 3b",
                "jc 6f",
                "add eax, ebp",
                "5:",
                "clc",
                "6:",
                "pop rbx",
                "pop r14",
                "pop rbp",
                "ret",
                "7:",
                "xor eax, eax",
                "stc",
                "jmp 6b",
                "8:",
                carry = out(reg_byte) carry,
                inout("edi") n => _,
                inout("esi") budget => _,
                out("eax") value,
            );
        }
        (value, carry != 0)
    }
}

/// Call fib(`n`) through the dual-channel protocol.
#[inline]
pub fn call(n: u32, budget: u32) -> CarryResult {
    #[cfg(all(target_arch = "x86_64", target_os = "linux"))]
    {
        let (value, carry) = native::fib(n, budget);
        CarryResult { value, carry }
    }
    #[cfg(not(all(target_arch = "x86_64", target_os = "linux")))]
    {
        match crate::tagged::do_fib(n, budget).into_result() {
            Ok(value) => CarryResult::success(value),
            Err(code) => CarryResult::from(ErrorReturn::from(code)),
        }
    }
}

/// fib(`n`), or 0 if `budget` runs out.
pub fn fib(n: u32, budget: u32) -> u32 {
    let r = call(n, budget);
    if r.has_error() { 0 } else { r.release() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_cases() {
        assert_eq!(call(0, 1), CarryResult::success(0));
        assert_eq!(call(1, 1), CarryResult::success(1));
        assert_eq!(call(2, 2), CarryResult::success(1));
    }

    #[test]
    fn zero_budget_sets_flag() {
        let r = call(1, 0);
        assert!(r.has_error());
        assert_eq!(r.code(), Some(ErrorCode::from(ErrorKind::OutOfDomain)));
        assert_eq!(r.error().kind(), Some(ErrorKind::OutOfDomain));
    }

    #[test]
    fn flag_propagates_through_every_frame() {
        for n in 2..20 {
            assert!(call(n, n - 1).has_error(), "n = {n}");
            assert_eq!(call(n, n).release(), crate::workload::fib_reference(n));
        }
    }

    #[test]
    fn fixtures() {
        assert_eq!(fib(20, 21), 6765);
        assert_eq!(fib(20, 19), 0);
        assert_eq!(fib(15, 16), 610);
    }

    #[test]
    #[should_panic(expected = "wrong state")]
    fn value_of_failure_panics() {
        let _ = call(5, 0).release();
    }
}

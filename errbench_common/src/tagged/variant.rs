//! Variant storage for payloads that do not fit one word.

use super::code::ErrorReturn;
use super::{precondition_failed, ErrorCode, Outcome};

/// Value or error as an ordinary sum type.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub struct VariantResult<T>(Result<T, ErrorCode>);

impl<T> VariantResult<T> {
    /// Borrow as a standard `Result`.
    #[inline]
    pub fn as_result(&self) -> Result<&T, ErrorCode> {
        self.0.as_ref().map_err(|e| *e)
    }

    /// Unwrap into a standard `Result`.
    #[inline]
    pub fn into_inner(self) -> Result<T, ErrorCode> {
        self.0
    }
}

impl<T> Outcome for VariantResult<T> {
    type Value = T;

    #[inline]
    fn success(value: T) -> Self {
        Self(Ok(value))
    }

    #[inline]
    fn failure(code: ErrorCode) -> Self {
        Self(Err(code))
    }

    #[inline]
    fn has_error(&self) -> bool {
        self.0.is_err()
    }

    #[inline]
    fn value(&self) -> &T {
        match &self.0 {
            Ok(v) => v,
            Err(_) => precondition_failed("value"),
        }
    }

    #[inline]
    fn error_return(&self) -> ErrorReturn {
        match &self.0 {
            Ok(_) => precondition_failed("error"),
            Err(code) => ErrorReturn::from_code(*code),
        }
    }

    #[inline]
    fn release(self) -> T {
        match self.0 {
            Ok(v) => v,
            Err(_) => precondition_failed("value"),
        }
    }

    #[inline]
    fn into_result(self) -> Result<T, ErrorCode> {
        self.0
    }
}

impl<T> From<ErrorReturn> for VariantResult<T> {
    #[inline]
    fn from(e: ErrorReturn) -> Self {
        Self(Err(e.to_code()))
    }
}

impl<T> From<Result<T, ErrorCode>> for VariantResult<T> {
    #[inline]
    fn from(r: Result<T, ErrorCode>) -> Self {
        Self(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn large_payload_round_trip() {
        let r = VariantResult::success(u128::MAX);
        assert_eq!(r.as_result(), Ok(&u128::MAX));
        assert_eq!(r.release(), u128::MAX);
    }

    #[test]
    fn error_state_from_raw_form() {
        let r = VariantResult::<String>::from(ErrorReturn::from(ErrorKind::OutOfDomain));
        assert!(r.has_error());
        assert_eq!(r.into_inner(), Err(ErrorKind::OutOfDomain.into()));
    }

    #[test]
    fn wraps_standard_result() {
        let r: VariantResult<Vec<u8>> = Ok(vec![1, 2]).into();
        assert_eq!(r.value().len(), 2);
    }
}

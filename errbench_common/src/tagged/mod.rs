//! Tagged result encoding.
//!
//! A result that is either a value or an [`ErrorCode`], laid out so that the
//! common cases travel in two machine words and the discriminant check is a
//! single test of one bit.
//!
//! ## Storage classes
//!
//! The payload type picks its representation through the [`Encode`] trait:
//!
//! | Class | Payload | Representation |
//! |-------|---------|----------------|
//! | inline-trivial | `Copy`, at most one word | [`InlineResult`]: value word + tag word |
//! | inline-slot | owns resources, at most one word | [`SlotResult`]: one-word slot constructed in place + tag word |
//! | variant | anything larger | [`VariantResult`]: plain `Result<T, ErrorCode>` |
//!
//! The tag word is null for a value and a pointer to the error category with
//! its low bit set for an error. The tag never overlaps payload bytes, so
//! reading the discriminant never interprets payload memory as `T`.
//!
//! ## Propagation
//!
//! [`try_value!`](crate::try_value) unwraps a value or returns the error
//! converted into the enclosing function's result type. The conversion goes
//! through [`ErrorReturn`], the raw two-word error, so the error path is a
//! branch on the tag followed by two word moves.
//!
//! ## Zero-Allocation Guarantee
//!
//! Constructing, propagating and consuming the inline classes never touches
//! the heap.

mod code;
mod inline;
mod slot;
mod variant;

pub use code::{ErrorCategory, ErrorCode, ErrorReturn, GENERIC_CATEGORY, throw_value};
pub use inline::InlineResult;
pub use slot::SlotResult;
pub use variant::VariantResult;

/// Uniform contract of every tagged result representation.
///
/// `value`, `release` and `error` have state preconditions; calling them in
/// the wrong state panics.
pub trait Outcome: Sized + From<ErrorReturn> {
    /// Success payload type.
    type Value;

    /// Wrap a success value.
    fn success(value: Self::Value) -> Self;

    /// Wrap an error code.
    #[inline]
    fn failure(code: ErrorCode) -> Self {
        Self::from(ErrorReturn::from_code(code))
    }

    /// Does this result hold an error?
    fn has_error(&self) -> bool;

    /// Does this result hold a value?
    #[inline]
    fn has_value(&self) -> bool {
        !self.has_error()
    }

    /// Borrow the value.
    ///
    /// # Panics
    /// Panics if the result holds an error.
    fn value(&self) -> &Self::Value;

    /// The error code.
    ///
    /// # Panics
    /// Panics if the result holds a value.
    #[inline]
    fn error(&self) -> ErrorCode {
        self.error_return().to_code()
    }

    /// The error in its raw two-word form.
    ///
    /// # Panics
    /// Panics if the result holds a value.
    fn error_return(&self) -> ErrorReturn;

    /// Move the value out, consuming the result.
    ///
    /// # Panics
    /// Panics if the result holds an error.
    fn release(self) -> Self::Value;

    /// Convert into a standard `Result`.
    #[inline]
    fn into_result(self) -> Result<Self::Value, ErrorCode> {
        if self.has_error() {
            Err(self.error())
        } else {
            Ok(self.release())
        }
    }
}

/// Selects the tagged representation of a payload type.
pub trait Encode: Sized {
    /// The result type carrying `Self` or an error.
    type Result: Outcome<Value = Self>;
}

/// Tagged result of `T`, in whichever representation `T` selects.
pub type Tagged<T> = <T as Encode>::Result;

/// Implement [`Encode`] for a type with an explicit storage class.
///
/// ```rust
/// use errbench_common::encode_as;
/// use errbench_common::tagged::{Outcome, Tagged};
///
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// struct Meters(u32);
/// encode_as!(inline Meters);
///
/// let r = Tagged::<Meters>::success(Meters(3));
/// assert_eq!(r.release(), Meters(3));
/// ```
#[macro_export]
macro_rules! encode_as {
    (inline $($t:ty),+ $(,)?) => {
        $(impl $crate::tagged::Encode for $t {
            type Result = $crate::tagged::InlineResult<$t>;
        })+
    };
    (slot $($t:ty),+ $(,)?) => {
        $(impl $crate::tagged::Encode for $t {
            type Result = $crate::tagged::SlotResult<$t>;
        })+
    };
    (variant $($t:ty),+ $(,)?) => {
        $(impl $crate::tagged::Encode for $t {
            type Result = $crate::tagged::VariantResult<$t>;
        })+
    };
}

/// Unwrap a tagged result or return its error from the enclosing function.
///
/// The enclosing function must return a tagged result (any representation);
/// the error is handed over in raw form without being decoded.
#[macro_export]
macro_rules! try_value {
    ($e:expr) => {{
        let r = $e;
        if $crate::tagged::Outcome::has_error(&r) {
            return ::core::convert::From::from($crate::tagged::Outcome::error_return(&r));
        }
        $crate::tagged::Outcome::release(r)
    }};
}

encode_as!(inline (), bool, char, u8, u16, u32, usize, i8, i16, i32, isize, f32);

#[cfg(target_pointer_width = "64")]
encode_as!(inline u64, i64, f64);

#[cfg(not(target_pointer_width = "64"))]
encode_as!(variant u64, i64, f64);

encode_as!(variant u128, i128, String);

impl<U> Encode for Box<U> {
    type Result = SlotResult<Box<U>>;
}

impl<U> Encode for std::rc::Rc<U> {
    type Result = SlotResult<std::rc::Rc<U>>;
}

impl<U> Encode for std::sync::Arc<U> {
    type Result = SlotResult<std::sync::Arc<U>>;
}

impl<U> Encode for Vec<U> {
    type Result = VariantResult<Vec<U>>;
}

#[cold]
#[inline(never)]
#[track_caller]
pub(crate) fn precondition_failed(access: &'static str) -> ! {
    panic!("tagged result: {access} accessed in the wrong state")
}

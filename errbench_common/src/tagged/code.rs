//! Error codes, categories, and the tagged category pointer.
//!
//! An [`ErrorCode`] is a numeric value qualified by a static
//! [`ErrorCategory`]. Categories are 8-byte aligned, so the low bit of a
//! category pointer is always zero and can be borrowed as the discriminant
//! of a result: a null word means "value", a pointer with the low bit set
//! means "error of this category".
//!
//! [`ErrorReturn`] is the raw two-word form of an error (code word plus
//! tagged category pointer). Results convert their error state into it and
//! back without rebuilding an `ErrorCode`, which keeps the propagation path
//! down to two register moves.

use core::fmt;
use core::ptr;

use crate::error::ErrorKind;

/// Low bit of the category word; set for every error state.
pub(crate) const TAG_BIT: usize = 1;

/// A static family of error codes.
///
/// Compared by address: two categories are equal only if they are the same
/// static.
#[repr(C, align(8))]
pub struct ErrorCategory {
    name: &'static str,
    message: fn(i32) -> &'static str,
}

static_assertions::const_assert!(core::mem::align_of::<ErrorCategory>() > TAG_BIT);

impl ErrorCategory {
    /// Create a category from a name and a code-to-message lookup.
    pub const fn new(name: &'static str, message: fn(i32) -> &'static str) -> Self {
        Self { name, message }
    }

    /// Category name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Human-readable message for a code of this category.
    #[inline]
    pub fn message(&self, code: i32) -> &'static str {
        (self.message)(code)
    }
}

impl PartialEq for ErrorCategory {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self, other)
    }
}

impl Eq for ErrorCategory {}

impl fmt::Debug for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorCategory")
            .field("name", &self.name)
            .finish()
    }
}

fn generic_message(code: i32) -> &'static str {
    match code {
        libc::EDOM => "argument out of domain",
        libc::ERANGE => "result out of range",
        libc::EINVAL => "invalid argument",
        _ => "unknown error",
    }
}

/// POSIX-style generic error category (errno values).
pub static GENERIC_CATEGORY: ErrorCategory = ErrorCategory::new("generic", generic_message);

/// A numeric error value qualified by its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCode {
    value: i32,
    category: &'static ErrorCategory,
}

impl ErrorCode {
    /// Create an error code.
    pub const fn new(value: i32, category: &'static ErrorCategory) -> Self {
        Self { value, category }
    }

    /// Numeric value within the category.
    #[inline]
    pub const fn value(&self) -> i32 {
        self.value
    }

    /// The category this code belongs to.
    #[inline]
    pub const fn category(&self) -> &'static ErrorCategory {
        self.category
    }

    /// Map back to the domain error kind, if this code represents one.
    pub fn kind(&self) -> Option<ErrorKind> {
        (*self.category == GENERIC_CATEGORY && self.value == libc::EDOM)
            .then_some(ErrorKind::OutOfDomain)
    }
}

impl From<ErrorKind> for ErrorCode {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::OutOfDomain => Self::new(libc::EDOM, &GENERIC_CATEGORY),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}",
            self.category.name(),
            self.value,
            self.category.message(self.value)
        )
    }
}

impl std::error::Error for ErrorCode {}

#[inline]
pub(crate) fn tag(category: &'static ErrorCategory) -> *const ErrorCategory {
    (category as *const ErrorCategory).map_addr(|addr| addr | TAG_BIT)
}

#[inline]
pub(crate) fn is_tagged(word: *const ErrorCategory) -> bool {
    word.addr() & TAG_BIT != 0
}

/// Raw two-word error, as it travels between frames.
///
/// Only obtainable from an [`ErrorCode`] or from the error state of a
/// result, so the category word is always a tagged pointer to a static
/// category.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct ErrorReturn {
    code: usize,
    category: *const ErrorCategory,
}

static_assertions::assert_eq_size!(ErrorReturn, [usize; 2]);

// SAFETY: `category` only ever points at an immutable `'static`
// `ErrorCategory`, which is `Sync`.
unsafe impl Send for ErrorReturn {}
// SAFETY: see above; the struct is never mutated through the pointer.
unsafe impl Sync for ErrorReturn {}

impl ErrorReturn {
    /// Encode an error code into its raw form.
    #[inline]
    pub fn from_code(code: ErrorCode) -> Self {
        Self {
            code: code.value as u32 as usize,
            category: tag(code.category),
        }
    }

    /// Rebuild from the two words of a result in error state.
    ///
    /// # Safety
    ///
    /// `category` must be a word previously produced by [`ErrorReturn::from_code`]
    /// (a tagged pointer to a `'static` category).
    #[inline]
    pub(crate) const unsafe fn from_raw(code: usize, category: *const ErrorCategory) -> Self {
        Self { code, category }
    }

    #[inline]
    pub(crate) const fn code_word(self) -> usize {
        self.code
    }

    #[inline]
    pub(crate) const fn category_word(self) -> *const ErrorCategory {
        self.category
    }

    /// Decode into a full error code.
    #[inline]
    pub fn to_code(self) -> ErrorCode {
        let untagged = self.category.map_addr(|addr| addr & !TAG_BIT);
        // SAFETY: construction guarantees a tagged pointer to a 'static
        // category; clearing the tag restores the original reference.
        let category = unsafe { &*untagged };
        ErrorCode::new(self.code as u32 as i32, category)
    }
}

impl From<ErrorCode> for ErrorReturn {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        Self::from_code(code)
    }
}

impl From<ErrorKind> for ErrorReturn {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::from_code(kind.into())
    }
}

impl From<ErrorReturn> for ErrorCode {
    #[inline]
    fn from(raw: ErrorReturn) -> Self {
        raw.to_code()
    }
}

/// Produce an error in the form every tagged result converts from.
///
/// `return throw_value(code).into();` is the cheapest way to fail a function
/// that returns a tagged result.
#[inline]
#[must_use]
pub fn throw_value(code: ErrorCode) -> ErrorReturn {
    ErrorReturn::from_code(code)
}

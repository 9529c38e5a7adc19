//! Inline-trivial storage: a `Copy` payload of at most one word.

use core::fmt;
use core::ptr;

use super::code::{is_tagged, ErrorCategory, ErrorReturn};
use super::{precondition_failed, Outcome};

#[derive(Clone, Copy)]
#[repr(C)]
union InlineWord<T: Copy> {
    raw: usize,
    value: T,
}

/// Value or error in exactly two words: payload word and tag word.
///
/// The payload word holds either the bits of `T` or the error's numeric
/// code; the tag word is null or a tagged category pointer.
#[must_use]
#[derive(Clone, Copy)]
#[repr(C)]
pub struct InlineResult<T: Copy> {
    word: InlineWord<T>,
    tag: *const ErrorCategory,
}

static_assertions::assert_eq_size!(InlineResult<u32>, [usize; 2]);
static_assertions::assert_eq_size!(InlineResult<usize>, [usize; 2]);
static_assertions::assert_eq_size!(InlineResult<()>, [usize; 2]);

// SAFETY: the tag word only ever points at an immutable `'static` category;
// the payload is an owned `T`.
unsafe impl<T: Copy + Send> Send for InlineResult<T> {}
// SAFETY: as above, shared access never writes through the tag.
unsafe impl<T: Copy + Sync> Sync for InlineResult<T> {}

impl<T: Copy> InlineResult<T> {
    const FITS_ONE_WORD: () = assert!(
        core::mem::size_of::<T>() <= core::mem::size_of::<usize>()
            && core::mem::align_of::<T>() <= core::mem::align_of::<usize>(),
        "inline results hold at most one machine word"
    );
}

impl<T: Copy> Outcome for InlineResult<T> {
    type Value = T;

    #[inline]
    fn success(value: T) -> Self {
        let () = Self::FITS_ONE_WORD;
        // Zero the whole word first so every byte stays initialized when
        // `T` is narrower than a word.
        let mut word = InlineWord { raw: 0 };
        word.value = value;
        Self {
            word,
            tag: ptr::null(),
        }
    }

    #[inline]
    fn has_error(&self) -> bool {
        is_tagged(self.tag)
    }

    #[inline]
    fn value(&self) -> &T {
        if self.has_error() {
            precondition_failed("value");
        }
        // SAFETY: untagged means `success` wrote `value`.
        unsafe { &self.word.value }
    }

    #[inline]
    fn error_return(&self) -> ErrorReturn {
        if !self.has_error() {
            precondition_failed("error");
        }
        // SAFETY: tagged means the word came from an `ErrorReturn`, which
        // initialized `raw` and produced the tag.
        unsafe { ErrorReturn::from_raw(self.word.raw, self.tag) }
    }

    #[inline]
    fn release(self) -> T {
        if self.has_error() {
            precondition_failed("value");
        }
        // SAFETY: untagged means `success` wrote `value`.
        unsafe { self.word.value }
    }
}

impl<T: Copy> From<ErrorReturn> for InlineResult<T> {
    #[inline]
    fn from(e: ErrorReturn) -> Self {
        Self {
            word: InlineWord { raw: e.code_word() },
            tag: e.category_word(),
        }
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for InlineResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_error() {
            f.debug_tuple("Error").field(&self.error()).finish()
        } else {
            f.debug_tuple("Value").field(self.value()).finish()
        }
    }
}

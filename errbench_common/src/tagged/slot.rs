//! Inline-slot storage: a resource-owning payload of at most one word,
//! constructed in place.

use core::fmt;
use core::marker::PhantomData;
use core::mem::ManuallyDrop;
use core::ptr;

use super::code::{is_tagged, ErrorCategory, ErrorReturn};
use super::{precondition_failed, Outcome};

union Slot<T> {
    raw: usize,
    value: ManuallyDrop<T>,
}

/// Value or error in two words, for payloads that own something.
///
/// The slot is dropped only when it holds a value; copying or moving an
/// error is a plain copy of the two words.
#[must_use]
#[repr(C)]
pub struct SlotResult<T> {
    slot: Slot<T>,
    tag: *const ErrorCategory,
    _owns: PhantomData<T>,
}

static_assertions::assert_eq_size!(SlotResult<Box<u64>>, [usize; 2]);
static_assertions::assert_eq_size!(SlotResult<std::sync::Arc<String>>, [usize; 2]);

// SAFETY: the tag word only ever points at an immutable `'static` category;
// the slot owns its `T`.
unsafe impl<T: Send> Send for SlotResult<T> {}
// SAFETY: shared access only hands out `&T`.
unsafe impl<T: Sync> Sync for SlotResult<T> {}

impl<T> SlotResult<T> {
    const FITS_ONE_WORD: () = assert!(
        core::mem::size_of::<T>() <= core::mem::size_of::<usize>()
            && core::mem::align_of::<T>() <= core::mem::align_of::<usize>(),
        "slot results hold at most one machine word"
    );

    /// Borrow the value mutably.
    ///
    /// # Panics
    /// Panics if the result holds an error.
    #[inline]
    pub fn value_mut(&mut self) -> &mut T {
        if self.has_error() {
            precondition_failed("value");
        }
        // SAFETY: untagged means `success` constructed `value`.
        unsafe { &mut self.slot.value }
    }
}

impl<T> Outcome for SlotResult<T> {
    type Value = T;

    #[inline]
    fn success(value: T) -> Self {
        let () = Self::FITS_ONE_WORD;
        Self {
            slot: Slot {
                value: ManuallyDrop::new(value),
            },
            tag: ptr::null(),
            _owns: PhantomData,
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
        // SAFETY: untagged means `success` constructed `value`.
        unsafe { &self.slot.value }
    }

    #[inline]
    fn error_return(&self) -> ErrorReturn {
        if !self.has_error() {
            precondition_failed("error");
        }
        // SAFETY: tagged means the slot holds the raw code of an
        // `ErrorReturn`, which also produced the tag.
        unsafe { ErrorReturn::from_raw(self.slot.raw, self.tag) }
    }

    #[inline]
    fn release(self) -> T {
        if self.has_error() {
            precondition_failed("value");
        }
        let mut this = ManuallyDrop::new(self);
        // SAFETY: untagged means the slot holds a live `T`; `this` is never
        // dropped, so the value is moved out exactly once.
        unsafe { ManuallyDrop::take(&mut this.slot.value) }
    }
}

impl<T> Drop for SlotResult<T> {
    #[inline]
    fn drop(&mut self) {
        if !self.has_error() {
            // SAFETY: untagged means the slot holds a live `T`.
            unsafe { ManuallyDrop::drop(&mut self.slot.value) }
        }
    }
}

impl<T: Clone> Clone for SlotResult<T> {
    fn clone(&self) -> Self {
        if self.has_error() {
            Self::from(self.error_return())
        } else {
            Self::success(self.value().clone())
        }
    }
}

impl<T> From<ErrorReturn> for SlotResult<T> {
    #[inline]
    fn from(e: ErrorReturn) -> Self {
        Self {
            slot: Slot { raw: e.code_word() },
            tag: e.category_word(),
            _owns: PhantomData,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SlotResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_error() {
            f.debug_tuple("Error").field(&self.error()).finish()
        } else {
            f.debug_tuple("Value").field(self.value()).finish()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counters {
        clones: Cell<usize>,
        drops: Cell<usize>,
    }

    struct Tracker(Rc<Counters>);

    impl Clone for Tracker {
        fn clone(&self) -> Self {
            self.0.clones.set(self.0.clones.get() + 1);
            Tracker(Rc::clone(&self.0))
        }
    }

    impl Drop for Tracker {
        fn drop(&mut self) {
            self.0.drops.set(self.0.drops.get() + 1);
        }
    }

    #[test]
    fn value_is_dropped_once() {
        let counters = Rc::new(Counters::default());
        drop(SlotResult::success(Tracker(Rc::clone(&counters))));
        assert_eq!(counters.drops.get(), 1);
    }

    #[test]
    fn release_moves_without_dropping() {
        let counters = Rc::new(Counters::default());
        let r = SlotResult::success(Tracker(Rc::clone(&counters)));
        let t = r.release();
        assert_eq!(counters.drops.get(), 0);
        drop(t);
        assert_eq!(counters.drops.get(), 1);
    }

    #[test]
    fn error_state_drops_nothing() {
        let counters = Rc::new(Counters::default());
        let r = SlotResult::<Tracker>::failure(ErrorKind::OutOfDomain.into());
        let copy = r.clone();
        drop(r);
        drop(copy);
        assert_eq!(counters.drops.get(), 0);
        assert_eq!(counters.clones.get(), 0);
    }

    #[test]
    fn clone_of_value_clones_payload() {
        let counters = Rc::new(Counters::default());
        let r = SlotResult::success(Tracker(Rc::clone(&counters)));
        let copy = r.clone();
        assert_eq!(counters.clones.get(), 1);
        drop(copy);
        drop(r);
        assert_eq!(counters.drops.get(), 2);
    }

    #[test]
    fn value_mut_edits_in_place() {
        let mut r = SlotResult::success(Box::new(1u64));
        **r.value_mut() += 41;
        assert_eq!(*r.release(), 42);
    }

    #[test]
    fn error_survives_move_into_other_payload() {
        let r = SlotResult::<Box<u8>>::failure(ErrorKind::OutOfDomain.into());
        let other = SlotResult::<Rc<u32>>::from(r.error_return());
        assert_eq!(other.error().kind(), Some(ErrorKind::OutOfDomain));
    }

    #[test]
    #[should_panic(expected = "wrong state")]
    fn release_of_error_panics() {
        let r = SlotResult::<Box<u8>>::failure(ErrorKind::OutOfDomain.into());
        let _ = r.release();
    }
}

use crate::alloc::{AllocRef, Global, NonZeroLayout};
use core::{marker::PhantomData, mem, ptr::NonNull};

/// Storage for exactly one `T` that does not own a `T`.
///
/// A `RawBox` is the unit of failure atomicity for boxes. In particular:
///
/// * Produces a dangling pointer for zero-sized types and never allocates for them
/// * Frees its memory on drop, including while unwinding, but *never* drops the contents
/// * Gives up the memory only once a value was written to it (see [`init_with`])
///
/// A value is therefore built into a `RawBox` and handed to a box afterwards. If building the
/// value panics, the `RawBox` is dropped during unwinding and nothing leaks. The same holds in
/// reverse when a box releases its value.
///
/// [`init_with`]: RawBox::init_with
pub(crate) struct RawBox<T> {
    ptr: NonNull<T>,
    marker: PhantomData<T>,
}

impl<T> RawBox<T> {
    /// Allocates storage for a `T` using `alloc`.
    ///
    /// The memory has to be released through [`Global`], so `alloc` must be `Global` or an
    /// adapter around it.
    pub(crate) fn allocate_in<A: AllocRef>(alloc: &mut A) -> Result<Self, A::Error> {
        let ptr = match NonZeroLayout::new::<T>() {
            Ok(layout) => alloc.allocate(layout)?.cast(),
            Err(_) => NonNull::dangling(),
        };
        Ok(Self {
            ptr,
            marker: PhantomData,
        })
    }

    /// Takes back the storage behind `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must come from [`RawBox::init_with`] (or an equivalent allocation from [`Global`]
    /// with `Layout::new::<T>()`), and no one else may own it.
    #[inline]
    pub(crate) unsafe fn from_non_null(ptr: NonNull<T>) -> Self {
        Self {
            ptr,
            marker: PhantomData,
        }
    }

    /// Runs `f` and moves its result into the storage.
    ///
    /// `f` runs only after the storage exists. Ownership of the memory passes to the returned
    /// pointer once the value is written.
    #[inline]
    pub(crate) fn init_with<F: FnOnce() -> T>(self, f: F) -> NonNull<T> {
        let value = f();
        // SAFETY: `ptr` is valid for writes of a `T`, or dangling and well aligned for a ZST.
        unsafe { self.ptr.as_ptr().write(value) };
        let ptr = self.ptr;
        mem::forget(self);
        ptr
    }

    /// Runs the destructor of the contained value, then frees the storage.
    ///
    /// The storage is freed even if the destructor panics.
    ///
    /// # Safety
    ///
    /// The storage must hold an initialized `T`.
    #[inline]
    pub(crate) unsafe fn drop_value(self) {
        // SAFETY: the caller guarantees an initialized value. `self` frees the storage on the
        // way out, even when unwinding.
        self.ptr.as_ptr().drop_in_place();
    }

    /// Moves the contained value out, then frees the storage.
    ///
    /// # Safety
    ///
    /// The storage must hold an initialized `T`.
    #[inline]
    pub(crate) unsafe fn take_value(self) -> T {
        // SAFETY: the caller guarantees an initialized value, which is read exactly once.
        self.ptr.as_ptr().read()
    }
}

impl<T> Drop for RawBox<T> {
    /// Frees the memory owned by the `RawBox` *without* trying to drop its contents.
    fn drop(&mut self) {
        if let Ok(layout) = NonZeroLayout::new::<T>() {
            // SAFETY: a non-zero layout means `ptr` was allocated from `Global` with it.
            unsafe { Global.deallocate(self.ptr.cast(), layout) }
        }
    }
}

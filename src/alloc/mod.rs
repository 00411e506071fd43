//! The allocation facility every box draws its storage from.
//!
//! Boxes never talk to the global allocator directly. Fallible paths go through [`Global`] and
//! surface [`AllocError`], infallible paths wrap it in [`AbortAlloc`].

mod abort;
mod layout;

pub use self::{
    abort::AbortAlloc,
    layout::{Layout, NonZeroLayout},
};
use core::ptr::NonNull;

/// The `AllocError` error indicates an allocation failure that may be due to resource
/// exhaustion or to something wrong with the requested layout.
#[derive(Clone, Copy, PartialEq, Eq, Debug, thiserror::Error)]
#[error("memory allocation of {} bytes (align {}) failed", .layout.size(), .layout.align())]
pub struct AllocError {
    layout: Layout,
}

impl AllocError {
    /// The layout of the allocation request that failed.
    #[inline]
    #[must_use]
    pub fn layout(&self) -> Layout {
        self.layout
    }
}

/// An allocator handing out blocks described by a [`NonZeroLayout`].
///
/// # Safety
///
/// Blocks returned from `allocate` must be valid for `layout` until they are passed to
/// `deallocate` of the same allocator.
pub unsafe trait AllocRef {
    type Error;

    fn allocate(&mut self, layout: NonZeroLayout) -> Result<NonNull<u8>, Self::Error>;

    /// # Safety
    ///
    /// `ptr` must denote a block currently allocated by this allocator with `layout`.
    unsafe fn deallocate(&mut self, ptr: NonNull<u8>, layout: NonZeroLayout);
}

/// The global memory allocator.
///
/// This is the same allocator `std`'s `Box` uses, so pointers obtained from
/// `Box::into_raw` may be owned by a `ValueBox` and vice versa.
#[derive(Copy, Clone, Default, Debug)]
pub struct Global;

unsafe impl AllocRef for Global {
    type Error = AllocError;

    fn allocate(&mut self, layout: NonZeroLayout) -> Result<NonNull<u8>, Self::Error> {
        // SAFETY: `NonZeroLayout` rules out zero-sized requests.
        let raw = unsafe { liballoc::alloc::alloc(layout.into()) };
        NonNull::new(raw).ok_or_else(|| {
            tracing::debug!(
                size = layout.size(),
                align = layout.align(),
                "global allocation failed"
            );
            AllocError {
                layout: layout.into(),
            }
        })
    }

    unsafe fn deallocate(&mut self, ptr: NonNull<u8>, layout: NonZeroLayout) {
        // SAFETY: the caller passes a block allocated here with the same layout.
        liballoc::alloc::dealloc(ptr.as_ptr(), layout.into());
    }
}

use crate::alloc::{AllocRef, NonZeroLayout};
use core::{convert::Infallible, ptr::NonNull};

/// Wraps another allocator and aborts the process on allocation failure.
///
/// `AbortAlloc<Global>` backs every constructor that does not return a `Result`.
#[derive(Default, Copy, Clone, Debug)]
pub struct AbortAlloc<A>(pub A);

#[cold]
fn alloc_abort(layout: NonZeroLayout) -> ! {
    tracing::error!(
        size = layout.size(),
        align = layout.align(),
        "allocator error, aborting"
    );
    liballoc::alloc::handle_alloc_error(layout.into())
}

unsafe impl<A: AllocRef> AllocRef for AbortAlloc<A> {
    type Error = Infallible;

    fn allocate(&mut self, layout: NonZeroLayout) -> Result<NonNull<u8>, Self::Error> {
        self.0.allocate(layout).map_err(|_| alloc_abort(layout))
    }

    unsafe fn deallocate(&mut self, ptr: NonNull<u8>, layout: NonZeroLayout) {
        self.0.deallocate(ptr, layout);
    }
}

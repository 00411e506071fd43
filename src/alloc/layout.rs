pub use core::alloc::Layout;
use core::convert::TryFrom;

/// A zero-sized layout was passed where an allocation is required.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
#[error("zero-sized layouts cannot be allocated")]
pub struct LayoutErr {
    private: (),
}

/// Non-zero Layout of a block of memory.
///
/// Every block handed out by an allocator in this crate is described by a `NonZeroLayout`.
/// Zero-sized values never reach the allocator, so the distinction is made once, here, instead
/// of at every call site.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NonZeroLayout(Layout);

impl NonZeroLayout {
    /// Constructs a `NonZeroLayout` suitable for holding a value of type `T`.
    ///
    /// Returns `Err` if `T` is a ZST.
    #[inline]
    pub fn new<T>() -> Result<Self, LayoutErr> {
        Self::try_from(Layout::new::<T>())
    }

    /// The minimum size in bytes for a memory block of this layout.
    #[inline]
    pub fn size(&self) -> usize {
        self.0.size()
    }

    /// The minimum byte alignment for a memory block of this layout.
    #[inline]
    pub fn align(&self) -> usize {
        self.0.align()
    }
}

impl From<NonZeroLayout> for Layout {
    #[inline]
    fn from(layout: NonZeroLayout) -> Self {
        layout.0
    }
}

impl TryFrom<Layout> for NonZeroLayout {
    type Error = LayoutErr;

    fn try_from(layout: Layout) -> Result<Self, Self::Error> {
        if layout.size() == 0 {
            Err(LayoutErr { private: () })
        } else {
            Ok(Self(layout))
        }
    }
}

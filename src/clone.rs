use crate::alloc::AllocError;

/// Cloning that reports allocation failure instead of aborting.
///
/// This mirrors [`Clone`]: `try_clone` corresponds to `clone`, `try_clone_from` to
/// `clone_from`. Panics raised by the value's own `Clone` impl still unwind.
pub trait TryClone: Sized {
    /// Returns a deep copy of `self`.
    ///
    /// # Errors
    ///
    /// Returns `AllocError` if storage for the copy could not be allocated.
    ///
    /// # Example
    ///
    /// ```
    /// use value_box::{AllocError, TryClone, ValueBox};
    ///
    /// # fn main() -> Result<(), AllocError> {
    /// let a = ValueBox::new(vec![1, 2, 3]);
    /// let b = a.try_clone()?;
    /// assert_eq!(*a, *b);
    /// # Ok(())
    /// # }
    /// ```
    fn try_clone(&self) -> Result<Self, AllocError>;

    /// Performs copy-assignment from `source`.
    ///
    /// # Errors
    ///
    /// Returns `AllocError` if storage for the copy could not be allocated. `self` is left
    /// unchanged in that case.
    fn try_clone_from(&mut self, source: &Self) -> Result<(), AllocError> {
        *self = source.try_clone()?;
        Ok(())
    }
}

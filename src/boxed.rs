//! A deep-copying pointer type for heap allocation.
//!
//! [`ValueBox<T>`] owns at most one heap-allocated `T`. Unlike `Box`, it may be empty, and
//! copying it copies the value it points to. It behaves like the value it holds, not like a
//! handle to shared state.
//!
//! # Examples
//!
//! Copies are deep:
//!
//! ```
//! use value_box::ValueBox;
//!
//! let a = ValueBox::new(String::from("left"));
//! let mut b = a.clone();
//! b.push_str(" and right");
//!
//! assert_eq!(*a, "left");
//! assert_eq!(*b, "left and right");
//! ```
//!
//! Moving out empties the source:
//!
//! ```
//! use value_box::ValueBox;
//!
//! let mut a = ValueBox::new(5);
//! let b = a.take();
//!
//! assert!(a.is_empty());
//! assert_eq!(*b, 5);
//! ```
//!
//! Creating a recursive data structure:
//!
//! ```
//! use value_box::ValueBox;
//!
//! #[derive(Clone, Debug)]
//! struct Tree {
//!     value: i32,
//!     left: ValueBox<Tree>,
//!     right: ValueBox<Tree>,
//! }
//!
//! let leaf = |value| Tree { value, left: ValueBox::empty(), right: ValueBox::empty() };
//! let tree = Tree { value: 2, left: ValueBox::new(leaf(1)), right: ValueBox::new(leaf(3)) };
//!
//! let mut copy = tree.clone();
//! copy.left.value = 10;
//!
//! assert_eq!(tree.left.value, 1);
//! assert_eq!(copy.right.value, tree.right.value);
//! ```
//!
//! `Tree` contains boxes of itself. Nothing about `ValueBox<Tree>` needs `Tree`'s size, so the
//! definition is accepted, and `Clone` for the box is available because `Tree: Clone`.
//!
//! # Memory layout
//!
//! A non-empty box of a non-zero-sized `T` owns memory from the global allocator, allocated with
//! `Layout::new::<T>()`. This is the same layout `Box<T>` uses, so it is valid to convert both
//! ways between a `ValueBox<T>` and a raw pointer obtained from [`Box::into_raw`], or to pass a
//! pointer from [`ValueBox::into_raw`] to [`Box::from_raw`]. For zero-sized `T` nothing is
//! allocated and the pointer is dangling but well-aligned.
//!
//! [`Box::into_raw`]: liballoc::boxed::Box::into_raw
//! [`Box::from_raw`]: liballoc::boxed::Box::from_raw

use crate::{
    alloc::{AbortAlloc, AllocError, AllocRef, Global},
    clone::TryClone,
    raw_box::RawBox,
};
use core::{
    fmt,
    marker::PhantomData,
    mem,
    ops::{Deref, DerefMut},
    ptr::{self, NonNull},
};
use liballoc::boxed::Box;

/// An exclusively owning pointer with value semantics.
///
/// See the [module-level documentation](index.html) for more.
pub struct ValueBox<T> {
    ptr: Option<NonNull<T>>,
    marker: PhantomData<T>,
}

// SAFETY: a `ValueBox<T>` owns its `T` exclusively, like `Box<T>`.
unsafe impl<T: Send> Send for ValueBox<T> {}
unsafe impl<T: Sync> Sync for ValueBox<T> {}

impl<T> ValueBox<T> {
    /// Creates an empty box. This does not allocate.
    ///
    /// # Example
    ///
    /// ```
    /// use value_box::ValueBox;
    ///
    /// let b = ValueBox::<u32>::empty();
    /// assert!(b.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            ptr: None,
            marker: PhantomData,
        }
    }

    /// Allocates memory on the heap and then places `x` into it.
    ///
    /// This doesn't actually allocate if `T` is zero-sized. Aborts on allocation failure.
    ///
    /// # Example
    ///
    /// ```
    /// use value_box::ValueBox;
    ///
    /// let five = ValueBox::new(5);
    /// assert_eq!(*five, 5);
    /// ```
    #[inline]
    #[must_use]
    pub fn new(x: T) -> Self {
        Self::new_with(|| x)
    }

    /// Allocates memory on the heap, then runs `f` and places its result into it.
    ///
    /// If `f` panics, the memory is released before the panic propagates.
    #[inline]
    pub fn new_with<F: FnOnce() -> T>(f: F) -> Self {
        let Ok(b) = Self::try_new_with_in(f, &mut AbortAlloc(Global));
        b
    }

    /// Tries to allocate memory on the heap and then places `x` into it.
    ///
    /// # Example
    ///
    /// ```
    /// use value_box::{AllocError, ValueBox};
    ///
    /// # fn main() -> Result<(), AllocError> {
    /// let five = ValueBox::try_new(5)?;
    /// assert_eq!(*five, 5);
    /// # Ok(())
    /// # }
    /// ```
    #[inline]
    pub fn try_new(x: T) -> Result<Self, AllocError> {
        Self::try_new_with(|| x)
    }

    /// Tries to allocate memory on the heap, then runs `f` and places its result into it.
    ///
    /// `f` is not called if the allocation fails.
    pub fn try_new_with<F: FnOnce() -> T>(f: F) -> Result<Self, AllocError> {
        Self::try_new_with_in(f, &mut Global)
    }

    fn try_new_with_in<F, A>(f: F, alloc: &mut A) -> Result<Self, A::Error>
    where
        F: FnOnce() -> T,
        A: AllocRef,
    {
        let ptr = RawBox::allocate_in(alloc)?.init_with(f);
        Ok(Self {
            ptr: Some(ptr),
            marker: PhantomData,
        })
    }

    /// Constructs a box from a raw pointer.
    ///
    /// After calling this function, the raw pointer is owned by the resulting `ValueBox`. A
    /// null pointer produces an empty box.
    ///
    /// # Safety
    ///
    /// A non-null `raw` must have been allocated in accordance with the [memory layout] used by
    /// `ValueBox`, must point to an initialized `T`, and must not be owned by anything else.
    /// For example, a double-free may occur if the function is called twice on the same raw
    /// pointer.
    ///
    /// # Example
    ///
    /// ```
    /// use value_box::ValueBox;
    ///
    /// let raw = Box::into_raw(Box::new(String::from("owned")));
    /// let b = unsafe { ValueBox::from_raw(raw) };
    /// assert_eq!(*b, "owned");
    /// ```
    ///
    /// [memory layout]: index.html#memory-layout
    #[inline]
    pub unsafe fn from_raw(raw: *mut T) -> Self {
        Self {
            ptr: NonNull::new(raw),
            marker: PhantomData,
        }
    }

    /// Consumes the box, returning the wrapped raw pointer, or null if the box is empty.
    ///
    /// After calling this function, the caller is responsible for the memory previously managed
    /// by the box. The easiest way to release it is to convert the pointer back with
    /// [`ValueBox::from_raw`] or [`Box::from_raw`].
    ///
    /// Note: this is an associated function, which means that you have to call it as
    /// `ValueBox::into_raw(b)` instead of `b.into_raw()`. This is so that there is no conflict
    /// with a method on the inner type.
    ///
    /// # Example
    ///
    /// ```
    /// use value_box::ValueBox;
    ///
    /// let ptr = ValueBox::into_raw(ValueBox::new(41));
    /// let b = unsafe { Box::from_raw(ptr) };
    /// assert_eq!(*b, 41);
    ///
    /// assert!(ValueBox::into_raw(ValueBox::<u8>::empty()).is_null());
    /// ```
    #[inline]
    pub fn into_raw(b: Self) -> *mut T {
        let ptr = b.ptr;
        mem::forget(b);
        ptr.map_or(ptr::null_mut(), NonNull::as_ptr)
    }

    /// Consumes the box, moving the value out of it and releasing the allocation.
    ///
    /// # Example
    ///
    /// ```
    /// use value_box::ValueBox;
    ///
    /// assert_eq!(ValueBox::into_inner(ValueBox::new(vec![1, 2])), Some(vec![1, 2]));
    /// assert_eq!(ValueBox::<u8>::into_inner(ValueBox::empty()), None);
    /// ```
    #[inline]
    pub fn into_inner(mut b: Self) -> Option<T> {
        let ptr = b.ptr.take()?;
        // SAFETY: `ptr` held an initialized value and `b` no longer owns it.
        Some(unsafe { RawBox::from_non_null(ptr).take_value() })
    }

    /// Returns `true` if the box does not own a value.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ptr.is_none()
    }

    /// Returns a shared reference to the value, or `None` if the box is empty.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        // SAFETY: a present pointer always refers to an initialized value owned by `self`.
        self.ptr.map(|ptr| unsafe { &*ptr.as_ptr() })
    }

    /// Returns a mutable reference to the value, or `None` if the box is empty.
    #[inline]
    #[must_use]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        // SAFETY: as in `get`; `&mut self` makes the borrow unique.
        self.ptr.map(|ptr| unsafe { &mut *ptr.as_ptr() })
    }

    /// Returns a shared reference to the value without checking for emptiness.
    ///
    /// # Safety
    ///
    /// The box must not be empty.
    #[inline]
    pub unsafe fn get_unchecked(&self) -> &T {
        // SAFETY: the caller guarantees the box is not empty.
        &*self.ptr.unwrap_unchecked().as_ptr()
    }

    /// Returns a mutable reference to the value without checking for emptiness.
    ///
    /// # Safety
    ///
    /// The box must not be empty.
    #[inline]
    pub unsafe fn get_unchecked_mut(&mut self) -> &mut T {
        // SAFETY: the caller guarantees the box is not empty.
        &mut *self.ptr.unwrap_unchecked().as_ptr()
    }

    /// Returns a raw pointer to the value, or null if the box is empty.
    ///
    /// The box keeps ownership. The pointer is valid until the box is dropped, reset or
    /// assigned to.
    #[inline]
    #[must_use]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.map_or(ptr::null(), |ptr| ptr.as_ptr().cast_const())
    }

    /// Returns a mutable raw pointer to the value, or null if the box is empty.
    #[inline]
    #[must_use]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.map_or(ptr::null_mut(), NonNull::as_ptr)
    }

    /// Drops the value and releases the allocation, leaving the box empty.
    ///
    /// Returns `self` so further assignments can be chained.
    ///
    /// # Example
    ///
    /// ```
    /// use value_box::ValueBox;
    ///
    /// let source = ValueBox::new(7);
    /// let mut b = ValueBox::new(1);
    ///
    /// assert!(b.reset().is_empty());
    /// b.reset().clone_from(&source);
    /// assert_eq!(*b, 7);
    /// ```
    #[inline]
    pub fn reset(&mut self) -> &mut Self {
        if let Some(ptr) = self.ptr.take() {
            // SAFETY: the value was owned by `self`, which is empty now.
            unsafe { RawBox::from_non_null(ptr).drop_value() }
        }
        self
    }

    /// Moves the value out of `self` into a new box, leaving `self` empty.
    ///
    /// This never allocates.
    #[inline]
    #[must_use = "the taken value is dropped immediately otherwise, use `reset` instead"]
    pub fn take(&mut self) -> Self {
        Self {
            ptr: self.ptr.take(),
            marker: PhantomData,
        }
    }

    /// Releases the current value, then takes over the value of `source`, leaving `source`
    /// empty.
    ///
    /// The old value is dropped right away rather than handed back to `source`. The box already
    /// holds the new value when that happens, so a panicking destructor loses nothing.
    ///
    /// # Example
    ///
    /// ```
    /// use value_box::ValueBox;
    ///
    /// let mut a = ValueBox::new("a");
    /// let mut b = ValueBox::new("b");
    ///
    /// a.assign(&mut b);
    /// assert_eq!(*a, "b");
    /// assert!(b.is_empty());
    /// ```
    #[inline]
    pub fn assign(&mut self, source: &mut Self) -> &mut Self {
        let old = mem::replace(&mut self.ptr, source.ptr.take());
        if let Some(ptr) = old {
            // SAFETY: `old` was owned by `self` and is no longer reachable from it.
            unsafe { RawBox::from_non_null(ptr).drop_value() }
        }
        self
    }

    /// Stores `value` in the box.
    ///
    /// A non-empty box assigns `value` into its existing allocation; an empty box allocates.
    #[inline]
    pub fn set(&mut self, value: T) -> &mut Self {
        match self.ptr {
            // SAFETY: `current` is initialized and uniquely borrowed through `&mut self`.
            Some(current) => unsafe { *current.as_ptr() = value },
            None => *self = Self::new(value),
        }
        self
    }

    /// Swaps the allocations of two boxes. No value is moved or copied.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
    }
}

/// Allocates memory on the heap and places `value` into it.
///
/// # Example
///
/// ```
/// use value_box::make_value;
///
/// let b = make_value(String::from("abc"));
/// assert_eq!(*b, String::from("abc"));
/// ```
#[inline]
#[must_use]
pub fn make_value<T>(value: T) -> ValueBox<T> {
    ValueBox::new(value)
}

/// Allocates memory on the heap, then constructs the value with `f`.
///
/// Allocation and construction form one unit: if `f` panics, the allocation is released before
/// the panic propagates.
///
/// # Example
///
/// ```
/// use value_box::make_value_with;
///
/// let b = make_value_with(|| vec![0_u8; 4]);
/// assert_eq!(b.len(), 4);
/// ```
#[inline]
pub fn make_value_with<T, F: FnOnce() -> T>(f: F) -> ValueBox<T> {
    ValueBox::new_with(f)
}

/// Like [`make_value_with`], but returns an error instead of aborting when the allocation fails.
#[inline]
pub fn try_make_value_with<T, F: FnOnce() -> T>(f: F) -> Result<ValueBox<T>, AllocError> {
    ValueBox::try_new_with(f)
}

/// Swaps the allocations of two boxes.
#[inline]
pub fn swap<T>(a: &mut ValueBox<T>, b: &mut ValueBox<T>) {
    a.swap(b);
}

impl<T> Drop for ValueBox<T> {
    fn drop(&mut self) {
        self.reset();
    }
}

impl<T> Default for ValueBox<T> {
    /// Creates an empty box.
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

/// `ValueBox<T>` is `Clone` exactly when `T` is.
///
/// ```compile_fail
/// use value_box::ValueBox;
///
/// struct NotClone;
///
/// fn assert_clone<T: Clone>() {}
/// assert_clone::<ValueBox<NotClone>>();
/// ```
impl<T: Clone> Clone for ValueBox<T> {
    /// Returns a new box with a `clone()` of this box's contents, or an empty box.
    ///
    /// # Examples
    ///
    /// ```
    /// use value_box::ValueBox;
    ///
    /// let x = ValueBox::new(5);
    /// let y = x.clone();
    ///
    /// // The value is the same
    /// assert_eq!(*x, *y);
    ///
    /// // But they are unique objects
    /// assert_ne!(x.as_ptr(), y.as_ptr());
    /// ```
    #[inline]
    fn clone(&self) -> Self {
        match self.get() {
            Some(value) => Self::new_with(|| value.clone()),
            None => Self::empty(),
        }
    }

    /// Copies `source`'s contents into `self`, reusing the existing allocation when both boxes
    /// are non-empty.
    ///
    /// If `self` is empty and cloning panics, `self` stays empty and nothing leaks.
    ///
    /// # Examples
    ///
    /// ```
    /// use value_box::ValueBox;
    ///
    /// let x = ValueBox::new(5);
    /// let mut y = ValueBox::new(10);
    /// let yp = y.as_ptr();
    ///
    /// y.clone_from(&x);
    ///
    /// // The value is the same
    /// assert_eq!(*x, *y);
    ///
    /// // And no allocation occurred
    /// assert_eq!(yp, y.as_ptr());
    /// ```
    fn clone_from(&mut self, source: &Self) {
        match (self.ptr, source.get()) {
            (_, None) => {
                self.reset();
            }
            // SAFETY: `current` is initialized and cannot alias `value`, which `source` owns.
            (Some(current), Some(value)) => unsafe { (*current.as_ptr()).clone_from(value) },
            (None, Some(value)) => *self = Self::new_with(|| value.clone()),
        }
    }
}

impl<T: Clone> TryClone for ValueBox<T> {
    fn try_clone(&self) -> Result<Self, AllocError> {
        match self.get() {
            Some(value) => Self::try_new_with(|| value.clone()),
            None => Ok(Self::empty()),
        }
    }

    fn try_clone_from(&mut self, source: &Self) -> Result<(), AllocError> {
        match (self.ptr, source.get()) {
            (_, None) => {
                self.reset();
            }
            // SAFETY: `current` is initialized and cannot alias `value`, which `source` owns.
            (Some(current), Some(value)) => unsafe { (*current.as_ptr()).clone_from(value) },
            (None, Some(value)) => *self = Self::try_new_with(|| value.clone())?,
        }
        Ok(())
    }
}

impl<T> From<Option<T>> for ValueBox<T> {
    /// `None` becomes an empty box, `Some(t)` a box holding `t`.
    ///
    /// ```
    /// use value_box::ValueBox;
    ///
    /// assert!(ValueBox::<i32>::from(None).is_empty());
    /// assert_eq!(*ValueBox::from(Some(3)), 3);
    /// ```
    fn from(value: Option<T>) -> Self {
        value.map_or_else(Self::empty, Self::new)
    }
}

impl<T> From<Box<T>> for ValueBox<T> {
    /// Takes over the allocation of a `Box`. This does not allocate.
    fn from(b: Box<T>) -> Self {
        // SAFETY: `Box` allocates from the global allocator with `Layout::new::<T>()`.
        unsafe { Self::from_raw(Box::into_raw(b)) }
    }
}

impl<T> From<ValueBox<T>> for Option<Box<T>> {
    /// Hands the allocation to a `Box`, or returns `None` for an empty box.
    fn from(b: ValueBox<T>) -> Self {
        let raw = ValueBox::into_raw(b);
        if raw.is_null() {
            None
        } else {
            // SAFETY: `raw` came from `into_raw` and uses the layout `Box` expects.
            Some(unsafe { Box::from_raw(raw) })
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ValueBox<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => fmt::Debug::fmt(value, f),
            None => f.write_str("null"),
        }
    }
}

impl<T> fmt::Pointer for ValueBox<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.as_ptr(), f)
    }
}

impl<T> Deref for ValueBox<T> {
    type Target = T;

    /// # Panics
    ///
    /// Panics if the box is empty.
    #[track_caller]
    fn deref(&self) -> &T {
        match self.get() {
            Some(value) => value,
            None => empty_deref(),
        }
    }
}

impl<T> DerefMut for ValueBox<T> {
    /// # Panics
    ///
    /// Panics if the box is empty.
    #[track_caller]
    fn deref_mut(&mut self) -> &mut T {
        match self.get_mut() {
            Some(value) => value,
            None => empty_deref(),
        }
    }
}

// One central function responsible for reporting dereferences of empty boxes. This keeps the
// panic machinery out of the inlined `Deref` paths.
#[cold]
#[inline(never)]
#[track_caller]
fn empty_deref() -> ! {
    panic!("dereferenced an empty ValueBox");
}

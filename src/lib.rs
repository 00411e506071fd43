//! A deep-copying, exclusively owning pointer for recursive value types.
//!
//! [`ValueBox<T>`] is a pointer with value semantics: it owns at most one heap-allocated `T`,
//! copying the box copies the value, and moving out of it leaves it empty. It can be a field of
//! the very type it points to, which makes it a building block for trees and linked structures
//! that should behave like plain values.
//!
//! Differences to `Box<T>`
//! -----------------------
//!
//! - A box may be empty. [`ValueBox::empty`], [`Default`] and `ValueBox::from(None)` create an
//!   empty box, [`ValueBox::reset`] clears one. Dereferencing an empty box panics; use
//!   [`ValueBox::get`] for checked access.
//!
//! - Moves are explicit operations that leave the source empty: [`ValueBox::take`] and
//!   [`ValueBox::assign`]. Ordinary Rust moves work as well.
//!
//! - [`Clone::clone_from`] reuses the existing allocation when both boxes hold a value.
//!
//! - Every allocating operation has a fallible counterpart returning [`AllocError`]:
//!   [`ValueBox::try_new`], [`ValueBox::try_new_with`], [`try_make_value_with`] and the
//!   [`TryClone`] trait. The infallible versions abort on allocation failure.
//!
//! - Allocation and construction are one unit. [`make_value_with`] allocates first and then
//!   runs the constructor, and a panicking constructor or `Clone` impl never leaks the storage.
//!
//! Features
//! --------
//!
//! - `std` (default): link against `std`. Without it the crate is `#![no_std]` and only needs
//!   `alloc`.
//!
//! Allocation failures are reported through [`tracing`] events. The crate never installs a
//! subscriber.

#![cfg_attr(not(feature = "std"), no_std)]
#![doc(test(attr(
    deny(
        future_incompatible,
        nonstandard_style,
        rust_2018_compatibility,
        rust_2018_idioms,
        unused,
        macro_use_extern_crate,
        trivial_casts,
        trivial_numeric_casts,
        unused_import_braces,
        unused_lifetimes,
        unused_qualifications,
    ),
    allow(unused_extern_crates)
)))]
#![warn(
    future_incompatible,
    nonstandard_style,
    rust_2018_compatibility,
    rust_2018_idioms,
    unused,
    macro_use_extern_crate,
    single_use_lifetimes,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_lifetimes,
    unused_qualifications
)]
#![allow(clippy::module_name_repetitions)]

mod alloc;
pub mod boxed;
mod clone;
mod raw_box;

extern crate alloc as liballoc;

pub use self::{
    alloc::AllocError,
    boxed::{make_value, make_value_with, swap, try_make_value_with, ValueBox},
    clone::TryClone,
};

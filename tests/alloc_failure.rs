mod common;

use common::{clear_pending_failure, fail_next_allocation};
use std::{alloc::Layout, cell::Cell};
use value_box::{try_make_value_with, AllocError, TryClone, ValueBox};

#[test]
fn try_new_reports_the_failed_layout() {
    fail_next_allocation();
    let err: AllocError = ValueBox::try_new([0_u64; 3]).unwrap_err();
    assert_eq!(err.layout(), Layout::new::<[u64; 3]>());
    assert_eq!(
        err.to_string(),
        "memory allocation of 24 bytes (align 8) failed"
    );
}

#[test]
fn constructor_does_not_run_without_storage() {
    let called = Cell::new(false);

    fail_next_allocation();
    let result = try_make_value_with(|| {
        called.set(true);
        5_u32
    });
    assert!(result.is_err());
    assert!(!called.get());

    let b = try_make_value_with(|| {
        called.set(true);
        5_u32
    })
    .unwrap();
    assert!(called.get());
    assert_eq!(*b, 5);
}

#[test]
fn try_clone_surfaces_failure() {
    let original = ValueBox::new(11_u64);

    fail_next_allocation();
    assert!(original.try_clone().is_err());
    assert_eq!(*original.try_clone().unwrap(), 11);
}

#[test]
fn try_clone_from_leaves_empty_target_unchanged() {
    let source = ValueBox::new(12_u64);
    let mut target = ValueBox::<u64>::empty();

    fail_next_allocation();
    assert!(target.try_clone_from(&source).is_err());
    assert!(target.is_empty());

    target.try_clone_from(&source).unwrap();
    assert_eq!(*target, 12);
}

#[test]
fn try_clone_from_into_existing_storage_needs_no_allocation() {
    let source = ValueBox::new(13_u64);
    let mut target = ValueBox::new(0_u64);

    fail_next_allocation();
    target.try_clone_from(&source).unwrap();
    assert_eq!(*target, 13);
    assert!(clear_pending_failure());
}

#[test]
fn zero_sized_values_never_reach_the_allocator() {
    fail_next_allocation();
    let unit = ValueBox::try_new(()).unwrap();
    assert!(!unit.is_empty());
    assert!(clear_pending_failure());
}

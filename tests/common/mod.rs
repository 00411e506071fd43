//! A global allocator for integration tests.
//!
//! It forwards to `System` and keeps per-thread books, so tests running in parallel do not see
//! each other's allocations. It can also be told to fail the next allocation on the current
//! thread.
#![allow(dead_code)]

use std::{
    alloc::{GlobalAlloc, Layout, System},
    cell::Cell,
};

struct Instrumented;

thread_local! {
    static ALLOCATED: Cell<usize> = const { Cell::new(0) };
    static FREED: Cell<usize> = const { Cell::new(0) };
    static FAIL_NEXT: Cell<bool> = const { Cell::new(false) };
}

unsafe impl GlobalAlloc for Instrumented {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if FAIL_NEXT.with(|fail| fail.replace(false)) {
            return std::ptr::null_mut();
        }
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            ALLOCATED.with(|n| n.set(n.get() + 1));
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        FREED.with(|n| n.set(n.get() + 1));
        System.dealloc(ptr, layout);
    }
}

#[global_allocator]
static GLOBAL: Instrumented = Instrumented;

/// Allocation counts of the current thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stats {
    pub allocated: usize,
    pub freed: usize,
}

impl Stats {
    pub fn now() -> Self {
        Self {
            allocated: ALLOCATED.with(Cell::get),
            freed: FREED.with(Cell::get),
        }
    }

    /// Counts since `self` was taken.
    pub fn since(self) -> Self {
        let now = Self::now();
        Self {
            allocated: now.allocated - self.allocated,
            freed: now.freed - self.freed,
        }
    }
}

/// Runs `f` and returns its result together with the allocations it made and released.
pub fn track<R>(f: impl FnOnce() -> R) -> (R, Stats) {
    let start = Stats::now();
    let result = f();
    (result, start.since())
}

/// Makes the next allocation on this thread return null.
pub fn fail_next_allocation() {
    FAIL_NEXT.with(|fail| fail.set(true));
}

/// Clears a pending failure, returning whether one was still pending.
pub fn clear_pending_failure() -> bool {
    FAIL_NEXT.with(|fail| fail.replace(false))
}

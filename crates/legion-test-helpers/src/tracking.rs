//! Allocation tracking for tick-path tests.
//!
//! Register [`TrackingAllocator`] as the global allocator of a test binary,
//! then wrap the code under test with [`track`]:
//!
//! ```rust,ignore
//! #[global_allocator]
//! static ALLOC: legion_test_helpers::tracking::TrackingAllocator =
//!     legion_test_helpers::tracking::TrackingAllocator;
//!
//! let guard = legion_test_helpers::track();
//! controller.tick();
//! legion_test_helpers::assert_allocation_free!(guard, "tick");
//! ```

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

thread_local! {
    static ALLOCATION_COUNT: Cell<usize> = const { Cell::new(0) };
    static ALLOCATION_BYTES: Cell<usize> = const { Cell::new(0) };
    static TRACKING_ENABLED: Cell<bool> = const { Cell::new(false) };
}

/// System allocator that counts allocations on threads with tracking enabled.
pub struct TrackingAllocator;

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() && TRACKING_ENABLED.with(|e| e.get()) {
            ALLOCATION_COUNT.with(|count| count.set(count.get().saturating_add(1)));
            ALLOCATION_BYTES.with(|bytes| bytes.set(bytes.get().saturating_add(layout.size())));
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = unsafe { System.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() && TRACKING_ENABLED.with(|e| e.get()) {
            ALLOCATION_COUNT.with(|count| count.set(count.get().saturating_add(1)));
            ALLOCATION_BYTES.with(|bytes| {
                bytes.set(bytes.get().saturating_add(new_size.saturating_sub(layout.size())));
            });
        }
        new_ptr
    }
}

/// Counts allocations made on this thread while alive.
pub struct AllocationGuard {
    start_count: usize,
    start_bytes: usize,
}

impl AllocationGuard {
    pub fn new() -> Self {
        TRACKING_ENABLED.with(|e| e.set(true));
        Self {
            start_count: ALLOCATION_COUNT.with(|c| c.get()),
            start_bytes: ALLOCATION_BYTES.with(|b| b.get()),
        }
    }

    pub fn allocations(&self) -> usize {
        ALLOCATION_COUNT
            .with(|count| count.get())
            .saturating_sub(self.start_count)
    }

    pub fn bytes(&self) -> usize {
        ALLOCATION_BYTES
            .with(|bytes| bytes.get())
            .saturating_sub(self.start_bytes)
    }

    pub fn has_allocations(&self) -> bool {
        self.allocations() > 0
    }
}

impl Default for AllocationGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AllocationGuard {
    fn drop(&mut self) {
        TRACKING_ENABLED.with(|e| e.set(false));
    }
}

/// Start counting allocations on this thread.
pub fn track() -> AllocationGuard {
    AllocationGuard::new()
}

/// Fail if the guarded code allocated.
#[macro_export]
macro_rules! assert_allocation_free {
    ($guard:expr, $context:expr) => {
        let guard = &$guard;
        let allocs = guard.allocations();
        if allocs > 0 {
            panic!(
                "tick path allocated in '{}': {} allocations ({} bytes) at {}:{}",
                $context,
                allocs,
                guard.bytes(),
                file!(),
                line!()
            );
        }
    };
}

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicUsize, Ordering};

/// System allocator wrapper tracking live bytes, the live-byte high-water mark
/// and the number of allocation calls since the last [`reset`](Self::reset).
pub struct CountingAlloc {
    live: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

#[derive(Clone, Copy, Debug)]
pub struct AllocSnapshot {
    pub peak_bytes: usize,
    pub calls: usize,
}

impl CountingAlloc {
    pub const fn new() -> Self {
        Self {
            live: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Start a fresh measurement window. Bytes already live stay counted so
    /// the peak is relative to the current footprint.
    pub fn reset(&self) {
        self.peak
            .store(self.live.load(Ordering::SeqCst), Ordering::SeqCst);
        self.calls.store(0, Ordering::SeqCst);
    }

    /// Run `f` inside a fresh window and report the growth it caused.
    pub fn measure<T>(&self, f: impl FnOnce() -> T) -> (T, AllocSnapshot) {
        self.reset();
        let baseline = self.live.load(Ordering::SeqCst);
        let out = f();
        let snapshot = AllocSnapshot {
            peak_bytes: self.peak.load(Ordering::SeqCst).saturating_sub(baseline),
            calls: self.calls.load(Ordering::SeqCst),
        };
        (out, snapshot)
    }

    fn grow(&self, bytes: usize) {
        let live = self.live.fetch_add(bytes, Ordering::SeqCst) + bytes;
        self.peak.fetch_max(live, Ordering::SeqCst);
    }

    fn shrink(&self, bytes: usize) {
        let _ = self
            .live
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |live| {
                Some(live.saturating_sub(bytes))
            });
    }
}

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            self.grow(layout.size());
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
        self.shrink(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let moved = unsafe { System.realloc(ptr, layout, new_size) };
        if !moved.is_null() {
            self.shrink(layout.size());
            self.grow(new_size);
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
        moved
    }
}

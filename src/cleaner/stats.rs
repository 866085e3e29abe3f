use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Shared counters updated by concurrent removals.
#[derive(Debug, Default)]
pub struct Stats {
    removed: AtomicUsize,
    failed: AtomicUsize,
    freed_mb: AtomicU64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a confirmed removal of `size_mb` megabytes.
    pub fn record_removed(&self, size_mb: u64) {
        self.removed.fetch_add(1, Ordering::Relaxed);
        self.freed_mb.fetch_add(size_mb, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn removed(&self) -> usize {
        self.removed.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn freed_mb(&self) -> u64 {
        self.freed_mb.load(Ordering::Relaxed)
    }
}

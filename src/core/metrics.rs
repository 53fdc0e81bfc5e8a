//! Stream metrics for observability
//!
//! Counters for emitted, filtered and written events, plus the writes that
//! were discarded because the sink's storage was exhausted.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for log stream observability
///
/// # Example
///
/// ```
/// use rust_log_stream::StreamMetrics;
///
/// let metrics = StreamMetrics::new();
///
/// metrics.record_emitted();
/// metrics.record_written();
///
/// assert_eq!(metrics.emitted(), 1);
/// assert_eq!(metrics.written(), 1);
/// ```
#[derive(Debug)]
pub struct StreamMetrics {
    /// Events accepted by the level filter
    emitted: AtomicU64,

    /// Events rejected by the level filter
    filtered: AtomicU64,

    /// Lines successfully written to the sink
    written: AtomicU64,

    /// Lines silently discarded because the device had no space left
    discarded: AtomicU64,

    /// Lines lost to any other sink error
    write_failures: AtomicU64,

    /// Lines written by a shutdown flush rather than the drain loop
    flushed_on_shutdown: AtomicU64,
}

impl StreamMetrics {
    pub const fn new() -> Self {
        Self {
            emitted: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            written: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            flushed_on_shutdown: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn emitted(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn discarded(&self) -> u64 {
        self.discarded.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flushed_on_shutdown(&self) -> u64 {
        self.flushed_on_shutdown.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_emitted(&self) -> u64 {
        self.emitted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self) -> u64 {
        self.written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_discarded(&self) -> u64 {
        self.discarded.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_flushed(&self, count: u64) -> u64 {
        self.flushed_on_shutdown.fetch_add(count, Ordering::Relaxed)
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.emitted.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.written.store(0, Ordering::Relaxed);
        self.discarded.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
        self.flushed_on_shutdown.store(0, Ordering::Relaxed);
    }
}

impl Default for StreamMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for StreamMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            emitted: AtomicU64::new(self.emitted()),
            filtered: AtomicU64::new(self.filtered()),
            written: AtomicU64::new(self.written()),
            discarded: AtomicU64::new(self.discarded()),
            write_failures: AtomicU64::new(self.write_failures()),
            flushed_on_shutdown: AtomicU64::new(self.flushed_on_shutdown()),
        }
    }
}

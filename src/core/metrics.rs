//! Logger metrics for observability
//!
//! Counts what happened to each record after it was built: written to the
//! sink, filtered by the level threshold, or dropped because the sink failed.

use std::sync::atomic::{AtomicU64, Ordering};

/// Record counters for one logger
///
/// # Example
///
/// ```
/// use rust_status_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_written();
/// metrics.record_filtered();
///
/// assert_eq!(metrics.written_count(), 1);
/// assert_eq!(metrics.total_built(), 2);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records rendered and accepted by the sink
    written_count: AtomicU64,

    /// Records below the configured level (built, never rendered)
    filtered_count: AtomicU64,

    /// Records the sink failed to accept
    dropped_count: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            written_count: AtomicU64::new(0),
            filtered_count: AtomicU64::new(0),
            dropped_count: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn written_count(&self) -> u64 {
        self.written_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered_count(&self) -> u64 {
        self.filtered_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    /// Every record built, whatever happened to it
    pub fn total_built(&self) -> u64 {
        self.written_count() + self.filtered_count() + self.dropped_count()
    }

    /// Record a written entry; returns the previous count
    #[inline]
    pub fn record_written(&self) -> u64 {
        self.written_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped_count.fetch_add(1, Ordering::Relaxed)
    }

    /// Get drop rate among records that reached the sink, as a percentage
    ///
    /// Returns 0.0 if nothing reached the sink.
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped_count() as f64;
        let total = self.written_count() as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

//! Dispatch counters for a log handler
//!
//! Every `output` call ends in exactly one of three outcomes: filtered by
//! the debug/level gates, delivered to every appender, or dropped by at least
//! one failing appender. Structured side records are tallied separately.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Counter {
    Logged,
    Dropped,
    Filtered,
    Structured,
}

impl Counter {
    const COUNT: usize = 4;

    const fn index(self) -> usize {
        self as usize
    }
}

/// Lock-free counters shared by every clone of a handler
///
/// # Example
///
/// ```
/// use policy_engine_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_logged();
/// metrics.record_dropped();
///
/// let snapshot = metrics.snapshot();
/// assert_eq!(snapshot.logged, 1);
/// assert_eq!(snapshot.dropped, 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    counters: [AtomicU64; Counter::COUNT],
}

/// Point-in-time copy of [`LoggerMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub logged: u64,
    pub dropped: u64,
    pub filtered: u64,
    pub structured: u64,
}

impl MetricsSnapshot {
    /// Percentage of dispatched entries lost to appenders (0.0 - 100.0)
    pub fn drop_rate(&self) -> f64 {
        let dispatched = self.logged + self.dropped;
        if dispatched == 0 {
            return 0.0;
        }
        self.dropped as f64 * 100.0 / dispatched as f64
    }
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            counters: [
                AtomicU64::new(0),
                AtomicU64::new(0),
                AtomicU64::new(0),
                AtomicU64::new(0),
            ],
        }
    }

    #[inline]
    fn bump(&self, counter: Counter) {
        self.counters[counter.index()].fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn get(&self, counter: Counter) -> u64 {
        self.counters[counter.index()].load(Ordering::Relaxed)
    }

    pub(crate) fn record_logged(&self) {
        self.bump(Counter::Logged);
    }

    pub(crate) fn record_dropped(&self) {
        self.bump(Counter::Dropped);
    }

    pub(crate) fn record_filtered(&self) {
        self.bump(Counter::Filtered);
    }

    pub(crate) fn record_structured(&self) {
        self.bump(Counter::Structured);
    }

    /// Entries every appender accepted
    pub fn total_logged(&self) -> u64 {
        self.get(Counter::Logged)
    }

    /// Entries at least one appender failed to write
    pub fn dropped_count(&self) -> u64 {
        self.get(Counter::Dropped)
    }

    pub fn filtered_count(&self) -> u64 {
        self.get(Counter::Filtered)
    }

    pub fn structured_emitted(&self) -> u64 {
        self.get(Counter::Structured)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            logged: self.total_logged(),
            dropped: self.dropped_count(),
            filtered: self.filtered_count(),
            structured: self.structured_emitted(),
        }
    }

    pub fn drop_rate(&self) -> f64 {
        self.snapshot().drop_rate()
    }

    pub fn reset(&self) {
        for counter in &self.counters {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

//! Logger metrics for observability
//!
//! Counters for the write path: records written, outputs that failed,
//! records that could not be formatted and formatter diagnostics.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use rust_structured_log::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_write_error();
/// metrics.record_logged();
///
/// assert_eq!(metrics.write_errors(), 1);
/// assert_eq!(metrics.total_logged(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records written to at least one output
    total_logged: AtomicU64,

    /// Individual output writes that failed or panicked
    write_errors: AtomicU64,

    /// Records that were never written because formatting failed
    dropped_count: AtomicU64,

    /// Non-fatal formatter diagnostics, e.g. reserved-key collisions
    formatter_warnings: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            total_logged: AtomicU64::new(0),
            write_errors: AtomicU64::new(0),
            dropped_count: AtomicU64::new(0),
            formatter_warnings: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn total_logged(&self) -> u64 {
        self.total_logged.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_errors(&self) -> u64 {
        self.write_errors.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn formatter_warnings(&self) -> u64 {
        self.formatter_warnings.load(Ordering::Relaxed)
    }

    /// Record a written entry, returning the previous count
    #[inline]
    pub fn record_logged(&self) -> u64 {
        self.total_logged.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_error(&self) -> u64 {
        self.write_errors.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_formatter_warning(&self) -> u64 {
        self.formatter_warnings.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of records that were dropped or hit a failing output, as a percentage
    ///
    /// Returns 0.0 if nothing has been processed.
    pub fn error_rate(&self) -> f64 {
        let failed = (self.dropped_count() + self.write_errors()) as f64;
        let total = self.total_logged() as f64 + self.dropped_count() as f64;
        if total == 0.0 {
            0.0
        } else {
            (failed / total).min(1.0) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.total_logged.store(0, Ordering::Relaxed);
        self.write_errors.store(0, Ordering::Relaxed);
        self.dropped_count.store(0, Ordering::Relaxed);
        self.formatter_warnings.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            total_logged: AtomicU64::new(self.total_logged()),
            write_errors: AtomicU64::new(self.write_errors()),
            dropped_count: AtomicU64::new(self.dropped_count()),
            formatter_warnings: AtomicU64::new(self.formatter_warnings()),
        }
    }
}

//! Logger metrics for observability
//!
//! Counters for records delivered, failed attempts and bytes written.
//! They are atomics so they can be read without taking the logger's lock.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use fanout_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_logged(42);
/// metrics.record_write_failure();
///
/// assert_eq!(metrics.total_logged(), 1);
/// assert_eq!(metrics.bytes_written(), 42);
/// assert_eq!(metrics.write_failures(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records whose last attempt reached every appender
    total_logged: AtomicU64,

    /// Records given up on after all attempts
    total_failed: AtomicU64,

    /// Attempts where at least one appender failed
    write_failures: AtomicU64,

    /// Attempts where the record could not be serialized
    serialization_failures: AtomicU64,

    /// Attempts beyond the first
    retries: AtomicU64,

    /// Bytes accepted by appenders, summed over all of them
    bytes_written: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            total_logged: AtomicU64::new(0),
            total_failed: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            serialization_failures: AtomicU64::new(0),
            retries: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn total_logged(&self) -> u64 {
        self.total_logged.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn total_failed(&self) -> u64 {
        self.total_failed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn serialization_failures(&self) -> u64 {
        self.serialization_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn retries(&self) -> u64 {
        self.retries.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    /// Record a delivered record of `bytes` total bytes
    #[inline]
    pub fn record_logged(&self, bytes: usize) -> u64 {
        self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
        self.total_logged.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a record that exhausted its attempts
    #[inline]
    pub fn record_failed(&self) -> u64 {
        self.total_failed.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a failed write attempt; partial bytes still count as written
    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_partial_bytes(&self, bytes: usize) {
        self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_serialization_failure(&self) -> u64 {
        self.serialization_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_retry(&self) -> u64 {
        self.retries.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of records given up on, as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if no records have been processed.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.total_failed() as f64;
        let total = self.total_logged() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.total_logged.store(0, Ordering::Relaxed);
        self.total_failed.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
        self.serialization_failures.store(0, Ordering::Relaxed);
        self.retries.store(0, Ordering::Relaxed);
        self.bytes_written.store(0, Ordering::Relaxed);
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
            total_failed: AtomicU64::new(self.total_failed()),
            write_failures: AtomicU64::new(self.write_failures()),
            serialization_failures: AtomicU64::new(self.serialization_failures()),
            retries: AtomicU64::new(self.retries()),
            bytes_written: AtomicU64::new(self.bytes_written()),
        }
    }
}

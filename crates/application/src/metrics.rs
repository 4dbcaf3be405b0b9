//! Metrics for the remote log appender
//!
//! Counts appended lines, flush outcomes and bytes written to the remote
//! object.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector for one appender
#[derive(Debug, Default)]
pub struct AppenderMetrics {
    /// Lines accepted into the buffer
    lines_appended: AtomicU64,
    /// Successful flushes
    flushes: AtomicU64,
    /// Flushes that failed on read or write
    failed_flushes: AtomicU64,
    /// Lines persisted by successful flushes
    lines_flushed: AtomicU64,
    /// Bytes of buffered lines persisted by successful flushes
    bytes_written: AtomicU64,
    /// Size of the remote object after the last successful flush
    object_size_bytes: AtomicU64,
    /// Largest number of lines held at once
    peak_buffered_lines: AtomicU64,
}

impl AppenderMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a line entering the buffer
    pub fn record_append(&self, buffered_lines: usize) {
        self.lines_appended.fetch_add(1, Ordering::Relaxed);

        // Update peak usage
        let buffered = buffered_lines as u64;
        let mut current_peak = self.peak_buffered_lines.load(Ordering::Relaxed);
        while buffered > current_peak {
            match self.peak_buffered_lines.compare_exchange_weak(
                current_peak,
                buffered,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(val) => current_peak = val,
            }
        }
    }

    /// Record a successful flush
    pub fn record_flush(&self, lines: usize, bytes_written: usize, object_size_bytes: usize) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
        self.lines_flushed.fetch_add(lines as u64, Ordering::Relaxed);
        self.bytes_written
            .fetch_add(bytes_written as u64, Ordering::Relaxed);
        self.object_size_bytes
            .store(object_size_bytes as u64, Ordering::Relaxed);
    }

    pub fn record_failed_flush(&self) {
        self.failed_flushes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot::from(self)
    }
}

/// Snapshot of metrics for reporting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub lines_appended: u64,
    pub flushes: u64,
    pub failed_flushes: u64,
    pub lines_flushed: u64,
    pub bytes_written: u64,
    pub object_size_bytes: u64,
    pub peak_buffered_lines: u64,
}

impl From<&AppenderMetrics> for MetricsSnapshot {
    fn from(metrics: &AppenderMetrics) -> Self {
        Self {
            lines_appended: metrics.lines_appended.load(Ordering::Relaxed),
            flushes: metrics.flushes.load(Ordering::Relaxed),
            failed_flushes: metrics.failed_flushes.load(Ordering::Relaxed),
            lines_flushed: metrics.lines_flushed.load(Ordering::Relaxed),
            bytes_written: metrics.bytes_written.load(Ordering::Relaxed),
            object_size_bytes: metrics.object_size_bytes.load(Ordering::Relaxed),
            peak_buffered_lines: metrics.peak_buffered_lines.load(Ordering::Relaxed),
        }
    }
}

//! Connection Metrics
//!
//! Counters describing what a [`Connection`](crate::network::connection::Connection)
//! has sent, discarded and received.
//!
//! Uses atomic counters so a snapshot can be taken through a shared reference.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Per-connection traffic counters
#[derive(Debug)]
pub struct ConnectionMetrics {
    /// Flushes that handed bytes to the transport
    pub messages_sent: AtomicU64,
    /// Total bytes handed to the transport
    pub bytes_sent: AtomicU64,
    /// Flushes rejected by the transport
    pub send_errors: AtomicU64,
    /// Built messages dropped before flush
    pub messages_discarded: AtomicU64,
    /// Bytes dropped before flush
    pub bytes_discarded: AtomicU64,
    /// Bytes appended to the receive buffer
    pub bytes_received: AtomicU64,
    /// Bytes consumed by completed reads
    pub bytes_consumed: AtomicU64,
    /// Creation time for uptime calculation
    start_time: Instant,
}

impl ConnectionMetrics {
    pub fn new() -> Self {
        Self {
            messages_sent: AtomicU64::new(0),
            bytes_sent: AtomicU64::new(0),
            send_errors: AtomicU64::new(0),
            messages_discarded: AtomicU64::new(0),
            bytes_discarded: AtomicU64::new(0),
            bytes_received: AtomicU64::new(0),
            bytes_consumed: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a transmitted message
    pub fn message_sent(&self, byte_count: u64) {
        self.messages_sent.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a transport rejection
    pub fn send_error(&self) {
        self.send_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a message dropped before flush
    pub fn message_discarded(&self, byte_count: u64) {
        self.messages_discarded.fetch_add(1, Ordering::Relaxed);
        self.bytes_discarded.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record incoming bytes
    pub fn received(&self, byte_count: u64) {
        self.bytes_received.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record bytes released from the receive buffer
    pub fn consumed(&self, byte_count: u64) {
        self.bytes_consumed.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            send_errors: self.send_errors.load(Ordering::Relaxed),
            messages_discarded: self.messages_discarded.load(Ordering::Relaxed),
            bytes_discarded: self.bytes_discarded.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            bytes_consumed: self.bytes_consumed.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            messages_sent = snapshot.messages_sent,
            bytes_sent = snapshot.bytes_sent,
            send_errors = snapshot.send_errors,
            messages_discarded = snapshot.messages_discarded,
            bytes_discarded = snapshot.bytes_discarded,
            bytes_received = snapshot.bytes_received,
            bytes_consumed = snapshot.bytes_consumed,
            uptime_seconds = snapshot.uptime_seconds,
            "Connection metrics snapshot"
        );
    }
}

impl Default for ConnectionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub messages_sent: u64,
    pub bytes_sent: u64,
    pub send_errors: u64,
    pub messages_discarded: u64,
    pub bytes_discarded: u64,
    pub bytes_received: u64,
    pub bytes_consumed: u64,
    pub uptime_seconds: u64,
}

/// Timer for measuring operation duration
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start timing an operation
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        debug!(
            operation = self.operation,
            duration_us = duration.as_micros() as u64,
            "Operation completed"
        );
    }
}

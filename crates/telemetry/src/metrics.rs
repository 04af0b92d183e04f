//! In-process job metrics.
//!
//! Counters live for the lifetime of the process, which on Lambda spans every
//! invocation served by a warm container.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A counter metric.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Histogram for latency tracking.
#[derive(Debug)]
pub struct Histogram {
    /// Buckets: 10ms, 50ms, 100ms, 250ms, 500ms, 1s, 2.5s, 5s, 10s, 30s
    buckets: [AtomicU64; 10],
    sum: AtomicU64,
    count: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    const BUCKET_BOUNDS: [u64; 10] = [10, 50, 100, 250, 500, 1000, 2500, 5000, 10000, 30000];

    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Records a value in milliseconds.
    pub fn observe(&self, ms: u64) {
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        let index = Self::BUCKET_BOUNDS
            .iter()
            .position(|&bound| ms <= bound)
            .unwrap_or(Self::BUCKET_BOUNDS.len() - 1);
        self.buckets[index].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn sum(&self) -> u64 {
        self.sum.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum() as f64 / count as f64
        }
    }

    /// Returns bucket counts.
    pub fn buckets(&self) -> Vec<(u64, u64)> {
        Self::BUCKET_BOUNDS
            .iter()
            .zip(self.buckets.iter())
            .map(|(&bound, count)| (bound, count.load(Ordering::Relaxed)))
            .collect()
    }
}

/// Collected metrics for the planner and cleanup jobs.
#[derive(Debug, Default)]
pub struct Metrics {
    // Planner
    pub tables_planned: Counter,
    pub work_items_enqueued: Counter,
    pub enqueue_failures: Counter,

    // Cleanup
    pub work_items_processed: Counter,
    pub tables_cleaned: Counter,
    pub tables_skipped: Counter,
    pub delete_batches: Counter,
    pub versions_deleted: Counter,
    pub versions_not_deleted: Counter,

    // Ledger
    pub audit_records_written: Counter,

    pub delete_batch_latency_ms: Histogram,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub tables_planned: u64,
    pub work_items_enqueued: u64,
    pub enqueue_failures: u64,
    pub work_items_processed: u64,
    pub tables_cleaned: u64,
    pub tables_skipped: u64,
    pub delete_batches: u64,
    pub versions_deleted: u64,
    pub versions_not_deleted: u64,
    pub audit_records_written: u64,
    pub delete_batch_latency_mean_ms: f64,
}

impl Metrics {
    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            tables_planned: self.tables_planned.get(),
            work_items_enqueued: self.work_items_enqueued.get(),
            enqueue_failures: self.enqueue_failures.get(),
            work_items_processed: self.work_items_processed.get(),
            tables_cleaned: self.tables_cleaned.get(),
            tables_skipped: self.tables_skipped.get(),
            delete_batches: self.delete_batches.get(),
            versions_deleted: self.versions_deleted.get(),
            versions_not_deleted: self.versions_not_deleted.get(),
            audit_records_written: self.audit_records_written.get(),
            delete_batch_latency_mean_ms: self.delete_batch_latency_ms.mean(),
        }
    }
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}

/// Logs the process-lifetime totals.
pub fn log_metrics_snapshot() {
    let s = metrics().snapshot();
    tracing::info!(
        tables_planned = s.tables_planned,
        work_items_enqueued = s.work_items_enqueued,
        enqueue_failures = s.enqueue_failures,
        work_items_processed = s.work_items_processed,
        tables_cleaned = s.tables_cleaned,
        tables_skipped = s.tables_skipped,
        delete_batches = s.delete_batches,
        versions_deleted = s.versions_deleted,
        versions_not_deleted = s.versions_not_deleted,
        audit_records_written = s.audit_records_written,
        delete_batch_latency_mean_ms = s.delete_batch_latency_mean_ms,
        "Process metrics"
    );
}

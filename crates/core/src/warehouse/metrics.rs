//! Lightweight operational counters.
//!
//! These are plain atomics, not a metrics pipeline. The service bumps them
//! on every request and exposes a point-in-time snapshot through
//! [`WarehouseService::stats`](crate::warehouse::service::WarehouseService::stats).

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Monotonic counters tracked by the warehouse service.
#[derive(Debug, Default)]
pub struct WarehouseMetrics {
    hits: AtomicU64,
    misses: AtomicU64,
    upstream_calls: AtomicU64,
    missing_range_segments: AtomicU64,
}

impl WarehouseMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// A requested range was served entirely from the store.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// A requested range needed at least one upstream fetch.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of distinct missing segments detected for one miss.
    pub fn record_missing_segments(&self, count: usize) {
        self.missing_range_segments
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// One round trip to the upstream provider.
    pub fn record_upstream_call(&self) {
        self.upstream_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters.
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            upstream_calls: self.upstream_calls.load(Ordering::Relaxed),
            missing_range_segments: self.missing_range_segments.load(Ordering::Relaxed),
        }
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.upstream_calls.store(0, Ordering::Relaxed);
        self.missing_range_segments.store(0, Ordering::Relaxed);
    }
}

/// Counter values at a single point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub upstream_calls: u64,
    pub missing_range_segments: u64,
}

impl CounterSnapshot {
    /// Hit fraction over all requests seen so far. `None` before the first
    /// request.
    pub fn hit_ratio(&self) -> Option<f64> {
        let total = self.hits + self.misses;
        if total == 0 {
            None
        } else {
            Some(self.hits as f64 / total as f64)
        }
    }
}

/// Counters plus the current on-disk footprint of the store.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseStats {
    #[serde(flatten)]
    pub counters: CounterSnapshot,
    pub store_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let metrics = WarehouseMetrics::new();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_miss();
        metrics.record_missing_segments(3);
        metrics.record_upstream_call();

        let snap = metrics.snapshot();
        assert_eq!(snap.hits, 2);
        assert_eq!(snap.misses, 1);
        assert_eq!(snap.upstream_calls, 1);
        assert_eq!(snap.missing_range_segments, 3);
    }

    #[test]
    fn reset_clears_everything() {
        let metrics = WarehouseMetrics::new();
        metrics.record_hit();
        metrics.record_miss();
        metrics.reset();

        let snap = metrics.snapshot();
        assert_eq!(snap.hits, 0);
        assert_eq!(snap.misses, 0);
    }

    #[test]
    fn hit_ratio_is_none_before_traffic() {
        assert_eq!(WarehouseMetrics::new().snapshot().hit_ratio(), None);
    }

    #[test]
    fn hit_ratio_reflects_counts() {
        let metrics = WarehouseMetrics::new();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_miss();
        assert_eq!(metrics.snapshot().hit_ratio(), Some(0.75));
    }
}

//! Warehouse runtime configuration.

use std::thread::available_parallelism;
use std::time::Duration;

use crate::warehouse::constants::{
    DEFAULT_COVERAGE_RATIO_THRESHOLD, DEFAULT_FETCH_TIMEOUT_SECS,
    DEFAULT_GAP_MERGE_TOLERANCE_DAYS, DEFAULT_SYMBOL_BATCH_SIZE, MAX_FETCH_WORKERS,
};
use crate::{Error, Result};

/// Tunables for the warehouse service.
///
/// Built once at startup and handed to
/// [`WarehouseService`](crate::warehouse::service::WarehouseService).
/// [`validate`](Self::validate) rejects nonsensical values before any
/// request is served.
#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    /// When false, every request goes straight to the upstream provider and
    /// nothing is read from or written to the store.
    pub enabled: bool,
    /// Coverage fraction at or above which a stored range counts as a hit.
    pub coverage_ratio_threshold: f64,
    /// Calendar-day distance under which missing-day clusters are merged.
    pub gap_merge_tolerance_days: i64,
    /// Symbols per upstream batch request.
    pub batch_size: usize,
    /// Deadline for a single upstream call.
    pub fetch_timeout: Duration,
    /// Upper bound on concurrent upstream fetches. Clamped to
    /// [`MAX_FETCH_WORKERS`] and to the host's available parallelism.
    pub max_workers: usize,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            coverage_ratio_threshold: DEFAULT_COVERAGE_RATIO_THRESHOLD,
            gap_merge_tolerance_days: DEFAULT_GAP_MERGE_TOLERANCE_DAYS,
            batch_size: DEFAULT_SYMBOL_BATCH_SIZE,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            max_workers: MAX_FETCH_WORKERS,
        }
    }
}

impl WarehouseConfig {
    /// Checks the configuration for values that would make the service
    /// misbehave. Call this once at startup, before serving requests.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.coverage_ratio_threshold) {
            return Err(Error::Configuration(format!(
                "coverage_ratio_threshold must be within [0.0, 1.0], got {}",
                self.coverage_ratio_threshold
            )));
        }
        if self.gap_merge_tolerance_days < 0 {
            return Err(Error::Configuration(format!(
                "gap_merge_tolerance_days must be non-negative, got {}",
                self.gap_merge_tolerance_days
            )));
        }
        if self.batch_size == 0 {
            return Err(Error::Configuration(
                "batch_size must be at least 1".to_string(),
            ));
        }
        if self.fetch_timeout.is_zero() {
            return Err(Error::Configuration(
                "fetch_timeout must be non-zero".to_string(),
            ));
        }
        if self.max_workers == 0 {
            return Err(Error::Configuration(
                "max_workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Effective worker count: the configured maximum, clamped to the hard
    /// cap and to what the host can actually run in parallel.
    pub fn worker_count(&self) -> usize {
        let host = available_parallelism().map(|n| n.get()).unwrap_or(1);
        self.max_workers.min(MAX_FETCH_WORKERS).min(host).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(WarehouseConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_threshold_outside_unit_interval() {
        let mut config = WarehouseConfig::default();
        config.coverage_ratio_threshold = 1.2;
        assert!(config.validate().is_err());
        config.coverage_ratio_threshold = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_batch_size() {
        let mut config = WarehouseConfig::default();
        config.batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_negative_gap_tolerance() {
        let mut config = WarehouseConfig::default();
        config.gap_merge_tolerance_days = -1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn worker_count_never_exceeds_cap() {
        let mut config = WarehouseConfig::default();
        config.max_workers = 500;
        assert!(config.worker_count() <= MAX_FETCH_WORKERS);
        assert!(config.worker_count() >= 1);
    }
}

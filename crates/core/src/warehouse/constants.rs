//! Warehouse tunables.
//!
//! These defaults feed [`WarehouseConfig::default`](crate::warehouse::config::WarehouseConfig).
//! Deployments override them through the config surface, not here.

/// Fraction of candidate trading days that must already be stored for a
/// range to count as a cache hit.
///
/// Holidays never produce rows, so requiring 100% coverage would force a
/// refetch of every fully-cached range that spans a holiday. 0.8 absorbs a
/// realistic holiday density while still catching genuinely sparse data.
pub const DEFAULT_COVERAGE_RATIO_THRESHOLD: f64 = 0.8;

/// Missing-day clusters closer than this many calendar days are merged into
/// one fetch range.
///
/// Providers price a request mostly per call, not per day, so a handful of
/// redundant days is cheaper than an extra round trip.
pub const DEFAULT_GAP_MERGE_TOLERANCE_DAYS: i64 = 14;

/// Number of symbols grouped into one upstream batch request.
pub const DEFAULT_SYMBOL_BATCH_SIZE: usize = 20;

/// Deadline for a single upstream call, in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Hard cap on concurrent upstream fetches, regardless of host parallelism.
pub const MAX_FETCH_WORKERS: usize = 20;

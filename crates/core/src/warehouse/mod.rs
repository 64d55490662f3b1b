//! Warehouse module - the read-through market data cache.
//!
//! - [`types`] - Strong types: `Symbol`, `DateRange`
//! - [`model`] - Domain models: price points, dividend events, coverage records
//! - [`calendar`] - Trading-day calendar heuristic (weekday approximation)
//! - [`gaps`] - Missing-range detection with gap merging
//! - [`store`] - Storage trait for persisting and querying warehouse data
//! - [`fetcher`] - Upstream provider trait (the external collaborator)
//! - [`service`] - The cache orchestrator (`WarehouseService`)
//! - [`metrics`] - In-memory hit/miss/upstream counters
//! - [`config`] / [`constants`] - Tunables and their defaults
//!
//! # Architecture
//!
//! ```text
//! WarehouseService ──► UpstreamFetcher (provider, external)
//!       │
//!       ├──► CoverageStore (DB, implemented by storage-sqlite)
//!       ├──► calendar / gaps (pure planning)
//!       └──► WarehouseMetrics (atomics)
//! ```
//!
//! The service decides HIT vs MISS per symbol: stored rows covering at least
//! the configured fraction of candidate trading days are served as-is;
//! anything else triggers a gap-merged upstream fetch, an idempotent upsert,
//! and a re-read of the requested range.

pub mod calendar;
pub mod config;
pub mod constants;
pub mod fetcher;
pub mod gaps;
pub mod metrics;
pub mod model;
pub mod service;
pub mod store;
pub mod types;


// Re-export commonly used types for convenience
pub use config::WarehouseConfig;
pub use fetcher::{UpstreamError, UpstreamFetcher};
pub use metrics::{CounterSnapshot, WarehouseMetrics, WarehouseStats};
pub use model::{CoverageRecord, DividendEvent, DividendSeries, PricePoint, PriceSeries};
pub use service::{PriceHistoryResult, WarehouseService};
pub use store::CoverageStore;
pub use types::{DateRange, Symbol};

// Re-export constants
pub use constants::*;

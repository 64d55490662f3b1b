//! Warehouse storage trait.
//!
//! This trait abstracts the persistence layer so different backends can be
//! used interchangeably; the `storage-sqlite` crate provides the Diesel
//! implementation.
//!
//! # Coverage asymmetry
//!
//! Price coverage is derived from row presence in the price table; dividend
//! and benchmark coverage use explicit marker rows written even for empty
//! fetch results. This asymmetry is deliberate: price data is dense enough
//! that presence implies coverage, while "no dividends in this range" is
//! indistinguishable from "never checked" without a marker. Do not "fix" one
//! side to match the other.

use async_trait::async_trait;

use crate::errors::Result;
use crate::warehouse::model::{DividendEvent, DividendSeries, PricePoint, PriceSeries};
use crate::warehouse::types::{DateRange, Symbol};

/// Storage interface for warehouse data.
///
/// # Design Notes
///
/// - Writes are async (they funnel through the storage crate's single-writer
///   actor); range reads are sync pool checkouts.
/// - All upserts are insert-or-replace on the natural key: repeated calls
///   with identical data leave the store in the same state.
/// - Rows are never deleted by the core; deletion is an external admin
///   operation.
#[async_trait]
pub trait CoverageStore: Send + Sync {
    // =========================================================================
    // Prices
    // =========================================================================

    /// Upserts closing prices for a symbol, keyed by (symbol, date).
    ///
    /// Returns the number of rows written.
    async fn upsert_prices(&self, symbol: &Symbol, points: &[PricePoint]) -> Result<usize>;

    /// Reads all stored prices for a symbol within the range, ascending by
    /// date.
    fn read_prices(&self, symbol: &Symbol, range: DateRange) -> Result<PriceSeries>;

    // =========================================================================
    // Dividends
    // =========================================================================

    /// Writes dividend event rows (if any) and **always** a coverage marker
    /// spanning `range`, with `has_dividends = !events.is_empty()`.
    ///
    /// The marker is what distinguishes "no dividends in this range" from
    /// "never checked".
    async fn upsert_dividends(
        &self,
        symbol: &Symbol,
        events: &[DividendEvent],
        range: DateRange,
    ) -> Result<usize>;

    /// Reads stored dividend events within the range, ascending by date.
    fn read_dividends(&self, symbol: &Symbol, range: DateRange) -> Result<DividendSeries>;

    /// True if some stored coverage marker fully contains `range`.
    ///
    /// Partial overlap is not coverage.
    fn has_dividend_coverage(&self, symbol: &Symbol, range: DateRange) -> Result<bool>;

    // =========================================================================
    // Benchmarks
    // =========================================================================

    /// Benchmark analogue of [`upsert_dividends`]: writes level rows plus a
    /// coverage marker with `has_data = !points.is_empty()`.
    ///
    /// [`upsert_dividends`]: CoverageStore::upsert_dividends
    async fn upsert_benchmark(
        &self,
        symbol: &Symbol,
        points: &[PricePoint],
        range: DateRange,
    ) -> Result<usize>;

    /// Reads stored benchmark levels within the range, ascending by date.
    fn read_benchmark(&self, symbol: &Symbol, range: DateRange) -> Result<PriceSeries>;

    /// True if some stored benchmark coverage marker fully contains `range`.
    fn has_benchmark_coverage(&self, symbol: &Symbol, range: DateRange) -> Result<bool>;

    // =========================================================================
    // Monitoring
    // =========================================================================

    /// Size of the backing store in bytes, for the metrics surface.
    fn store_size_bytes(&self) -> Result<u64>;
}

//! Warehouse orchestration service.
//!
//! `WarehouseService` is the read-through cache in front of the upstream
//! market data provider. Every read first consults the [`CoverageStore`];
//! only the parts of a request the store cannot satisfy go upstream, and
//! whatever comes back is persisted before the response is assembled.
//!
//! # Architecture
//!
//! ```text
//! WarehouseService
//!       │
//!       ├─► CoverageStore    (persisted prices, dividends, benchmarks)
//!       ├─► UpstreamFetcher  (provider round trips)
//!       └─► WarehouseMetrics (hit/miss counters)
//! ```
//!
//! # Key Design Principles
//!
//! - **Read-after-write**: responses are always re-read from the store after
//!   a fetch, so callers see exactly what was persisted.
//! - **Per-symbol isolation**: one symbol's upstream failure never blocks the
//!   rest of a batch; it is reported alongside the successful series.
//! - **Storage errors are fatal**: a store that cannot read or write is a
//!   deployment problem, not something to paper over with upstream calls.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use log::{debug, warn};
use serde::Serialize;
use tokio::time::timeout;

use super::calendar::candidate_trading_days;
use super::config::WarehouseConfig;
use super::fetcher::{UpstreamError, UpstreamFetcher};
use super::gaps::{collapse_span, missing_ranges};
use super::metrics::{WarehouseMetrics, WarehouseStats};
use super::model::{DividendSeries, PriceSeries};
use super::store::CoverageStore;
use super::types::{DateRange, Symbol};
use crate::errors::{Error, Result};

// =============================================================================
// Result Types
// =============================================================================

/// Outcome of a batch price request.
///
/// Symbols the upstream provider failed on land in `failed` with a
/// human-readable reason; everything else is in `series`. The two key sets
/// are disjoint and together cover the requested symbols.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistoryResult {
    /// Closing prices per symbol, ascending by date.
    pub series: HashMap<Symbol, PriceSeries>,
    /// Symbols that could not be served, with the upstream error message.
    pub failed: HashMap<Symbol, String>,
}

// =============================================================================
// Service
// =============================================================================

/// Read-through cache over an upstream market data provider.
///
/// Generic over the store and fetcher so tests can substitute in-memory
/// doubles for both.
pub struct WarehouseService<S, F> {
    store: Arc<S>,
    fetcher: Arc<F>,
    config: WarehouseConfig,
    metrics: Arc<WarehouseMetrics>,
}

impl<S, F> WarehouseService<S, F>
where
    S: CoverageStore,
    F: UpstreamFetcher,
{
    /// Creates the service, validating the configuration up front.
    pub fn new(store: Arc<S>, fetcher: Arc<F>, config: WarehouseConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            fetcher,
            config,
            metrics: Arc::new(WarehouseMetrics::new()),
        })
    }

    // =========================================================================
    // Prices
    // =========================================================================

    /// Returns daily closing prices for `symbols` over `range`.
    ///
    /// Symbols are processed in chunks of the configured batch size, with a
    /// bounded number of concurrent upstream fetches. Upstream failures are
    /// collected per symbol; storage failures abort the whole call.
    pub async fn get_price_history(
        &self,
        symbols: &[Symbol],
        range: DateRange,
    ) -> Result<PriceHistoryResult> {
        if !self.config.enabled {
            return self.fetch_batches_direct(symbols, range).await;
        }

        let workers = self.config.worker_count();
        let mut result = PriceHistoryResult::default();

        for chunk in symbols.chunks(self.config.batch_size) {
            let outcomes: Vec<(Symbol, Result<PriceSeries>)> = stream::iter(chunk.iter().cloned())
                .map(|symbol| async move {
                    let series = self.load_symbol(&symbol, range).await;
                    (symbol, series)
                })
                .buffer_unordered(workers)
                .collect()
                .await;

            for (symbol, outcome) in outcomes {
                match outcome {
                    Ok(series) => {
                        result.series.insert(symbol, series);
                    }
                    Err(Error::Upstream(e)) => {
                        warn!("Upstream fetch failed for {}: {}", symbol, e);
                        result.failed.insert(symbol, e.to_string());
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        Ok(result)
    }

    /// Serves one symbol's price range, fetching upstream only for the
    /// missing portion.
    async fn load_symbol(&self, symbol: &Symbol, range: DateRange) -> Result<PriceSeries> {
        let candidates = candidate_trading_days(range);
        let stored = self.store.read_prices(symbol, range)?;

        // Weekend-only ranges have nothing to cover; whatever the store
        // holds is the answer.
        if candidates.is_empty() {
            self.metrics.record_hit();
            return Ok(stored);
        }

        let covered: HashSet<NaiveDate> = stored.iter().map(|p| p.date).collect();
        let covered_count = candidates.iter().filter(|d| covered.contains(d)).count();
        let ratio = covered_count as f64 / candidates.len() as f64;

        if ratio >= self.config.coverage_ratio_threshold {
            debug!(
                "Cache hit for {} ({}/{} candidate days stored)",
                symbol,
                covered_count,
                candidates.len()
            );
            self.metrics.record_hit();
            return Ok(stored);
        }

        self.metrics.record_miss();
        let missing = missing_ranges(
            &candidates,
            &covered,
            self.config.gap_merge_tolerance_days,
        );
        self.metrics.record_missing_segments(missing.len());

        if let Some(span) = collapse_span(&missing) {
            debug!(
                "Cache miss for {}: {} missing segment(s), fetching {} to {}",
                symbol,
                missing.len(),
                span.start(),
                span.end()
            );
            let mut fetched = self.fetch_prices_upstream(&[symbol.clone()], span).await?;
            let points = fetched.remove(symbol).unwrap_or_default();
            self.store.upsert_prices(symbol, &points).await?;
        }

        self.store.read_prices(symbol, range)
    }

    /// Pass-through path used when the warehouse is disabled. Nothing is
    /// read from or written to the store.
    async fn fetch_batches_direct(
        &self,
        symbols: &[Symbol],
        range: DateRange,
    ) -> Result<PriceHistoryResult> {
        let mut result = PriceHistoryResult::default();
        for chunk in symbols.chunks(self.config.batch_size) {
            match self.fetch_prices_upstream(chunk, range).await {
                Ok(mut fetched) => {
                    for symbol in chunk {
                        let mut series = fetched.remove(symbol).unwrap_or_default();
                        // No store read to order these; sort here.
                        series.sort_by_key(|p| p.date);
                        result.series.insert(symbol.clone(), series);
                    }
                }
                Err(Error::Upstream(e)) => {
                    warn!("Direct batch fetch failed: {}", e);
                    for symbol in chunk {
                        result.failed.insert(symbol.clone(), e.to_string());
                    }
                }
                Err(e) => return Err(e),
            }
        }
        Ok(result)
    }

    /// Single upstream price call with the configured deadline.
    async fn fetch_prices_upstream(
        &self,
        symbols: &[Symbol],
        range: DateRange,
    ) -> Result<HashMap<Symbol, PriceSeries>> {
        self.with_deadline(self.fetcher.fetch_prices(symbols, range))
            .await
    }

    /// Wraps an upstream call with the configured deadline and counts it.
    async fn with_deadline<T>(
        &self,
        call: impl std::future::Future<Output = std::result::Result<T, UpstreamError>>,
    ) -> Result<T> {
        self.metrics.record_upstream_call();
        match timeout(self.config.fetch_timeout, call).await {
            Ok(fetched) => Ok(fetched?),
            Err(_) => Err(UpstreamError::Timeout(self.config.fetch_timeout).into()),
        }
    }

    // =========================================================================
    // Dividends
    // =========================================================================

    /// Returns dividend events for `symbol` over `range`.
    ///
    /// Coverage is marker-based: the range is a hit only when a stored
    /// marker fully contains it, so an empty fetch result is remembered and
    /// never refetched.
    pub async fn get_dividends(&self, symbol: &Symbol, range: DateRange) -> Result<DividendSeries> {
        if !self.config.enabled {
            let mut events = self
                .with_deadline(self.fetcher.fetch_dividends(symbol, range))
                .await?;
            events.sort_by_key(|e| e.date);
            return Ok(events);
        }

        if self.store.has_dividend_coverage(symbol, range)? {
            self.metrics.record_hit();
            return self.store.read_dividends(symbol, range);
        }

        self.metrics.record_miss();
        let events = self
            .with_deadline(self.fetcher.fetch_dividends(symbol, range))
            .await?;

        self.store.upsert_dividends(symbol, &events, range).await?;
        self.store.read_dividends(symbol, range)
    }

    // =========================================================================
    // Benchmarks
    // =========================================================================

    /// Returns benchmark index levels for `symbol` over `range`, with the
    /// same marker-based coverage as dividends.
    pub async fn get_benchmark_history(
        &self,
        symbol: &Symbol,
        range: DateRange,
    ) -> Result<PriceSeries> {
        if !self.config.enabled {
            let mut points = self
                .with_deadline(self.fetcher.fetch_benchmark(symbol, range))
                .await?;
            points.sort_by_key(|p| p.date);
            return Ok(points);
        }

        if self.store.has_benchmark_coverage(symbol, range)? {
            self.metrics.record_hit();
            return self.store.read_benchmark(symbol, range);
        }

        self.metrics.record_miss();
        let points = self
            .with_deadline(self.fetcher.fetch_benchmark(symbol, range))
            .await?;

        self.store.upsert_benchmark(symbol, &points, range).await?;
        self.store.read_benchmark(symbol, range)
    }

    // =========================================================================
    // Monitoring
    // =========================================================================

    /// Current counters plus the store's on-disk footprint.
    pub fn stats(&self) -> Result<WarehouseStats> {
        Ok(WarehouseStats {
            counters: self.metrics.snapshot(),
            store_size_bytes: self.store.store_size_bytes()?,
        })
    }

    /// Zeroes the counters. The on-disk footprint is unaffected.
    pub fn reset_metrics(&self) {
        self.metrics.reset();
    }
}

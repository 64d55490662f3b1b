//! Upstream provider trait.
//!
//! The warehouse treats the upstream market data provider as an opaque async
//! fetch function. Concrete clients (HTTP providers, test doubles) live
//! outside this crate; they only need to implement [`UpstreamFetcher`].

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use crate::warehouse::model::{DividendSeries, PriceSeries};
use crate::warehouse::types::{DateRange, Symbol};

/// Errors surfaced by an upstream provider call.
///
/// These are recoverable per-symbol in the batch price path: the failing
/// symbol is reported in the batch result and its siblings proceed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// The provider request failed (network error, rate limit, bad payload).
    #[error("Provider request failed: {0}")]
    RequestFailed(String),

    /// The provider did not answer within the configured deadline.
    #[error("Provider call timed out after {0:?}")]
    Timeout(Duration),
}

/// Async interface to the upstream market data provider.
#[async_trait]
pub trait UpstreamFetcher: Send + Sync {
    /// Fetches daily closing prices for a set of symbols over a range.
    ///
    /// Symbols the provider could not serve may simply be absent from the
    /// returned map.
    async fn fetch_prices(
        &self,
        symbols: &[Symbol],
        range: DateRange,
    ) -> Result<HashMap<Symbol, PriceSeries>, UpstreamError>;

    /// Fetches dividend events for one symbol over a range. An empty series
    /// means the provider found none.
    async fn fetch_dividends(
        &self,
        symbol: &Symbol,
        range: DateRange,
    ) -> Result<DividendSeries, UpstreamError>;

    /// Fetches benchmark index levels for one symbol over a range.
    async fn fetch_benchmark(
        &self,
        symbol: &Symbol,
        range: DateRange,
    ) -> Result<PriceSeries, UpstreamError>;
}

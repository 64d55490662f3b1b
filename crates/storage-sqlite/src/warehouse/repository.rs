use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::fs;
use std::sync::Arc;

use super::model::{
    encode_date, BenchmarkCoverageDB, BenchmarkDB, DividendCoverageDB, DividendDB, PriceDB,
};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::benchmark_coverage::dsl as benchmark_coverage_dsl;
use crate::schema::benchmark_data::dsl as benchmark_data_dsl;
use crate::schema::dividend_coverage::dsl as dividend_coverage_dsl;
use crate::schema::dividend_data::dsl as dividend_data_dsl;
use crate::schema::market_data::dsl as market_data_dsl;
use quotevault_core::warehouse::{
    CoverageStore, DateRange, DividendEvent, DividendSeries, PricePoint, PriceSeries, Symbol,
};
use quotevault_core::{Error, Result};

/// Diesel-backed implementation of [`CoverageStore`].
///
/// Reads check out pooled connections; writes go through the single-writer
/// actor so concurrent upserts never contend for SQLite's write lock.
pub struct SqliteCoverageStore {
    pool: Arc<DbPool>,
    writer: WriteHandle,
    db_path: String,
}

impl SqliteCoverageStore {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle, db_path: impl Into<String>) -> Self {
        Self {
            pool,
            writer,
            db_path: db_path.into(),
        }
    }
}

// =============================================================================
// CoverageStore Implementation
// =============================================================================

#[async_trait]
impl CoverageStore for SqliteCoverageStore {
    // =========================================================================
    // Prices
    // =========================================================================

    async fn upsert_prices(&self, symbol: &Symbol, points: &[PricePoint]) -> Result<usize> {
        if points.is_empty() {
            return Ok(0);
        }

        let db_rows: Vec<PriceDB> = points
            .iter()
            .map(|p| PriceDB::from_point(symbol, p))
            .collect();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut total_upserted = 0;
                for chunk in db_rows.chunks(1_000) {
                    total_upserted += diesel::replace_into(market_data_dsl::market_data)
                        .values(chunk)
                        .execute(conn)
                        .map_err(StorageError::QueryFailed)?;
                }
                Ok(total_upserted)
            })
            .await
    }

    fn read_prices(&self, symbol: &Symbol, range: DateRange) -> Result<PriceSeries> {
        let mut conn = get_connection(&self.pool)?;

        // ISO dates compare correctly as text.
        let rows = market_data_dsl::market_data
            .filter(market_data_dsl::ticker.eq(symbol.as_str()))
            .filter(market_data_dsl::date.ge(encode_date(range.start())))
            .filter(market_data_dsl::date.le(encode_date(range.end())))
            .order(market_data_dsl::date.asc())
            .load::<PriceDB>(&mut conn)
            .into_core()?;

        rows.into_iter()
            .map(|row| row.into_point().map_err(Error::from))
            .collect()
    }

    // =========================================================================
    // Dividends
    // =========================================================================

    async fn upsert_dividends(
        &self,
        symbol: &Symbol,
        events: &[DividendEvent],
        range: DateRange,
    ) -> Result<usize> {
        let db_rows: Vec<DividendDB> = events
            .iter()
            .map(|e| DividendDB::from_event(symbol, e))
            .collect();
        let marker = DividendCoverageDB {
            ticker: symbol.as_str().to_string(),
            start_date: encode_date(range.start()),
            end_date: encode_date(range.end()),
            has_dividends: !events.is_empty(),
            created_at: Utc::now().to_rfc3339(),
        };

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut total_upserted = 0;
                for chunk in db_rows.chunks(1_000) {
                    total_upserted += diesel::replace_into(dividend_data_dsl::dividend_data)
                        .values(chunk)
                        .execute(conn)
                        .map_err(StorageError::QueryFailed)?;
                }
                // Marker row goes in the same transaction as the events.
                diesel::replace_into(dividend_coverage_dsl::dividend_coverage)
                    .values(&marker)
                    .execute(conn)
                    .map_err(StorageError::QueryFailed)?;
                Ok(total_upserted)
            })
            .await
    }

    fn read_dividends(&self, symbol: &Symbol, range: DateRange) -> Result<DividendSeries> {
        let mut conn = get_connection(&self.pool)?;

        let rows = dividend_data_dsl::dividend_data
            .filter(dividend_data_dsl::ticker.eq(symbol.as_str()))
            .filter(dividend_data_dsl::date.ge(encode_date(range.start())))
            .filter(dividend_data_dsl::date.le(encode_date(range.end())))
            .order(dividend_data_dsl::date.asc())
            .load::<DividendDB>(&mut conn)
            .into_core()?;

        rows.into_iter()
            .map(|row| row.into_event().map_err(Error::from))
            .collect()
    }

    fn has_dividend_coverage(&self, symbol: &Symbol, range: DateRange) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;

        let count: i64 = dividend_coverage_dsl::dividend_coverage
            .filter(dividend_coverage_dsl::ticker.eq(symbol.as_str()))
            .filter(dividend_coverage_dsl::start_date.le(encode_date(range.start())))
            .filter(dividend_coverage_dsl::end_date.ge(encode_date(range.end())))
            .count()
            .get_result(&mut conn)
            .into_core()?;

        Ok(count > 0)
    }

    // =========================================================================
    // Benchmarks
    // =========================================================================

    async fn upsert_benchmark(
        &self,
        symbol: &Symbol,
        points: &[PricePoint],
        range: DateRange,
    ) -> Result<usize> {
        let db_rows: Vec<BenchmarkDB> = points
            .iter()
            .map(|p| BenchmarkDB::from_point(symbol, p))
            .collect();
        let marker = BenchmarkCoverageDB {
            symbol: symbol.as_str().to_string(),
            start_date: encode_date(range.start()),
            end_date: encode_date(range.end()),
            has_data: !points.is_empty(),
            created_at: Utc::now().to_rfc3339(),
        };

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut total_upserted = 0;
                for chunk in db_rows.chunks(1_000) {
                    total_upserted += diesel::replace_into(benchmark_data_dsl::benchmark_data)
                        .values(chunk)
                        .execute(conn)
                        .map_err(StorageError::QueryFailed)?;
                }
                diesel::replace_into(benchmark_coverage_dsl::benchmark_coverage)
                    .values(&marker)
                    .execute(conn)
                    .map_err(StorageError::QueryFailed)?;
                Ok(total_upserted)
            })
            .await
    }

    fn read_benchmark(&self, symbol: &Symbol, range: DateRange) -> Result<PriceSeries> {
        let mut conn = get_connection(&self.pool)?;

        let rows = benchmark_data_dsl::benchmark_data
            .filter(benchmark_data_dsl::symbol.eq(symbol.as_str()))
            .filter(benchmark_data_dsl::date.ge(encode_date(range.start())))
            .filter(benchmark_data_dsl::date.le(encode_date(range.end())))
            .order(benchmark_data_dsl::date.asc())
            .load::<BenchmarkDB>(&mut conn)
            .into_core()?;

        rows.into_iter()
            .map(|row| row.into_point().map_err(Error::from))
            .collect()
    }

    fn has_benchmark_coverage(&self, symbol: &Symbol, range: DateRange) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;

        let count: i64 = benchmark_coverage_dsl::benchmark_coverage
            .filter(benchmark_coverage_dsl::symbol.eq(symbol.as_str()))
            .filter(benchmark_coverage_dsl::start_date.le(encode_date(range.start())))
            .filter(benchmark_coverage_dsl::end_date.ge(encode_date(range.end())))
            .count()
            .get_result(&mut conn)
            .into_core()?;

        Ok(count > 0)
    }

    // =========================================================================
    // Monitoring
    // =========================================================================

    fn store_size_bytes(&self) -> Result<u64> {
        let meta = fs::metadata(&self.db_path).map_err(|e| {
            Error::Database(quotevault_core::errors::DatabaseError::Internal(format!(
                "Cannot stat database file {}: {}",
                self.db_path, e
            )))
        })?;
        Ok(meta.len())
    }
}

// =============================================================================
// Tests
// =============================================================================

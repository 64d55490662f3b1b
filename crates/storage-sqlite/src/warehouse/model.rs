//! Database models for warehouse rows.
//!
//! Dates are stored as ISO-8601 `Text` and prices as decimal strings, so
//! values round-trip without float drift and date columns compare correctly
//! as strings.

use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::StorageError;
use quotevault_core::warehouse::{DividendEvent, PricePoint, Symbol};

/// Storage format for date columns.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn decode_date(raw: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| StorageError::DecodeFailed(format!("bad date {:?}: {}", raw, e)))
}

fn decode_decimal(raw: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(raw)
        .map_err(|e| StorageError::DecodeFailed(format!("bad decimal {:?}: {}", raw, e)))
}

/// Database model for daily closing prices.
#[derive(
    Queryable, Identifiable, Selectable, Insertable, AsChangeset, Debug, Clone, Serialize,
    Deserialize, PartialEq,
)]
#[diesel(table_name = crate::schema::market_data)]
#[diesel(primary_key(ticker, date))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct PriceDB {
    pub ticker: String,
    pub date: String,
    pub close_price: String,
    pub created_at: String,
}

impl PriceDB {
    pub fn from_point(symbol: &Symbol, point: &PricePoint) -> Self {
        Self {
            ticker: symbol.as_str().to_string(),
            date: encode_date(point.date),
            close_price: point.close.to_string(),
            created_at: Utc::now().to_rfc3339(),
        }
    }

    pub fn into_point(self) -> Result<PricePoint, StorageError> {
        Ok(PricePoint::new(
            decode_date(&self.date)?,
            decode_decimal(&self.close_price)?,
        ))
    }
}

/// Database model for dividend events.
#[derive(
    Queryable, Identifiable, Selectable, Insertable, AsChangeset, Debug, Clone, Serialize,
    Deserialize, PartialEq,
)]
#[diesel(table_name = crate::schema::dividend_data)]
#[diesel(primary_key(ticker, date))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct DividendDB {
    pub ticker: String,
    pub date: String,
    pub dividend_amount: String,
    pub created_at: String,
}

impl DividendDB {
    pub fn from_event(symbol: &Symbol, event: &DividendEvent) -> Self {
        Self {
            ticker: symbol.as_str().to_string(),
            date: encode_date(event.date),
            dividend_amount: event.amount.to_string(),
            created_at: Utc::now().to_rfc3339(),
        }
    }

    pub fn into_event(self) -> Result<DividendEvent, StorageError> {
        DividendEvent::new(decode_date(&self.date)?, decode_decimal(&self.dividend_amount)?)
            .map_err(|e| StorageError::DecodeFailed(e.to_string()))
    }
}

/// Coverage marker for a checked dividend range.
#[derive(
    Queryable, Identifiable, Selectable, Insertable, AsChangeset, Debug, Clone, Serialize,
    Deserialize, PartialEq,
)]
#[diesel(table_name = crate::schema::dividend_coverage)]
#[diesel(primary_key(ticker, start_date, end_date))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct DividendCoverageDB {
    pub ticker: String,
    pub start_date: String,
    pub end_date: String,
    pub has_dividends: bool,
    pub created_at: String,
}

/// Database model for benchmark index levels.
#[derive(
    Queryable, Identifiable, Selectable, Insertable, AsChangeset, Debug, Clone, Serialize,
    Deserialize, PartialEq,
)]
#[diesel(table_name = crate::schema::benchmark_data)]
#[diesel(primary_key(symbol, date))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkDB {
    pub symbol: String,
    pub date: String,
    pub close_price: String,
    pub created_at: String,
}

impl BenchmarkDB {
    pub fn from_point(symbol: &Symbol, point: &PricePoint) -> Self {
        Self {
            symbol: symbol.as_str().to_string(),
            date: encode_date(point.date),
            close_price: point.close.to_string(),
            created_at: Utc::now().to_rfc3339(),
        }
    }

    pub fn into_point(self) -> Result<PricePoint, StorageError> {
        Ok(PricePoint::new(
            decode_date(&self.date)?,
            decode_decimal(&self.close_price)?,
        ))
    }
}

/// Coverage marker for a checked benchmark range.
#[derive(
    Queryable, Identifiable, Selectable, Insertable, AsChangeset, Debug, Clone, Serialize,
    Deserialize, PartialEq,
)]
#[diesel(table_name = crate::schema::benchmark_coverage)]
#[diesel(primary_key(symbol, start_date, end_date))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkCoverageDB {
    pub symbol: String,
    pub start_date: String,
    pub end_date: String,
    pub has_data: bool,
    pub created_at: String,
}

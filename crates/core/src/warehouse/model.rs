//! Domain models for warehouse data.
//!
//! Pure data structures with no dependency on the storage layer. Series are
//! plain vectors with an ascending-by-date sort invariant: range reads return
//! sorted data, and the orchestrator only hands out series produced by range
//! reads.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::warehouse::types::Symbol;

/// Daily closing price for a symbol. Unique per (symbol, date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: Decimal,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: Decimal) -> Self {
        Self { date, close }
    }
}

/// Dividend payout for a symbol. Unique per (symbol, date); amount is
/// non-negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendEvent {
    pub date: NaiveDate,
    pub amount: Decimal,
}

impl DividendEvent {
    /// Creates an event, rejecting negative amounts.
    pub fn new(date: NaiveDate, amount: Decimal) -> Result<Self, ValidationError> {
        if amount < Decimal::ZERO {
            return Err(ValidationError::NegativeDividend { date, amount });
        }
        Ok(Self { date, amount })
    }
}

/// Assertion that a range was checked against upstream for a symbol.
///
/// `has_data` records whether any events existed in the range. This is
/// distinct from row presence: a covered-but-empty range must not be
/// re-fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageRecord {
    pub symbol: Symbol,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub has_data: bool,
    pub created_at: DateTime<Utc>,
}

/// Ordered-by-date closing prices for a single symbol.
pub type PriceSeries = Vec<PricePoint>;

/// Ordered-by-date dividend events for a single symbol.
pub type DividendSeries = Vec<DividendEvent>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_dividend_event_rejects_negative_amount() {
        let result = DividendEvent::new(date(2024, 3, 15), dec!(-0.24));
        assert!(matches!(
            result,
            Err(ValidationError::NegativeDividend { .. })
        ));
    }

    #[test]
    fn test_dividend_event_accepts_zero_amount() {
        let event = DividendEvent::new(date(2024, 3, 15), Decimal::ZERO).unwrap();
        assert_eq!(event.amount, Decimal::ZERO);
    }
}

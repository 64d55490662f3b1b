//! Strong types for the warehouse.
//!
//! - `Symbol` - Normalized ticker/benchmark identifier
//! - `DateRange` - Inclusive calendar date range with an enforced
//!   `start <= end` invariant

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::ValidationError;

// =============================================================================
// Symbol
// =============================================================================

/// Normalized ticker or benchmark identifier.
///
/// Examples: "AAPL", "MSFT", "^GSPC"
///
/// Construction trims whitespace and uppercases, so lookups are
/// case-insensitive by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// DateRange
// =============================================================================

/// Inclusive `[start, end]` pair of calendar dates.
///
/// The `start <= end` invariant is enforced at construction, before any I/O
/// happens. Fields are private so the invariant cannot be broken after the
/// fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Single-day range.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Internal constructor for callers that already hold ordered dates
    /// (e.g. gap merging over a sorted date list).
    pub(crate) fn from_ordered(start: NaiveDate, end: NaiveDate) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Iterates every calendar date in the range, inclusive.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        std::iter::successors(Some(self.start), move |d| {
            d.checked_add_days(Days::new(1)).filter(|next| *next <= end)
        })
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_symbol_normalizes_case_and_whitespace() {
        assert_eq!(Symbol::new(" aapl ").as_str(), "AAPL");
        assert_eq!(Symbol::new("^gspc").as_str(), "^GSPC");
        assert_eq!(Symbol::new("MSFT"), Symbol::new("msft"));
    }

    #[test]
    fn test_date_range_rejects_inverted_bounds() {
        let result = DateRange::new(date(2024, 1, 31), date(2024, 1, 1));
        assert!(matches!(
            result,
            Err(ValidationError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_date_range_single_day_is_valid() {
        let range = DateRange::new(date(2024, 1, 15), date(2024, 1, 15)).unwrap();
        assert_eq!(range.days().count(), 1);
        assert!(range.contains(date(2024, 1, 15)));
    }

    #[test]
    fn test_date_range_days_inclusive() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 5)).unwrap();
        let days: Vec<_> = range.days().collect();
        assert_eq!(days.len(), 5);
        assert_eq!(days[0], date(2024, 1, 1));
        assert_eq!(days[4], date(2024, 1, 5));
    }

    #[test]
    fn test_date_range_contains_excludes_outside() {
        let range = DateRange::new(date(2024, 1, 10), date(2024, 1, 20)).unwrap();
        assert!(!range.contains(date(2024, 1, 9)));
        assert!(!range.contains(date(2024, 1, 21)));
        assert!(range.contains(date(2024, 1, 10)));
        assert!(range.contains(date(2024, 1, 20)));
    }
}

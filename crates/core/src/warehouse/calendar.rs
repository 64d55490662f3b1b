//! Trading-day calendar heuristic.
//!
//! Deterministic, pure logic. No I/O, no wall-clock.
//!
//! Candidate trading days are every Monday-Friday in a range. No holiday
//! calendar is applied: this deliberately over-counts trading days around
//! holidays, and the coverage-ratio tolerance in the orchestrator is sized to
//! absorb that (a full year has ~9 US market holidays out of ~261 weekdays,
//! well inside a 0.8 threshold).

use chrono::{Datelike, NaiveDate, Weekday};

use crate::warehouse::types::DateRange;

/// Returns every weekday (Mon-Fri) in the inclusive range, ascending.
pub fn candidate_trading_days(range: DateRange) -> Vec<NaiveDate> {
    range.days().filter(|d| is_weekday(*d)).collect()
}

fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn range(start: NaiveDate, end: NaiveDate) -> DateRange {
        DateRange::new(start, end).unwrap()
    }

    #[test]
    fn test_january_2024_has_23_weekdays() {
        // Jan 1 2024 is a Monday; 31 calendar days, 8 weekend days.
        let days = candidate_trading_days(range(date(2024, 1, 1), date(2024, 1, 31)));
        assert_eq!(days.len(), 23);
        assert_eq!(days[0], date(2024, 1, 1));
        assert_eq!(*days.last().unwrap(), date(2024, 1, 31));
    }

    #[test]
    fn test_weekend_days_are_excluded() {
        // 2024-01-06 is a Saturday, 2024-01-07 a Sunday.
        let days = candidate_trading_days(range(date(2024, 1, 5), date(2024, 1, 8)));
        assert_eq!(days, vec![date(2024, 1, 5), date(2024, 1, 8)]);
    }

    #[test]
    fn test_weekend_only_range_is_empty() {
        let days = candidate_trading_days(range(date(2024, 1, 6), date(2024, 1, 7)));
        assert!(days.is_empty());
    }

    #[test]
    fn test_single_weekday_range() {
        let days = candidate_trading_days(DateRange::single(date(2024, 1, 10)));
        assert_eq!(days, vec![date(2024, 1, 10)]);
    }

    #[test]
    fn test_days_are_ascending() {
        let days = candidate_trading_days(range(date(2024, 2, 1), date(2024, 3, 31)));
        assert!(days.windows(2).all(|w| w[0] < w[1]));
    }
}

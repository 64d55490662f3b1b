//! Missing-range detection.
//!
//! Compares candidate trading days against the dates the store already holds
//! and produces the sub-ranges that need an upstream fetch. Near-adjacent
//! missing dates are merged into a single range so a weekend or holiday
//! cluster does not fan out into many tiny upstream requests.

use chrono::NaiveDate;
use std::collections::HashSet;

use crate::warehouse::types::DateRange;

/// Computes the missing sub-ranges for a symbol.
///
/// `candidate_days` is the calendar's trading-day enumeration for the queried
/// range; `covered` is the set of dates already persisted. Missing dates
/// within `merge_tolerance_days` calendar days of each other collapse into
/// one range; a larger gap starts a new range.
///
/// Returns an empty vec when everything is covered.
pub fn missing_ranges(
    candidate_days: &[NaiveDate],
    covered: &HashSet<NaiveDate>,
    merge_tolerance_days: i64,
) -> Vec<DateRange> {
    let mut missing: Vec<NaiveDate> = candidate_days
        .iter()
        .copied()
        .filter(|d| !covered.contains(d))
        .collect();
    missing.sort_unstable();
    merge_dates(&missing, merge_tolerance_days)
}

/// Merges a sorted list of missing dates into ranges.
fn merge_dates(sorted_missing: &[NaiveDate], merge_tolerance_days: i64) -> Vec<DateRange> {
    let mut ranges = Vec::new();
    let mut iter = sorted_missing.iter().copied();

    let Some(first) = iter.next() else {
        return ranges;
    };

    let mut start = first;
    let mut prev = first;
    for date in iter {
        if (date - prev).num_days() > merge_tolerance_days {
            ranges.push(DateRange::from_ordered(start, prev));
            start = date;
        }
        prev = date;
    }
    ranges.push(DateRange::from_ordered(start, prev));
    ranges
}

/// Collapses several ranges into the single span `min(starts)..max(ends)`.
///
/// The orchestrator prefers one wide upstream call over several narrow ones.
pub fn collapse_span(ranges: &[DateRange]) -> Option<DateRange> {
    let start = ranges.iter().map(|r| r.start()).min()?;
    let end = ranges.iter().map(|r| r.end()).max()?;
    Some(DateRange::from_ordered(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_no_missing_dates_yields_no_ranges() {
        let days = vec![date(2024, 1, 8), date(2024, 1, 9)];
        let covered: HashSet<_> = days.iter().copied().collect();
        assert!(missing_ranges(&days, &covered, 14).is_empty());
    }

    #[test]
    fn test_nothing_covered_yields_single_range() {
        let days = vec![date(2024, 1, 8), date(2024, 1, 9), date(2024, 1, 10)];
        let ranges = missing_ranges(&days, &HashSet::new(), 14);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].start(), date(2024, 1, 8));
        assert_eq!(ranges[0].end(), date(2024, 1, 10));
    }

    #[test]
    fn test_gaps_ten_days_apart_merge() {
        // Two missing single days, 10 calendar days apart: one fetch range.
        let days = vec![date(2024, 1, 5), date(2024, 1, 15)];
        let ranges = missing_ranges(&days, &HashSet::new(), 14);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].start(), date(2024, 1, 5));
        assert_eq!(ranges[0].end(), date(2024, 1, 15));
    }

    #[test]
    fn test_gaps_twenty_days_apart_split() {
        let days = vec![date(2024, 1, 5), date(2024, 1, 25)];
        let ranges = missing_ranges(&days, &HashSet::new(), 14);
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0], DateRange::single(date(2024, 1, 5)));
        assert_eq!(ranges[1], DateRange::single(date(2024, 1, 25)));
    }

    #[test]
    fn test_gap_exactly_at_tolerance_merges() {
        let days = vec![date(2024, 1, 1), date(2024, 1, 15)];
        let ranges = missing_ranges(&days, &HashSet::new(), 14);
        assert_eq!(ranges.len(), 1);
    }

    #[test]
    fn test_gap_one_past_tolerance_splits() {
        let days = vec![date(2024, 1, 1), date(2024, 1, 16)];
        let ranges = missing_ranges(&days, &HashSet::new(), 14);
        assert_eq!(ranges.len(), 2);
    }

    #[test]
    fn test_covered_middle_still_merges_across() {
        // Missing head and tail with a covered middle closer than tolerance:
        // still a single fetch range spanning the lot.
        let days: Vec<_> = (1..=10).map(|d| date(2024, 1, d)).collect();
        let covered: HashSet<_> = (4..=7).map(|d| date(2024, 1, d)).collect();
        let ranges = missing_ranges(&days, &covered, 14);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].start(), date(2024, 1, 1));
        assert_eq!(ranges[0].end(), date(2024, 1, 10));
    }

    #[test]
    fn test_collapse_span_takes_outer_bounds() {
        let ranges = vec![
            DateRange::single(date(2024, 1, 25)),
            DateRange::new(date(2024, 1, 2), date(2024, 1, 5)).unwrap(),
        ];
        let span = collapse_span(&ranges).unwrap();
        assert_eq!(span.start(), date(2024, 1, 2));
        assert_eq!(span.end(), date(2024, 1, 25));
    }

    #[test]
    fn test_collapse_span_empty_is_none() {
        assert!(collapse_span(&[]).is_none());
    }

    proptest! {
        /// Every missing candidate day falls inside some output range, and
        /// the output ranges are sorted and non-overlapping.
        #[test]
        fn prop_ranges_cover_all_missing_days(
            offsets in proptest::collection::btree_set(0i64..400, 0..60),
            covered_offsets in proptest::collection::btree_set(0i64..400, 0..60),
            tolerance in 1i64..30,
        ) {
            let base = date(2024, 1, 1);
            let days: Vec<NaiveDate> =
                offsets.iter().map(|o| base + chrono::Duration::days(*o)).collect();
            let covered: HashSet<NaiveDate> = covered_offsets
                .iter()
                .map(|o| base + chrono::Duration::days(*o))
                .collect();

            let ranges = missing_ranges(&days, &covered, tolerance);

            for day in days.iter().filter(|d| !covered.contains(d)) {
                prop_assert!(ranges.iter().any(|r| r.contains(*day)));
            }
            for pair in ranges.windows(2) {
                prop_assert!(pair[0].end() < pair[1].start());
                // Distinct ranges are separated by more than the tolerance.
                prop_assert!((pair[1].start() - pair[0].end()).num_days() > tolerance);
            }
        }
    }
}

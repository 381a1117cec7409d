//! Duration aggregation without double counting
//!
//! Concurrent sources (a busy app plus a running timer, two overlapping
//! manual records) produce overlapping intervals. Summing per-record
//! durations would inflate every total, so all duration math funnels
//! through a single sweep that counts each covered second exactly once.

use chrono::{DateTime, Utc};
use timeloom_domain::TimeSpan;

/// Total wall-clock seconds covered by `spans`, overlap counted once.
///
/// Open spans are evaluated against `now`; inverted spans (end before
/// start) contribute nothing. Intervals are half-open `[start, end)`, so
/// two spans that merely touch do not overlap.
///
/// # Algorithm
/// Sort by start, then sweep keeping the furthest end seen so far. Each
/// interval contributes only the part that extends beyond that end, which
/// handles overlap, containment, and duplicates uniformly. Cost is
/// O(n log n) in the number of spans.
#[must_use]
pub fn merged_duration_secs<T: TimeSpan>(spans: &[T], now: DateTime<Utc>) -> i64 {
    let intervals: Vec<(i64, i64)> = spans
        .iter()
        .map(|span| {
            let start = span.span_start().timestamp();
            let end = span.span_end().unwrap_or(now).timestamp();
            (start, end)
        })
        .collect();

    merged_epoch_secs(intervals)
}

/// Sweep over raw `(start, end)` epoch-second pairs.
///
/// Pairs with `end <= start` contribute nothing. The hierarchy builder
/// uses this form directly so leaves of both record kinds can share one
/// sweep.
#[must_use]
pub fn merged_epoch_secs(mut intervals: Vec<(i64, i64)>) -> i64 {
    intervals.retain(|(start, end)| end > start);
    if intervals.is_empty() {
        return 0;
    }

    // Sort by start, then end, for a deterministic sweep
    intervals.sort_unstable();

    let mut total = 0i64;
    let mut last_end = i64::MIN;
    for (start, end) in intervals {
        if end <= last_end {
            // Fully covered by an earlier interval
            continue;
        }
        total += end - start.max(last_end);
        last_end = end;
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use timeloom_domain::ManualRecord;
    use uuid::Uuid;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn span(start: i64, end: Option<i64>) -> ManualRecord {
        ManualRecord {
            id: Uuid::new_v4(),
            start_time: ts(start),
            end_time: end.map(ts),
            title: "span".to_string(),
            notes: None,
            project_id: None,
        }
    }

    #[test]
    fn test_overlapping_intervals_count_overlap_once() {
        // AC: [0, 10) and [5, 15) cover 15 seconds, not 25
        let spans = vec![span(0, Some(10)), span(5, Some(15))];
        assert_eq!(merged_duration_secs(&spans, ts(100)), 15);
    }

    #[test]
    fn test_touching_intervals_do_not_overlap() {
        // AC: half-open intervals make [0, 10) + [10, 20) exactly 20
        let spans = vec![span(0, Some(10)), span(10, Some(20))];
        assert_eq!(merged_duration_secs(&spans, ts(100)), 20);
    }

    #[test]
    fn test_contained_interval_adds_nothing() {
        let spans = vec![span(0, Some(100)), span(20, Some(30))];
        assert_eq!(merged_duration_secs(&spans, ts(1_000)), 100);
    }

    #[test]
    fn test_duplicate_intervals_count_once() {
        let spans = vec![span(5, Some(25)), span(5, Some(25)), span(5, Some(25))];
        assert_eq!(merged_duration_secs(&spans, ts(100)), 20);
    }

    #[test]
    fn test_disjoint_intervals_sum() {
        let spans = vec![span(0, Some(10)), span(50, Some(70))];
        assert_eq!(merged_duration_secs(&spans, ts(100)), 30);
    }

    #[test]
    fn test_unsorted_input_sweeps_correctly() {
        let spans = vec![span(50, Some(70)), span(0, Some(10)), span(5, Some(15))];
        assert_eq!(merged_duration_secs(&spans, ts(100)), 35);
    }

    #[test]
    fn test_open_interval_evaluates_against_now() {
        let spans = vec![span(0, None)];
        assert_eq!(merged_duration_secs(&spans, ts(40)), 40);
    }

    #[test]
    fn test_open_interval_merges_with_closed_ones() {
        // Open span [30, now=60) overlaps closed [0, 45)
        let spans = vec![span(0, Some(45)), span(30, None)];
        assert_eq!(merged_duration_secs(&spans, ts(60)), 60);
    }

    #[test]
    fn test_inverted_interval_contributes_zero() {
        // AC: malformed input degrades instead of erroring
        let spans = vec![span(100, Some(40)), span(0, Some(10))];
        assert_eq!(merged_duration_secs(&spans, ts(1_000)), 10);
    }

    #[test]
    fn test_empty_input_is_zero() {
        let spans: Vec<ManualRecord> = Vec::new();
        assert_eq!(merged_duration_secs(&spans, ts(0)), 0);
    }

    #[test]
    fn test_epoch_pairs_skip_degenerate_entries() {
        assert_eq!(merged_epoch_secs(vec![(10, 10), (20, 5)]), 0);
        assert_eq!(merged_epoch_secs(vec![(0, 10), (10, 10), (5, 15)]), 15);
    }
}

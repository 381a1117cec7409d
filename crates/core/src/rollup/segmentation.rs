//! Time-period segmentation policies
//!
//! The period level of the rollup tree segments a manual record's span
//! into sub-ranges. The policy is pluggable so new splitting strategies
//! slot in without touching the tree construction; the default keeps one
//! period covering the whole record.

use chrono::{DateTime, Duration, LocalResult, TimeZone, Utc};
use chrono_tz::Tz;
use timeloom_domain::constants::DEFAULT_IDLE_GAP_SECS;
use timeloom_domain::{ManualRecord, Result, TimeSpan, TimeloomError, UsageRecord};

/// One segment of a manual record's span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    /// Segment start (UTC)
    pub start_time: DateTime<Utc>,
    /// Segment end (UTC)
    pub end_time: DateTime<Utc>,
    /// Display label, e.g. "09:00 – 10:30" or "2024-03-10"
    pub name: String,
}

/// Strategy deciding how a manual record's span splits into periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentationPolicy {
    /// One period covering the whole record. The default.
    WholeEntry,

    /// Start a new period whenever the gap between consecutive matched
    /// usage records exceeds the threshold.
    IdleGap {
        /// Largest tolerated gap in seconds; gaps equal to the threshold
        /// still merge
        max_gap_secs: i64,
    },

    /// Split at local midnights of the given timezone.
    CalendarDay {
        /// Timezone whose calendar days define the boundaries
        timezone: Tz,
    },
}

impl Default for SegmentationPolicy {
    fn default() -> Self {
        Self::WholeEntry
    }
}

impl SegmentationPolicy {
    /// Idle-gap policy with the stock threshold.
    #[must_use]
    pub fn default_idle_gap() -> Self {
        Self::IdleGap { max_gap_secs: DEFAULT_IDLE_GAP_SECS }
    }

    /// Validate the policy configuration.
    ///
    /// A non-positive idle-gap threshold is a caller bug rather than an
    /// input anomaly, so it errors instead of degrading.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::IdleGap { max_gap_secs } if *max_gap_secs <= 0 => {
                Err(TimeloomError::InvalidInput(format!(
                    "idle gap threshold must be positive, got {max_gap_secs}"
                )))
            }
            _ => Ok(()),
        }
    }

    /// Split `record`'s span into ordered, non-overlapping periods.
    ///
    /// `matched` are the usage records grouped under this record; only the
    /// idle-gap policy reads them. Always returns at least one period.
    #[must_use]
    pub fn split(
        &self,
        record: &ManualRecord,
        matched: &[UsageRecord],
        now: DateTime<Utc>,
    ) -> Vec<Period> {
        let span_start = record.start_time;
        // Inverted records degrade to an empty span at their start
        let span_end = record.span_end().unwrap_or(now).max(span_start);

        match self {
            Self::WholeEntry => vec![range_period(span_start, span_end)],
            Self::IdleGap { max_gap_secs } => {
                split_on_idle_gaps(span_start, span_end, matched, *max_gap_secs, now)
            }
            Self::CalendarDay { timezone } => split_on_midnights(span_start, span_end, *timezone),
        }
    }
}

/// Index of the period containing `at`, clamped into `[0, len)`.
///
/// Instants before the first period map to it, instants past the last
/// period map to the last. Callers guarantee `periods` is non-empty.
pub(crate) fn period_index(periods: &[Period], at: DateTime<Utc>) -> usize {
    periods
        .iter()
        .position(|p| at < p.end_time)
        .unwrap_or_else(|| periods.len().saturating_sub(1))
}

fn range_period(start: DateTime<Utc>, end: DateTime<Utc>) -> Period {
    Period {
        start_time: start,
        end_time: end,
        name: format!("{} – {}", start.format("%H:%M"), end.format("%H:%M")),
    }
}

fn day_period(start: DateTime<Utc>, end: DateTime<Utc>, tz: Tz) -> Period {
    Period {
        start_time: start,
        end_time: end,
        name: start.with_timezone(&tz).format("%Y-%m-%d").to_string(),
    }
}

/// Group matched usage records into activity runs separated by gaps above
/// the threshold. Records are clipped to the span first; with no matched
/// usage the whole span is one period.
fn split_on_idle_gaps(
    span_start: DateTime<Utc>,
    span_end: DateTime<Utc>,
    matched: &[UsageRecord],
    max_gap_secs: i64,
    now: DateTime<Utc>,
) -> Vec<Period> {
    let mut clipped: Vec<(DateTime<Utc>, DateTime<Utc>)> = matched
        .iter()
        .filter_map(|record| {
            let start = record.start_time.max(span_start);
            let end = record.span_end().unwrap_or(now).min(span_end);
            (end > start).then_some((start, end))
        })
        .collect();

    if clipped.is_empty() {
        return vec![range_period(span_start, span_end)];
    }

    clipped.sort_unstable();

    let mut periods = Vec::new();
    let (mut run_start, mut run_end) = clipped[0];
    for (start, end) in clipped.into_iter().skip(1) {
        if (start - run_end) <= Duration::seconds(max_gap_secs) {
            run_end = run_end.max(end);
        } else {
            periods.push(range_period(run_start, run_end));
            run_start = start;
            run_end = end;
        }
    }
    periods.push(range_period(run_start, run_end));

    periods
}

/// Split the span at each local midnight of `tz` strictly inside it.
fn split_on_midnights(span_start: DateTime<Utc>, span_end: DateTime<Utc>, tz: Tz) -> Vec<Period> {
    let mut periods = Vec::new();
    let mut cursor = span_start;

    while let Some(midnight) = next_local_midnight(cursor, tz) {
        if midnight >= span_end || midnight <= cursor {
            break;
        }
        periods.push(day_period(cursor, midnight, tz));
        cursor = midnight;
    }

    periods.push(day_period(cursor, span_end, tz));
    periods
}

/// The first local midnight of `tz` strictly after `after`, in UTC.
///
/// A midnight skipped by a DST transition resolves to the first existing
/// instant of that day instead.
fn next_local_midnight(after: DateTime<Utc>, tz: Tz) -> Option<DateTime<Utc>> {
    let next_day = after.with_timezone(&tz).date_naive().succ_opt()?;
    let midnight = next_day.and_hms_opt(0, 0, 0)?;

    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt.with_timezone(&Utc)),
        LocalResult::None => {
            // Midnight does not exist in this zone on this day, step forward
            // until an instant resolves
            let shifted = midnight.checked_add_signed(Duration::hours(1))?;
            tz.from_local_datetime(&shifted).earliest().map(|dt| dt.with_timezone(&Utc))
        }
    }
}

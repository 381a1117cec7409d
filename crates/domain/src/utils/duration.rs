//! Duration display formatting
//!
//! Every tree level and the report header render durations through the same
//! function, so a group label and the grand total can never disagree on
//! formatting.

use crate::constants::{SUB_MINUTE_LABEL, ZERO_TOTAL_LABEL};

/// Render a duration in seconds as a short human-readable string.
///
/// Three regimes:
/// * zero (or negative, clamped) renders the literal `"0m 0s"`, reserved
///   for the empty state;
/// * anything positive under a minute renders `"<1m"`;
/// * everything else renders `"{h}h {m}m"`, omitting the hour part when it
///   is zero. Seconds never appear above the sub-minute regime.
///
/// # Arguments
///
/// * `secs` - Duration in seconds
///
/// # Returns
///
/// The formatted duration string
///
/// # Examples
///
/// ```
/// use timeloom_domain::utils::duration::format_duration;
///
/// assert_eq!(format_duration(0), "0m 0s");
/// assert_eq!(format_duration(59), "<1m");
/// assert_eq!(format_duration(60), "1m");
/// assert_eq!(format_duration(3600), "1h 0m");
/// assert_eq!(format_duration(7512), "2h 5m");
/// ```
#[must_use]
pub fn format_duration(secs: i64) -> String {
    if secs <= 0 {
        return ZERO_TOTAL_LABEL.to_string();
    }
    if secs < 60 {
        return SUB_MINUTE_LABEL.to_string();
    }

    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    if hours == 0 {
        format!("{minutes}m")
    } else {
        format!("{hours}h {minutes}m")
    }
}

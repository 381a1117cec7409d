//! Pure string utility functions for display-title resolution
//!
//! The deepest tree level groups usage records by their best available
//! title. Centralizing the resolution and truncation here keeps grouping
//! and rendering consistent: identical titles always merge, and truncation
//! only ever affects the display name, never the grouping identity.

use crate::constants::{MAX_TITLE_LENGTH, TITLE_TRUNCATE_SUFFIX};
use crate::types::records::UsageRecord;

/// Resolve the best available display title for a usage record.
///
/// Falls back from the window/document title to the application name, and
/// finally to the stable application id, so every record resolves to a
/// non-empty title. Whitespace-only titles count as absent.
///
/// # Arguments
///
/// * `record` - The usage record to resolve a title for
///
/// # Returns
///
/// The resolved, trimmed title string
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use timeloom_domain::utils::title::resolved_title;
/// use timeloom_domain::UsageRecord;
/// use uuid::Uuid;
///
/// let mut record = UsageRecord {
///     id: Uuid::nil(),
///     start_time: Utc::now(),
///     end_time: None,
///     app_id: "com.example.editor".to_string(),
///     app_name: "Editor".to_string(),
///     window_title: Some("  notes.md  ".to_string()),
///     icon: None,
/// };
/// assert_eq!(resolved_title(&record), "notes.md");
///
/// record.window_title = Some("   ".to_string());
/// assert_eq!(resolved_title(&record), "Editor");
/// ```
#[must_use]
pub fn resolved_title(record: &UsageRecord) -> String {
    if let Some(title) = record.window_title.as_deref() {
        let trimmed = title.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let name = record.app_name.trim();
    if name.is_empty() {
        record.app_id.clone()
    } else {
        name.to_string()
    }
}

/// Truncate long titles to a maximum length with ellipsis.
///
/// If the title exceeds `MAX_TITLE_LENGTH` characters, truncates it and
/// appends `TITLE_TRUNCATE_SUFFIX`. Counts characters rather than bytes so
/// multi-byte titles never split mid-character.
///
/// # Arguments
///
/// * `title` - The title string to potentially truncate
///
/// # Returns
///
/// The original title if within limits, or a truncated version with suffix
///
/// # Examples
///
/// ```
/// use timeloom_domain::utils::title::truncate_title;
///
/// let short = "Short Title";
/// assert_eq!(truncate_title(short), "Short Title");
///
/// let long = "x".repeat(200);
/// let result = truncate_title(&long);
/// assert!(result.chars().count() <= 60); // Assuming MAX_TITLE_LENGTH is 60
/// assert!(result.ends_with("..."));
/// ```
#[must_use]
pub fn truncate_title(title: &str) -> String {
    if title.chars().count() <= MAX_TITLE_LENGTH {
        return title.to_string();
    }

    let keep = MAX_TITLE_LENGTH - TITLE_TRUNCATE_SUFFIX.len();
    let cut: String = title.chars().take(keep).collect();
    format!("{cut}{TITLE_TRUNCATE_SUFFIX}")
}

//! Application constants
//!
//! Centralized location for constants shared between the rollup engine and
//! its presentation consumers. Keeping the literals here means the engine,
//! the UI bridge, and the tests all agree on the same strings.

// Display constants

/// Maximum length of a rendered group title before truncation
pub const MAX_TITLE_LENGTH: usize = 60;

/// Suffix appended to truncated titles
pub const TITLE_TRUNCATE_SUFFIX: &str = "...";

/// Literal rendered for an all-zero total. Reserved for the empty state so
/// the UI can tell "nothing tracked" apart from "under a minute tracked".
pub const ZERO_TOTAL_LABEL: &str = "0m 0s";

/// Label rendered for a non-zero duration under one minute
pub const SUB_MINUTE_LABEL: &str = "<1m";

// Group names

/// Display name of the synthetic top-level group collecting records that
/// resolve to no project
pub const UNASSIGNED_GROUP_NAME: &str = "Unassigned";

/// Display name of the bucket collecting usage records that matched no
/// manual record at all
pub const NO_MANUAL_RECORD_GROUP_NAME: &str = "No time entry";

// Segmentation defaults

/// Default idle-gap threshold in seconds (3 minutes)
pub const DEFAULT_IDLE_GAP_SECS: i64 = 180;

//! Usage and manual record types
//!
//! Both record kinds share the same interval shape: a start timestamp and
//! an optional end timestamp, where `None` means the interval is still
//! open. The [`TimeSpan`] trait captures that shape so duration math works
//! uniformly over either kind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;
use uuid::Uuid;

use crate::types::project::ProjectId;

/// Shared interval shape for everything the duration aggregator sweeps over.
pub trait TimeSpan {
    /// Start of the interval.
    fn span_start(&self) -> DateTime<Utc>;

    /// End of the interval, or `None` while the interval is still open.
    fn span_end(&self) -> Option<DateTime<Utc>>;

    /// Duration in seconds, evaluating an open interval against `now`.
    ///
    /// An inverted interval (end before start) clamps to zero rather than
    /// going negative.
    fn duration_secs(&self, now: DateTime<Utc>) -> i64 {
        let end = self.span_end().unwrap_or(now);
        (end - self.span_start()).num_seconds().max(0)
    }

    /// Whether the interval has no end timestamp yet.
    fn is_open(&self) -> bool {
        self.span_end().is_none()
    }
}

/// An automatically captured interval of application usage.
///
/// Immutable once closed. The capture layer guarantees at most one usage
/// record is open at any instant; the engine never relies on that but the
/// matcher does exclude open records from assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct UsageRecord {
    /// Unique identifier for the record
    pub id: Uuid,

    /// Start timestamp (UTC)
    pub start_time: DateTime<Utc>,

    /// End timestamp; `None` while the application still has focus
    pub end_time: Option<DateTime<Utc>>,

    /// Stable application identity (e.g. a bundle identifier)
    pub app_id: String,

    /// Human-readable application name
    pub app_name: String,

    /// Frontmost window or document title, when the platform exposes one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_title: Option<String>,

    /// Icon asset reference for the presentation layer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl UsageRecord {
    /// Whether the capture layer has closed this record.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.end_time.is_some()
    }
}

impl TimeSpan for UsageRecord {
    fn span_start(&self) -> DateTime<Utc> {
        self.start_time
    }

    fn span_end(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }
}

/// A user-authored interval of work, optionally linked to a project.
///
/// Manual records come from hand entry, calendar imports, or stopping a
/// running timer. They stay mutable until deleted, so the engine treats
/// them as plain input data and never caches derived state on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct ManualRecord {
    /// Unique identifier for the record
    pub id: Uuid,

    /// Start timestamp (UTC)
    pub start_time: DateTime<Utc>,

    /// End timestamp; `None` while a timer is still running
    pub end_time: Option<DateTime<Utc>>,

    /// User-facing title describing the work
    pub title: String,

    /// Free-form notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Linked project, if the user assigned one. The reference is not
    /// validated here; a dangling id degrades to unassigned downstream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
}

impl TimeSpan for ManualRecord {
    fn span_start(&self) -> DateTime<Utc> {
        self.start_time
    }

    fn span_end(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }
}

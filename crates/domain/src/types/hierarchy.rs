//! Rollup tree types
//!
//! The rollup tree is a derived, non-persisted artifact: the engine rebuilds
//! the whole tree on every recomputation, and no node identity survives a
//! rebuild except the opaque `key` the presentation layer uses to correlate
//! expand/collapse state across rebuilds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;
use uuid::Uuid;

use crate::types::project::ProjectId;
use crate::types::records::{ManualRecord, UsageRecord};
use crate::utils::duration::format_duration;

/// Level tag plus level-specific metadata for one rollup tree node.
///
/// This is a closed sum type: consumers match exhaustively, so adding a
/// level is a compile-visible change everywhere the tree is walked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub enum GroupLevel {
    /// A top-level project from the catalog, or the synthetic unassigned
    /// group when `project_id` is `None`.
    Project {
        /// Catalog id; `None` marks the synthetic unassigned group
        #[serde(skip_serializing_if = "Option::is_none")]
        project_id: Option<ProjectId>,
        /// Catalog color for rendering
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },

    /// A direct child of the enclosing project group.
    Subproject {
        /// Catalog id of the subproject
        project_id: ProjectId,
        /// Catalog color for rendering
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },

    /// Content grouped under the originating manual record, or under the
    /// fallback bucket when `record_id` is `None`.
    ManualRecord {
        /// Originating record id; `None` marks the bucket for usage records
        /// that matched no manual record
        #[serde(skip_serializing_if = "Option::is_none")]
        record_id: Option<Uuid>,
    },

    /// One segment of a manual record's span.
    TimePeriod {
        /// Segment start (UTC)
        start_time: DateTime<Utc>,
        /// Segment end (UTC)
        end_time: DateTime<Utc>,
    },

    /// Usage grouped by stable application identity.
    AppName {
        /// Stable application identity shared by the grouped records
        app_id: String,
    },

    /// Usage grouped by resolved window/document title.
    AppTitle {
        /// Full resolved title shared by the grouped records
        title: String,
    },
}

/// One node of the rollup tree.
///
/// Duration and item count are rolled up eagerly at build time, so reading
/// them never triggers recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct HierarchyGroup {
    /// Opaque deterministic key. Stable across rebuilds of the same input,
    /// unique among siblings; the only identity a node has.
    pub key: String,

    /// Display name
    pub name: String,

    /// Level tag plus level-specific metadata
    pub level: GroupLevel,

    /// Ordered child groups
    pub children: Vec<HierarchyGroup>,

    /// Usage-record leaves attached directly to this node
    pub usage_records: Vec<UsageRecord>,

    /// Manual-record leaves attached directly to this node
    pub manual_records: Vec<ManualRecord>,

    /// Wall-clock seconds covered by all descendant leaves, overlap counted
    /// once
    #[cfg_attr(feature = "ts-gen", ts(type = "number"))]
    pub duration_secs: i64,

    /// Number of leaf records (usage and manual) in this subtree
    #[cfg_attr(feature = "ts-gen", ts(type = "number"))]
    pub item_count: usize,
}

impl HierarchyGroup {
    /// Human-readable duration, same formatting as the report total.
    #[must_use]
    pub fn formatted_duration(&self) -> String {
        format_duration(self.duration_secs)
    }

    /// Whether this node is the synthetic unassigned group.
    #[must_use]
    pub fn is_unassigned(&self) -> bool {
        matches!(
            self.level,
            GroupLevel::Project {
                project_id: None,
                ..
            }
        )
    }
}

/// Inclusion flags applied to the input sets before matching.
///
/// Exclusion removes records from the computation entirely, which can
/// change matching outcomes downstream: with manual records excluded, every
/// usage record falls through to the unassigned bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct InclusionFilters {
    /// Include user-authored manual records
    pub include_manual_records: bool,

    /// Include automatically captured usage records
    pub include_usage_records: bool,

    /// Group usage down to the per-title level; when `false` the tree
    /// bottoms out at the application level
    pub include_titles: bool,
}

impl Default for InclusionFilters {
    fn default() -> Self {
        Self {
            include_manual_records: true,
            include_usage_records: true,
            include_titles: true,
        }
    }
}

impl InclusionFilters {
    /// Whether both record sources are switched off.
    #[must_use]
    pub fn excludes_all_records(&self) -> bool {
        !self.include_manual_records && !self.include_usage_records
    }
}

/// A fully built rollup: the tree plus its deduplicated grand total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct RollupReport {
    /// Ordered top-level groups
    pub groups: Vec<HierarchyGroup>,

    /// Wall-clock seconds covered by every leaf in the report, overlap
    /// counted once even across groups
    #[cfg_attr(feature = "ts-gen", ts(type = "number"))]
    pub total_secs: i64,

    /// Number of leaf records across the whole report
    #[cfg_attr(feature = "ts-gen", ts(type = "number"))]
    pub record_count: usize,
}

impl RollupReport {
    /// Human-readable grand total for the report header.
    #[must_use]
    pub fn formatted_total(&self) -> String {
        format_duration(self.total_secs)
    }

    /// Whether the report carries no groups at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

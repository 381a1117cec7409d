//! Overlap matching between usage records and manual records
//!
//! For every closed usage record the matcher ranks all manual records it
//! overlaps in time, then resolves a project assignment from the top-ranked
//! match. The full ranking is kept for diagnostics; the assignment drives
//! where the record lands in the rollup tree.

use ahash::AHashMap as HashMap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use timeloom_domain::{ManualRecord, ProjectId, UsageRecord};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::rollup::catalog::ProjectCatalog;

/// One ranked manual-record match for a usage record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchCandidate {
    /// Matched manual record
    pub record_id: Uuid,
    /// Seconds during which both intervals hold
    pub overlap_secs: i64,
    /// Project reference carried by the manual record, unresolved
    pub project_id: Option<ProjectId>,
}

/// Ranked matches and resolved assignment for one usage record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchOutcome {
    /// The usage record being matched
    pub usage: UsageRecord,
    /// Candidates ordered by overlap desc, then start asc, then id asc
    pub candidates: Vec<MatchCandidate>,
    /// Winning manual record, when any overlap existed
    pub winner: Option<ManualRecord>,
    /// Resolved project assignment; `None` means unassigned
    pub project_id: Option<ProjectId>,
}

impl MatchOutcome {
    /// Whether this record resolved to a project.
    #[must_use]
    pub fn is_assigned(&self) -> bool {
        self.project_id.is_some()
    }
}

/// Full matching result over one input snapshot.
///
/// Every usage record appears in exactly one partition side: assigned to
/// exactly one project, or unassigned. Open records and records with no
/// overlap land on the unassigned side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    /// Per-record outcomes, in input order
    pub outcomes: Vec<MatchOutcome>,
}

impl MatchReport {
    /// Usage records paired with their winning manual record, keyed by
    /// resolved project.
    #[must_use]
    pub fn assignments(&self) -> HashMap<ProjectId, Vec<(&UsageRecord, &ManualRecord)>> {
        let mut assigned: HashMap<ProjectId, Vec<(&UsageRecord, &ManualRecord)>> = HashMap::new();
        for outcome in &self.outcomes {
            if let (Some(project_id), Some(winner)) = (outcome.project_id, outcome.winner.as_ref())
            {
                assigned.entry(project_id).or_default().push((&outcome.usage, winner));
            }
        }
        assigned
    }

    /// Usage records that resolved to no project.
    #[must_use]
    pub fn unassigned(&self) -> Vec<&UsageRecord> {
        self.outcomes.iter().filter(|o| !o.is_assigned()).map(|o| &o.usage).collect()
    }

    /// Number of records that resolved to a project.
    #[must_use]
    pub fn assigned_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_assigned()).count()
    }
}

/// Matches usage records against manual records by time overlap.
pub struct OverlapMatcher<'a> {
    catalog: &'a ProjectCatalog,
}

impl<'a> OverlapMatcher<'a> {
    /// Create a matcher resolving project references against `catalog`.
    #[must_use]
    pub fn new(catalog: &'a ProjectCatalog) -> Self {
        Self { catalog }
    }

    /// Match every usage record against the manual records.
    ///
    /// Ranking per record: overlap seconds descending, then manual start
    /// ascending, then manual id ascending, so equal inputs always produce
    /// the same ranking. The winner's project reference becomes the
    /// assignment; a dangling reference degrades to unassigned.
    ///
    /// Open usage records are never matched. Open manual records are
    /// evaluated against `now`, so a running timer can still win.
    #[must_use]
    pub fn match_records(
        &self,
        usage: &[UsageRecord],
        manual: &[ManualRecord],
        now: DateTime<Utc>,
    ) -> MatchReport {
        let outcomes = usage.iter().map(|record| self.match_one(record, manual, now)).collect();

        let report = MatchReport { outcomes };
        debug!(
            records = usage.len(),
            assigned = report.assigned_count(),
            "matched usage records against manual records"
        );
        report
    }

    fn match_one(
        &self,
        record: &UsageRecord,
        manual: &[ManualRecord],
        now: DateTime<Utc>,
    ) -> MatchOutcome {
        // Open records are still being captured and stay unassigned
        if !record.is_closed() {
            return MatchOutcome {
                usage: record.clone(),
                candidates: Vec::new(),
                winner: None,
                project_id: None,
            };
        }

        let mut ranked: Vec<(&ManualRecord, i64)> = manual
            .iter()
            .filter_map(|entry| {
                let secs = overlap_secs(record, entry, now);
                (secs > 0).then_some((entry, secs))
            })
            .collect();

        ranked.sort_by(|(a, a_secs), (b, b_secs)| {
            b_secs
                .cmp(a_secs)
                .then_with(|| a.start_time.cmp(&b.start_time))
                .then_with(|| a.id.cmp(&b.id))
        });

        let winner = ranked.first().map(|(entry, _)| (*entry).clone());
        let project_id = winner.as_ref().and_then(|entry| self.resolve_project(entry));

        let candidates = ranked
            .into_iter()
            .map(|(entry, overlap_secs)| MatchCandidate {
                record_id: entry.id,
                overlap_secs,
                project_id: entry.project_id,
            })
            .collect();

        MatchOutcome { usage: record.clone(), candidates, winner, project_id }
    }

    /// Resolve the winner's project reference against the catalog.
    fn resolve_project(&self, winner: &ManualRecord) -> Option<ProjectId> {
        let project_id = winner.project_id?;
        if self.catalog.contains(project_id) {
            Some(project_id)
        } else {
            warn!(
                record_id = %winner.id,
                project_id = %project_id,
                "manual record references an unknown project, treating as unassigned"
            );
            None
        }
    }
}

/// Seconds during which both intervals hold. Half-open, so touching
/// intervals overlap by zero.
fn overlap_secs(usage: &UsageRecord, entry: &ManualRecord, now: DateTime<Utc>) -> i64 {
    let Some(usage_end) = usage.end_time else {
        return 0;
    };

    let start = usage.start_time.timestamp().max(entry.start_time.timestamp());
    let end = usage_end.timestamp().min(entry.end_time.unwrap_or(now).timestamp());
    (end - start).max(0)
}

//! Rollup service - materializes an input snapshot and builds the report
//!
//! The service is the impure edge of the engine: it pulls one consistent
//! snapshot of records and projects through the ports, pins `now` once,
//! and hands everything to the pure builder. Callers re-invoke it after
//! any mutation; there is no incremental path.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use timeloom_domain::{InclusionFilters, Result, RollupReport};
use tracing::{debug, info};

use super::hierarchy::HierarchyBuilder;
use super::ports::{ManualRecordRepository, ProjectRepository, UsageRecordRepository};
use super::segmentation::SegmentationPolicy;

/// Builds rollup reports from the storage ports.
pub struct RollupService {
    usage_repo: Arc<dyn UsageRecordRepository>,
    manual_repo: Arc<dyn ManualRecordRepository>,
    project_repo: Arc<dyn ProjectRepository>,
    builder: HierarchyBuilder,
}

impl fmt::Debug for RollupService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The repository fields are trait objects without a Debug bound
        f.debug_struct("RollupService").finish_non_exhaustive()
    }
}

impl RollupService {
    /// Create a new rollup service with the default segmentation policy.
    pub fn new(
        usage_repo: Arc<dyn UsageRecordRepository>,
        manual_repo: Arc<dyn ManualRecordRepository>,
        project_repo: Arc<dyn ProjectRepository>,
    ) -> Self {
        Self { usage_repo, manual_repo, project_repo, builder: HierarchyBuilder::default() }
    }

    /// Replace the segmentation policy.
    ///
    /// # Errors
    /// Returns `InvalidInput` when the policy configuration is invalid.
    pub fn with_policy(mut self, policy: SegmentationPolicy) -> Result<Self> {
        self.builder = HierarchyBuilder::new(policy)?;
        Ok(self)
    }

    /// Build the report for the half-open range `[start, end)`, evaluating
    /// open records against the current wall clock.
    pub fn build_report(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        filters: InclusionFilters,
    ) -> Result<RollupReport> {
        self.build_report_at(start, end, filters, Utc::now())
    }

    /// Build the report for `[start, end)` with an explicit `now`.
    ///
    /// Pinning `now` makes report builds reproducible; the wall-clock
    /// variant above is a thin wrapper over this.
    pub fn build_report_at(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        filters: InclusionFilters,
        now: DateTime<Utc>,
    ) -> Result<RollupReport> {
        let usage = self.usage_repo.records_in_range(start, end)?;
        let manual = self.manual_repo.records_in_range(start, end)?;
        let projects = self.project_repo.all_projects()?;
        debug!(
            usage = usage.len(),
            manual = manual.len(),
            projects = projects.len(),
            "materialized rollup snapshot"
        );

        let report = self.builder.build_report(&usage, &manual, &projects, filters, now);
        info!(
            groups = report.groups.len(),
            records = report.record_count,
            total_secs = report.total_secs,
            "rebuilt rollup report"
        );
        Ok(report)
    }
}

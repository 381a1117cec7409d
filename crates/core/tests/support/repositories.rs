//! Mock repository implementations for testing
//!
//! In-memory mocks for the rollup ports, enabling deterministic pipeline
//! tests without storage dependencies.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use timeloom_core::{ManualRecordRepository, ProjectRepository, UsageRecordRepository};
use timeloom_domain::{
    ManualRecord, Project, Result as DomainResult, TimeloomError, UsageRecord,
};

/// In-memory mock for `UsageRecordRepository`.
///
/// Stores a fixed set of records and answers range queries with half-open
/// overlap semantics, treating open records as ongoing.
#[derive(Default, Clone)]
pub struct MockUsageRecordRepository {
    records: Arc<Vec<UsageRecord>>,
}

impl MockUsageRecordRepository {
    /// Create a new mock seeded with the provided records.
    pub fn new(records: Vec<UsageRecord>) -> Self {
        Self { records: Arc::new(records) }
    }

    /// Convenience helper for adding a single record to the mock.
    pub fn with_record(mut self, record: UsageRecord) -> Self {
        Arc::make_mut(&mut self.records).push(record);
        self
    }
}

impl UsageRecordRepository for MockUsageRecordRepository {
    fn records_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<UsageRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.start_time < end && r.end_time.map_or(true, |e| e > start))
            .cloned()
            .collect())
    }
}

/// In-memory mock for `ManualRecordRepository`.
#[derive(Default, Clone)]
pub struct MockManualRecordRepository {
    records: Arc<Vec<ManualRecord>>,
}

impl MockManualRecordRepository {
    /// Create a new mock seeded with the provided records.
    pub fn new(records: Vec<ManualRecord>) -> Self {
        Self { records: Arc::new(records) }
    }

    /// Convenience helper for adding a single record to the mock.
    pub fn with_record(mut self, record: ManualRecord) -> Self {
        Arc::make_mut(&mut self.records).push(record);
        self
    }
}

impl ManualRecordRepository for MockManualRecordRepository {
    fn records_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<ManualRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.start_time < end && r.end_time.map_or(true, |e| e > start))
            .cloned()
            .collect())
    }
}

/// In-memory mock for `ProjectRepository`.
#[derive(Default, Clone)]
pub struct MockProjectRepository {
    projects: Arc<Vec<Project>>,
}

impl MockProjectRepository {
    /// Create a new mock seeded with the provided projects.
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects: Arc::new(projects) }
    }
}

impl ProjectRepository for MockProjectRepository {
    fn all_projects(&self) -> DomainResult<Vec<Project>> {
        Ok(self.projects.as_ref().clone())
    }
}

/// Project repository that always fails, for error-path tests.
#[derive(Default, Clone)]
pub struct FailingProjectRepository;

impl ProjectRepository for FailingProjectRepository {
    fn all_projects(&self) -> DomainResult<Vec<Project>> {
        Err(TimeloomError::Repository("catalog unavailable".to_string()))
    }
}

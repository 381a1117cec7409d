//! Port interfaces for the rollup engine
//!
//! The engine stays pure: everything it consumes arrives through these
//! traits, implemented by the storage layer. All methods are synchronous
//! snapshot reads; mutation happens elsewhere and simply makes the next
//! rebuild see different data.

use chrono::{DateTime, Utc};
use timeloom_domain::{ManualRecord, Project, Result, UsageRecord};

/// Source of automatically captured usage records.
pub trait UsageRecordRepository: Send + Sync {
    /// Usage records overlapping the half-open range `[start, end)`.
    ///
    /// Implementations should include records that are still open.
    fn records_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<UsageRecord>>;
}

/// Source of user-authored manual records.
pub trait ManualRecordRepository: Send + Sync {
    /// Manual records overlapping the half-open range `[start, end)`.
    fn records_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ManualRecord>>;
}

/// Read-only access to the project catalog.
pub trait ProjectRepository: Send + Sync {
    /// The full catalog including parent pointers.
    ///
    /// The engine resolves nesting itself, so the whole forest is needed
    /// even when only some projects carry records.
    fn all_projects(&self) -> Result<Vec<Project>>;
}

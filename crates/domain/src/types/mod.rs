//! Domain types and models
//!
//! Split by concern: record types (the engine's leaves), the project
//! catalog, and the rollup tree.

pub mod hierarchy;
pub mod project;
pub mod records;

pub use hierarchy::{GroupLevel, HierarchyGroup, InclusionFilters, RollupReport};
pub use project::{Project, ProjectId};
pub use records::{ManualRecord, TimeSpan, UsageRecord};

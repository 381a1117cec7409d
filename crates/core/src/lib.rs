//! # Timeloom Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The duration aggregator, overlap matcher, and hierarchy builder
//! - Port/adapter interfaces (traits) for record and catalog storage
//! - The rollup service composing the above into one report build
//!
//! ## Architecture Principles
//! - Only depends on `timeloom-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod rollup;

// Re-export specific items to avoid ambiguity
pub use rollup::aggregator::{merged_duration_secs, merged_epoch_secs};
pub use rollup::catalog::ProjectCatalog;
pub use rollup::hierarchy::{build_hierarchy, HierarchyBuilder};
pub use rollup::matcher::{MatchCandidate, MatchOutcome, MatchReport, OverlapMatcher};
pub use rollup::ports::{ManualRecordRepository, ProjectRepository, UsageRecordRepository};
pub use rollup::segmentation::SegmentationPolicy;
pub use rollup::RollupService;

//! Usage reconciliation and rollup domain
//!
//! The pipeline runs in three pure stages: the matcher pairs usage records
//! with the manual records they overlap, the hierarchy builder groups the
//! partition into the six-level tree, and the aggregator computes
//! double-counting-safe durations for every node. `RollupService` wires the
//! stages to the storage ports.

pub mod aggregator;
pub mod catalog;
pub mod hierarchy;
pub mod matcher;
pub mod ports;
pub mod segmentation;
pub mod service;

pub use aggregator::{merged_duration_secs, merged_epoch_secs};
pub use catalog::ProjectCatalog;
pub use hierarchy::{build_hierarchy, HierarchyBuilder};
pub use matcher::{MatchCandidate, MatchOutcome, MatchReport, OverlapMatcher};
pub use ports::*;
pub use segmentation::{Period, SegmentationPolicy};
pub use service::RollupService;

//! # Timeloom Domain
//!
//! Business domain types and models for Timeloom.
//!
//! This crate contains:
//! - Record types (UsageRecord, ManualRecord) and project catalog types
//! - Rollup tree types (HierarchyGroup and its level metadata)
//! - Domain error types and Result definitions
//! - Pure display utilities (duration formatting, title resolution)
//!
//! ## Architecture
//! - No dependencies on other Timeloom crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
// Re-export display utilities
pub use utils::duration::format_duration;
pub use utils::title::{resolved_title, truncate_title};

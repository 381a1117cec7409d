//! Shared test helpers for `timeloom-core` integration tests.
//!
//! Provides reusable record fixtures and lightweight mock repositories so
//! the pipeline tests can focus on behaviour instead of boilerplate.

pub mod repositories;

use chrono::{DateTime, TimeZone, Utc};
use timeloom_domain::{ManualRecord, Project, ProjectId, UsageRecord};
use uuid::Uuid;

/// Epoch-seconds shorthand for fixture timestamps.
pub fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

/// A closed usage record for the given app over `[start, end)`.
pub fn create_test_usage(app: &str, title: Option<&str>, start: i64, end: i64) -> UsageRecord {
    UsageRecord {
        id: Uuid::new_v4(),
        start_time: ts(start),
        end_time: Some(ts(end)),
        app_id: format!("com.example.{app}"),
        app_name: app.to_string(),
        window_title: title.map(ToString::to_string),
        icon: None,
    }
}

/// A manual record over `[start, end)`, optionally linked to a project.
pub fn create_test_manual(
    title: &str,
    start: i64,
    end: i64,
    project_id: Option<ProjectId>,
) -> ManualRecord {
    ManualRecord {
        id: Uuid::new_v4(),
        start_time: ts(start),
        end_time: Some(ts(end)),
        title: title.to_string(),
        notes: None,
        project_id,
    }
}

/// A catalog project with the given sort order and optional parent.
pub fn create_test_project(name: &str, sort_order: i64, parent_id: Option<ProjectId>) -> Project {
    Project {
        id: ProjectId(Uuid::new_v4()),
        name: name.to_string(),
        color: "#4f92d1".to_string(),
        parent_id,
        sort_order,
    }
}

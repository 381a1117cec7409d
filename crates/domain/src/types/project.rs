//! Project catalog types
//!
//! Projects form a user-defined forest of categories. The rollup engine
//! consumes the catalog read-only: it resolves references and ordering from
//! it but never mutates it.

use std::fmt;

use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;
use uuid::Uuid;

/// Identifier of a project in the catalog.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct ProjectId(pub Uuid);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for ProjectId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// A node in the project forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct Project {
    /// Unique identifier for the project
    pub id: ProjectId,

    /// Display name
    pub name: String,

    /// Display color (hex string, e.g. "#4f92d1")
    pub color: String,

    /// Parent project; `None` for a top-level project. A dangling parent
    /// reference makes this project behave as top-level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ProjectId>,

    /// User-chosen position among siblings (ascending)
    #[cfg_attr(feature = "ts-gen", ts(type = "number"))]
    pub sort_order: i64,
}

impl Project {
    /// Whether the project declares no parent.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

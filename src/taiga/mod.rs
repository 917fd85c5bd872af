//! Taiga upstream API surface.
//!
//! [`client::TaigaClient`] is the only thing that talks HTTP; everything it
//! returns is the upstream JSON record, untouched. [`resolve`] builds the
//! multi-step lookups (project → entity-by-ref → comments) on top of it.

mod client;
pub mod resolve;

pub use client::{Session, TaigaClient, TaigaError};

/// The closed set of entity kinds the bridge exposes.
///
/// Resource paths and filter tables are dispatched on this tag, never on the
/// shape of the upstream JSON. IDs overlap numerically across kinds, so every
/// lookup goes through the kind-specific endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Project,
    UserStory,
    Task,
    Issue,
}

impl EntityKind {
    /// Upstream collection path, e.g. `userstories` in `GET /userstories/by_ref`.
    pub fn resource_path(&self) -> &'static str {
        match self {
            EntityKind::Project => "projects",
            EntityKind::UserStory => "userstories",
            EntityKind::Task => "tasks",
            EntityKind::Issue => "issues",
        }
    }

    /// History path for the comment thread. Projects have no comment thread.
    pub fn history_path(&self) -> Option<&'static str> {
        match self {
            EntityKind::Project => None,
            EntityKind::UserStory => Some("history/userstory"),
            EntityKind::Task => Some("history/task"),
            EntityKind::Issue => Some("history/issue"),
        }
    }

    /// Human-readable name used to tag not-found errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Project => "project",
            EntityKind::UserStory => "user story",
            EntityKind::Task => "task",
            EntityKind::Issue => "issue",
        }
    }
}

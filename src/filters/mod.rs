//! Filter-parameter normalization.
//!
//! Each entity kind has a closed table of recognized filter keys and their
//! value types. [`normalize`] walks untrusted caller arguments against that
//! table and produces the exact query-parameter map sent upstream:
//!
//! - unknown keys are dropped silently, keeping the tool surface forgiving of
//!   upstream filter additions;
//! - recognized keys with an incompatible value are caller bugs and fail with
//!   a validation error naming the key;
//! - when the table knows a `project` key and the caller supplied none, the
//!   configured default project is injected.
//!
//! Adding a filter is a data change in the tables below, not control flow.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::taiga::EntityKind;

/// Declared value type of one filter key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Integer ID (member, status, milestone, ...). Accepts integral JSON
    /// numbers and decimal strings.
    Int,
    /// Boolean flag. Accepts JSON booleans and the strings `"true"`/`"false"`.
    Bool,
    /// Tag list. Accepts a comma-separated string or an array of strings;
    /// encoded comma-joined the way Taiga expects.
    Tags,
}

impl FilterKind {
    fn expected(&self) -> &'static str {
        match self {
            FilterKind::Int => "an integer",
            FilterKind::Bool => "a boolean",
            FilterKind::Tags => "a comma-separated string or array of strings",
        }
    }
}

/// Recognized filter keys for one entity kind.
pub type FilterSpec = &'static [(&'static str, FilterKind)];

use FilterKind::{Bool, Int, Tags};

const PROJECT_FILTERS: FilterSpec = &[
    ("member", Int),
    ("is_looking_for_people", Bool),
    ("is_featured", Bool),
    ("is_backlog_activated", Bool),
    ("is_kanban_activated", Bool),
];

const USER_STORY_FILTERS: FilterSpec = &[
    ("project", Int),
    ("milestone", Int),
    ("milestone__isnull", Bool),
    ("status", Int),
    ("status__is_archived", Bool),
    ("status__is_closed", Bool),
    ("tags", Tags),
    ("watchers", Int),
    ("assigned_to", Int),
    ("epic", Int),
    ("role", Int),
    ("exclude_status", Int),
    ("exclude_tags", Tags),
    ("exclude_assigned_to", Int),
    ("exclude_role", Int),
    ("exclude_epic", Int),
];

const TASK_FILTERS: FilterSpec = &[
    ("project", Int),
    ("milestone", Int),
    ("status", Int),
    ("status__is_closed", Bool),
    ("tags", Tags),
    ("user_story", Int),
    ("role", Int),
    ("owner", Int),
    ("watchers", Int),
    ("assigned_to", Int),
    ("exclude_status", Int),
    ("exclude_tags", Tags),
    ("exclude_role", Int),
    ("exclude_owner", Int),
    ("exclude_assigned_to", Int),
];

const ISSUE_FILTERS: FilterSpec = &[
    ("project", Int),
    ("milestone", Int),
    ("status", Int),
    ("status__is_closed", Bool),
    ("severity", Int),
    ("priority", Int),
    ("type", Int),
    ("tags", Tags),
    ("owner", Int),
    ("role", Int),
    ("watchers", Int),
    ("assigned_to", Int),
    ("exclude_status", Int),
    ("exclude_severity", Int),
    ("exclude_priority", Int),
    ("exclude_tags", Tags),
    ("exclude_owner", Int),
    ("exclude_role", Int),
    ("exclude_assigned_to", Int),
];

/// The filter table for an entity kind.
pub fn spec_for(kind: EntityKind) -> FilterSpec {
    match kind {
        EntityKind::Project => PROJECT_FILTERS,
        EntityKind::UserStory => USER_STORY_FILTERS,
        EntityKind::Task => TASK_FILTERS,
        EntityKind::Issue => ISSUE_FILTERS,
    }
}

/// A caller-supplied filter value that does not fit its declared type.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("filter `{key}` expects {expected}, got {got}")]
    Validation {
        key: String,
        expected: &'static str,
        got: String,
    },
}

/// Normalize untrusted filter arguments into the upstream query map.
///
/// `default_project` is the process-wide default threaded in by the caller;
/// it is injected only when the kind's table has a `project` key and the
/// caller supplied none.
pub fn normalize(
    kind: EntityKind,
    raw: &Map<String, Value>,
    default_project: Option<i64>,
) -> Result<BTreeMap<String, String>, FilterError> {
    let spec = spec_for(kind);
    let mut query = BTreeMap::new();

    for (key, value) in raw {
        let Some((_, filter_kind)) = spec.iter().find(|(k, _)| *k == key.as_str()) else {
            // Unknown keys are dropped, not rejected.
            continue;
        };
        if value.is_null() {
            continue;
        }
        query.insert(key.clone(), encode(key, *filter_kind, value)?);
    }

    if let Some(project) = default_project {
        let takes_project = spec.iter().any(|(k, _)| *k == "project");
        if takes_project && !query.contains_key("project") {
            query.insert("project".to_string(), project.to_string());
        }
    }

    Ok(query)
}

/// Coerce one recognized value to Taiga's string encoding.
fn encode(key: &str, filter_kind: FilterKind, value: &Value) -> Result<String, FilterError> {
    let encoded = match (filter_kind, value) {
        (FilterKind::Bool, Value::Bool(b)) => Some(b.to_string()),
        (FilterKind::Bool, Value::String(s)) if s == "true" || s == "false" => Some(s.clone()),
        (FilterKind::Int, Value::Number(n)) => n.as_i64().map(|i| i.to_string()),
        (FilterKind::Int, Value::String(s)) => s.trim().parse::<i64>().ok().map(|i| i.to_string()),
        (FilterKind::Tags, Value::String(s)) => Some(s.clone()),
        (FilterKind::Tags, Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(|tags| tags.join(",")),
        _ => None,
    };

    encoded.ok_or_else(|| FilterError::Validation {
        key: key.to_string(),
        expected: filter_kind.expected(),
        got: value.to_string(),
    })
}

//! Reference resolution.
//!
//! Taiga addresses entities by opaque ID, but the UI (and therefore callers)
//! speaks in reference numbers that are unique only within one project. The
//! functions here chain the sequential upstream lookups needed to bridge the
//! two: resolve the project, resolve the entity by ref inside it, and attach
//! the comment thread for single-entity fetches. Each step is fallible and
//! short-circuits; there is nothing to roll back since every call is a read.

use serde_json::Value;

use super::{EntityKind, Session, TaigaClient, TaigaError};

/// A caller-supplied project identifier: numeric ID or slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectRef {
    Id(i64),
    Slug(String),
}

impl ProjectRef {
    /// Parse the raw tool argument. All-digit strings are IDs, anything else
    /// is a slug.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<i64>() {
            Ok(id) => ProjectRef::Id(id),
            Err(_) => ProjectRef::Slug(raw.to_string()),
        }
    }
}

impl std::fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectRef::Id(id) => write!(f, "{id}"),
            ProjectRef::Slug(slug) => write!(f, "{slug}"),
        }
    }
}

/// Fetch the full project record for an ID or slug.
pub async fn resolve_project(
    client: &TaigaClient,
    session: &Session,
    project: &ProjectRef,
) -> Result<Value, TaigaError> {
    match project {
        ProjectRef::Id(id) => client.get_project(session, *id).await,
        ProjectRef::Slug(slug) => client.get_project_by_slug(session, slug).await,
    }
}

/// Resolve a (project, ref) pair to the entity record.
///
/// Two sequential upstream calls: project first, then the kind-scoped by-ref
/// lookup. The project lookup runs even for numeric IDs, so a bad project is
/// reported as a missing project rather than a missing entity, and nothing
/// is issued past it.
pub async fn resolve_by_ref(
    client: &TaigaClient,
    session: &Session,
    kind: EntityKind,
    project: &ProjectRef,
    ref_num: i64,
) -> Result<Value, TaigaError> {
    let record = resolve_project(client, session, project).await?;
    let project_id = entity_id(&record)?;
    client.get_by_ref(session, kind, project_id, ref_num).await
}

/// Attach an entity's comment thread under a `comments` key.
///
/// All-or-nothing: a failed comment fetch fails the whole operation rather
/// than returning the entity with comments omitted.
pub async fn attach_comments(
    client: &TaigaClient,
    session: &Session,
    kind: EntityKind,
    entity: Value,
) -> Result<Value, TaigaError> {
    let id = entity_id(&entity)?;
    let comments = client.list_comments(session, kind, id).await?;

    let Value::Object(mut record) = entity else {
        return Err(TaigaError::Payload(format!(
            "{} record is not a JSON object",
            kind.as_str()
        )));
    };
    record.insert("comments".to_string(), comments);
    Ok(Value::Object(record))
}

/// Single-entity fetch by opaque ID, with comments.
pub async fn get_with_comments(
    client: &TaigaClient,
    session: &Session,
    kind: EntityKind,
    id: i64,
) -> Result<Value, TaigaError> {
    let entity = client.get_entity(session, kind, id).await?;
    attach_comments(client, session, kind, entity).await
}

/// Single-entity fetch by (project, ref), with comments.
pub async fn get_by_ref_with_comments(
    client: &TaigaClient,
    session: &Session,
    kind: EntityKind,
    project: &ProjectRef,
    ref_num: i64,
) -> Result<Value, TaigaError> {
    let entity = resolve_by_ref(client, session, kind, project, ref_num).await?;
    attach_comments(client, session, kind, entity).await
}

fn entity_id(record: &Value) -> Result<i64, TaigaError> {
    record
        .get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| TaigaError::Payload("record without a numeric id".to_string()))
}

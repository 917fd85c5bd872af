//! HTTP client for the Taiga API.
//!
//! Thin wrapper over `reqwest` that carries the session token and maps Taiga
//! status codes onto the bridge's error taxonomy. Records come back as raw
//! `serde_json::Value` - the bridge forwards upstream payloads verbatim.

use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

use super::EntityKind;

/// Errors surfaced by upstream calls.
#[derive(Debug, Error)]
pub enum TaigaError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("authentication rejected by Taiga: {0}")]
    Authentication(String),

    #[error("{resource} not found: {detail}")]
    NotFound {
        resource: &'static str,
        detail: String,
    },

    #[error("Taiga returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("unexpected Taiga payload: {0}")]
    Payload(String),
}

/// Authenticated session handle.
///
/// Obtained once from [`TaigaClient::authenticate`] and treated as read-only
/// for the life of the process; the bridge never re-authenticates.
#[derive(Clone)]
pub struct Session {
    token: String,
}

impl std::fmt::Debug for Session {
    // Token stays out of logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

/// HTTP client for the Taiga API.
#[derive(Debug, Clone)]
pub struct TaigaClient {
    base_url: String,
    client: Client,
}

impl TaigaClient {
    /// Create a client for the given base URL (with or without trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: Client::new(),
        }
    }

    /// Exchange credentials for a session token (`POST /auth`).
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Session, TaigaError> {
        let response = self
            .client
            .post(format!("{}/auth", self.base_url))
            .json(&serde_json::json!({
                "type": "normal",
                "username": username,
                "password": password,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return match status {
                StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    Err(TaigaError::Authentication(body))
                }
                _ => Err(TaigaError::Upstream {
                    status: status.as_u16(),
                    body,
                }),
            };
        }

        let body: Value = response.json().await?;
        let token = body
            .get("auth_token")
            .and_then(Value::as_str)
            .ok_or_else(|| TaigaError::Payload("auth response without auth_token".to_string()))?;

        tracing::info!(username, "authenticated against Taiga");
        Ok(Session {
            token: token.to_string(),
        })
    }

    /// Build an authenticated GET request.
    fn request(&self, session: &Session, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}/{}", self.base_url, path))
            .bearer_auth(&session.token)
    }

    /// Decode a response, converting Taiga status codes to [`TaigaError`].
    ///
    /// `resource` tags 404s so callers see which lookup came up empty.
    async fn handle_response(
        &self,
        resource: &'static str,
        response: reqwest::Response,
    ) -> Result<Value, TaigaError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(TaigaError::Authentication(body))
            }
            StatusCode::NOT_FOUND => Err(TaigaError::NotFound {
                resource,
                detail: body,
            }),
            _ => Err(TaigaError::Upstream {
                status: status.as_u16(),
                body,
            }),
        }
    }

    // ============================================================
    // Project Operations
    // ============================================================

    /// Get a project record by numeric ID.
    pub async fn get_project(&self, session: &Session, id: i64) -> Result<Value, TaigaError> {
        let response = self
            .request(session, &format!("projects/{id}"))
            .send()
            .await?;
        self.handle_response("project", response).await
    }

    /// Get a project record by slug.
    pub async fn get_project_by_slug(
        &self,
        session: &Session,
        slug: &str,
    ) -> Result<Value, TaigaError> {
        let response = self
            .request(session, "projects/by_slug")
            .query(&[("slug", slug)])
            .send()
            .await?;
        self.handle_response("project", response).await
    }

    /// List the user-story status categories of a project.
    pub async fn list_user_story_statuses(
        &self,
        session: &Session,
        project_id: i64,
    ) -> Result<Value, TaigaError> {
        let response = self
            .request(session, "userstory-statuses")
            .query(&[("project", project_id)])
            .send()
            .await?;
        self.handle_response("user story statuses", response).await
    }

    // ============================================================
    // Entity Operations
    // ============================================================

    /// List entities of a kind with an already-normalized query.
    pub async fn list(
        &self,
        session: &Session,
        kind: EntityKind,
        query: &BTreeMap<String, String>,
    ) -> Result<Value, TaigaError> {
        let pairs: Vec<(&str, &str)> = query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        // Taiga paginates list endpoints unless this header is present.
        let mut req = self
            .request(session, kind.resource_path())
            .header("x-disable-pagination", "1");
        if !pairs.is_empty() {
            req = req.query(&pairs);
        }
        let response = req.send().await?;
        self.handle_response(kind.as_str(), response).await
    }

    /// Get a single entity by its opaque ID.
    pub async fn get_entity(
        &self,
        session: &Session,
        kind: EntityKind,
        id: i64,
    ) -> Result<Value, TaigaError> {
        let response = self
            .request(session, &format!("{}/{}", kind.resource_path(), id))
            .send()
            .await?;
        self.handle_response(kind.as_str(), response).await
    }

    /// Get a single entity by its reference number within a project.
    ///
    /// Taiga exposes a distinct `by_ref` endpoint per kind; the (project, ref)
    /// pair is unique by upstream contract.
    pub async fn get_by_ref(
        &self,
        session: &Session,
        kind: EntityKind,
        project_id: i64,
        ref_num: i64,
    ) -> Result<Value, TaigaError> {
        let response = self
            .request(session, &format!("{}/by_ref", kind.resource_path()))
            .query(&[("project", project_id), ("ref", ref_num)])
            .send()
            .await?;
        self.handle_response(kind.as_str(), response).await
    }

    /// Fetch the comment thread of an entity, in upstream chronological order.
    pub async fn list_comments(
        &self,
        session: &Session,
        kind: EntityKind,
        id: i64,
    ) -> Result<Value, TaigaError> {
        let base = kind.history_path().ok_or_else(|| {
            TaigaError::Payload(format!("{} has no comment thread", kind.as_str()))
        })?;
        let response = self
            .request(session, &format!("{base}/{id}"))
            .query(&[("type", "comment")])
            .send()
            .await?;
        self.handle_response("comments", response).await
    }
}

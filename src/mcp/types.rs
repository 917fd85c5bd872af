//! Request types for MCP tools.
//!
//! List tools take their filters as top-level arguments (the flattened map),
//! so the normalizer - not the schema - decides what is recognized. That
//! keeps unknown filters forgiving (dropped) while type mismatches on known
//! keys still fail loudly.

use rmcp::schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetProjectInfoRequest {
    #[schemars(
        description = "Project ID or slug. Falls back to the configured default project when omitted."
    )]
    #[serde(default)]
    pub project: Option<String>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListProjectsRequest {
    #[schemars(
        description = "Optional filters: member (user ID), is_looking_for_people, is_featured, is_backlog_activated, is_kanban_activated (booleans). Unknown filters are ignored."
    )]
    #[serde(flatten)]
    pub filters: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListUserStoriesRequest {
    #[schemars(
        description = "Optional filters: project, milestone, status, epic, role, watchers, assigned_to, exclude_* (IDs); milestone__isnull, status__is_archived, status__is_closed (booleans); tags, exclude_tags (comma-separated). Unknown filters are ignored."
    )]
    #[serde(flatten)]
    pub filters: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListTasksRequest {
    #[schemars(
        description = "Optional filters: project, milestone, status, user_story, role, owner, watchers, assigned_to, exclude_* (IDs); status__is_closed (boolean); tags, exclude_tags (comma-separated). Unknown filters are ignored."
    )]
    #[serde(flatten)]
    pub filters: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListIssuesRequest {
    #[schemars(
        description = "Optional filters: project, milestone, status, severity, priority, type, role, owner, watchers, assigned_to, exclude_* (IDs); status__is_closed (boolean); tags, exclude_tags (comma-separated). Unknown filters are ignored."
    )]
    #[serde(flatten)]
    pub filters: Map<String, Value>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetUserStoryRequest {
    #[schemars(description = "The ID of the user story to retrieve")]
    pub user_story_id: i64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetUserStoryByRefRequest {
    #[schemars(description = "Project ID or slug the user story belongs to")]
    pub project: String,
    #[schemars(description = "The user story's reference number within the project")]
    pub r#ref: i64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetTaskRequest {
    #[schemars(description = "The ID of the task to retrieve")]
    pub task_id: i64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetTaskByRefRequest {
    #[schemars(description = "Project ID or slug the task belongs to")]
    pub project: String,
    #[schemars(description = "The task's reference number within the project")]
    pub r#ref: i64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetIssueRequest {
    #[schemars(description = "The ID of the issue to retrieve")]
    pub issue_id: i64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetIssueByRefRequest {
    #[schemars(description = "Project ID or slug the issue belongs to")]
    pub project: String,
    #[schemars(description = "The issue's reference number within the project")]
    pub r#ref: i64,
}

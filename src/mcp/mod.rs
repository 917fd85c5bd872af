//! MCP server exposing read-only Taiga tools.

mod types;

pub use types::*;

use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde_json::{Map, Value};

use crate::config::Config;
use crate::filters::{self, FilterError};
use crate::taiga::resolve::{self, ProjectRef};
use crate::taiga::{EntityKind, Session, TaigaClient, TaigaError};

#[derive(Clone)]
pub struct McpServer {
    client: TaigaClient,
    session: Session,
    default_project: Option<i64>,
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    pub fn new(client: TaigaClient, session: Session, default_project: Option<i64>) -> Self {
        Self {
            client,
            session,
            default_project,
            tool_router: Self::tool_router(),
        }
    }

    fn filter_error(err: FilterError) -> McpError {
        McpError::invalid_params(err.to_string(), None)
    }

    fn taiga_error(err: TaigaError) -> McpError {
        match err {
            TaigaError::NotFound { .. } => McpError::invalid_params(err.to_string(), None),
            TaigaError::Authentication(_) => McpError::invalid_request(err.to_string(), None),
            _ => McpError::internal_error(err.to_string(), None),
        }
    }

    fn json_result(value: &Value) -> Result<CallToolResult, McpError> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // ============================================================
    // Tool logic - public so integration tests exercise it directly
    // ============================================================

    /// Project record plus its user-story status categories.
    pub async fn project_info(&self, project: Option<&str>) -> Result<Value, McpError> {
        let project_ref = match project.map(str::trim).filter(|p| !p.is_empty()) {
            Some(raw) => ProjectRef::parse(raw),
            None => match self.default_project {
                Some(id) => ProjectRef::Id(id),
                None => {
                    return Err(McpError::invalid_params(
                        "no project specified and no default project configured",
                        None,
                    ))
                }
            },
        };

        let project = resolve::resolve_project(&self.client, &self.session, &project_ref)
            .await
            .map_err(Self::taiga_error)?;
        let project_id = project
            .get("id")
            .and_then(Value::as_i64)
            .ok_or_else(|| McpError::internal_error("project record without a numeric id", None))?;
        let statuses = self
            .client
            .list_user_story_statuses(&self.session, project_id)
            .await
            .map_err(Self::taiga_error)?;

        Ok(serde_json::json!({
            "project": project,
            "user_story_statuses": statuses,
        }))
    }

    /// Normalize caller filters for `kind` and list matching entities.
    pub async fn list_entities(
        &self,
        kind: EntityKind,
        raw: &Map<String, Value>,
    ) -> Result<Value, McpError> {
        let query =
            filters::normalize(kind, raw, self.default_project).map_err(Self::filter_error)?;
        self.client
            .list(&self.session, kind, &query)
            .await
            .map_err(Self::taiga_error)
    }

    /// Single entity by opaque ID, with its comment thread attached.
    pub async fn entity_with_comments(
        &self,
        kind: EntityKind,
        id: i64,
    ) -> Result<Value, McpError> {
        resolve::get_with_comments(&self.client, &self.session, kind, id)
            .await
            .map_err(Self::taiga_error)
    }

    /// Single entity by (project, ref), with its comment thread attached.
    pub async fn entity_by_ref_with_comments(
        &self,
        kind: EntityKind,
        project: &str,
        ref_num: i64,
    ) -> Result<Value, McpError> {
        let project_ref = ProjectRef::parse(project);
        resolve::get_by_ref_with_comments(&self.client, &self.session, kind, &project_ref, ref_num)
            .await
            .map_err(Self::taiga_error)
    }
}

#[tool_router]
impl McpServer {
    // ============================================================
    // Project Tools
    // ============================================================

    #[tool(
        description = "Retrieve a Taiga project with its user-story status categories. Accepts a numeric project ID or a slug; falls back to the configured default project when omitted. Returns: {project, user_story_statuses}."
    )]
    async fn get_project_info(
        &self,
        params: Parameters<GetProjectInfoRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let info = self.project_info(req.project.as_deref()).await?;
        Self::json_result(&info)
    }

    #[tool(
        description = "List Taiga projects. Optional filters: member (user ID), is_looking_for_people, is_featured, is_backlog_activated, is_kanban_activated (booleans). Unknown filters are ignored; a recognized filter with the wrong value type is an error."
    )]
    async fn list_projects(
        &self,
        params: Parameters<ListProjectsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let projects = self
            .list_entities(EntityKind::Project, &params.0.filters)
            .await?;
        Self::json_result(&projects)
    }

    // ============================================================
    // User Story Tools
    // ============================================================

    #[tool(
        description = "List user stories, filtered by project, milestone, status, epic, role, watchers, assigned_to, tags and their exclude_* counterparts. The configured default project applies when no project filter is given. Returns the matching user-story records."
    )]
    async fn list_user_stories(
        &self,
        params: Parameters<ListUserStoriesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let stories = self
            .list_entities(EntityKind::UserStory, &params.0.filters)
            .await?;
        Self::json_result(&stories)
    }

    #[tool(
        description = "Retrieve one user story by its ID, with its comment thread attached under 'comments'."
    )]
    async fn get_user_story(
        &self,
        params: Parameters<GetUserStoryRequest>,
    ) -> Result<CallToolResult, McpError> {
        let story = self
            .entity_with_comments(EntityKind::UserStory, params.0.user_story_id)
            .await?;
        Self::json_result(&story)
    }

    #[tool(
        description = "Retrieve one user story by its reference number (the '#42' shown in the Taiga UI) within a project. Requires the project ID or slug; reference numbers are only unique per project. Comments are attached under 'comments'."
    )]
    async fn get_user_story_by_ref(
        &self,
        params: Parameters<GetUserStoryByRefRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let story = self
            .entity_by_ref_with_comments(EntityKind::UserStory, &req.project, req.r#ref)
            .await?;
        Self::json_result(&story)
    }

    // ============================================================
    // Task Tools
    // ============================================================

    #[tool(
        description = "List tasks, filtered by project, milestone, status, user_story, role, owner, watchers, assigned_to, tags and their exclude_* counterparts. The configured default project applies when no project filter is given. Returns the matching task records."
    )]
    async fn list_tasks(
        &self,
        params: Parameters<ListTasksRequest>,
    ) -> Result<CallToolResult, McpError> {
        let tasks = self
            .list_entities(EntityKind::Task, &params.0.filters)
            .await?;
        Self::json_result(&tasks)
    }

    #[tool(
        description = "Retrieve one task by its ID, with its comment thread attached under 'comments'."
    )]
    async fn get_task(
        &self,
        params: Parameters<GetTaskRequest>,
    ) -> Result<CallToolResult, McpError> {
        let task = self
            .entity_with_comments(EntityKind::Task, params.0.task_id)
            .await?;
        Self::json_result(&task)
    }

    #[tool(
        description = "Retrieve one task by its reference number within a project. Requires the project ID or slug; reference numbers are only unique per project. Comments are attached under 'comments'."
    )]
    async fn get_task_by_ref(
        &self,
        params: Parameters<GetTaskByRefRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let task = self
            .entity_by_ref_with_comments(EntityKind::Task, &req.project, req.r#ref)
            .await?;
        Self::json_result(&task)
    }

    // ============================================================
    // Issue Tools
    // ============================================================

    #[tool(
        description = "List issues, filtered by project, milestone, status, severity, priority, type, role, owner, watchers, assigned_to, tags and their exclude_* counterparts. The configured default project applies when no project filter is given. Returns the matching issue records."
    )]
    async fn list_issues(
        &self,
        params: Parameters<ListIssuesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let issues = self
            .list_entities(EntityKind::Issue, &params.0.filters)
            .await?;
        Self::json_result(&issues)
    }

    #[tool(
        description = "Retrieve one issue by its ID, with its comment thread attached under 'comments'."
    )]
    async fn get_issue(
        &self,
        params: Parameters<GetIssueRequest>,
    ) -> Result<CallToolResult, McpError> {
        let issue = self
            .entity_with_comments(EntityKind::Issue, params.0.issue_id)
            .await?;
        Self::json_result(&issue)
    }

    #[tool(
        description = "Retrieve one issue by its reference number within a project. Requires the project ID or slug; reference numbers are only unique per project. Comments are attached under 'comments'."
    )]
    async fn get_issue_by_ref(
        &self,
        params: Parameters<GetIssueByRefRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let issue = self
            .entity_by_ref_with_comments(EntityKind::Issue, &req.project, req.r#ref)
            .await?;
        Self::json_result(&issue)
    }
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: rmcp::model::Implementation {
                name: "taiga-bridge".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            instructions: Some(
                r#"Read-only access to a Taiga project-management instance.

ENTITIES:
- Projects contain user stories, tasks, and issues.
- Every entity has an opaque numeric ID plus a reference number (the '#42'
  visible in the Taiga UI). Reference numbers are unique only within one
  project, so by-ref tools always require the project.

DISCOVERY:
1. list_projects (or get_project_info, which includes the project's
   user-story status categories) to find the project you need.
2. list_user_stories / list_tasks / list_issues with filters to narrow down.
3. get_* by ID, or get_*_by_ref with project + reference number, for full
   records including the comment thread.

FILTERS:
Pass filters as top-level arguments, e.g. {"project": 12, "status__is_closed":
false, "tags": "backend,urgent"}. Unknown filter names are ignored; a known
filter with the wrong value type is rejected. When TAIGA_DEFAULT_PROJECT is
configured, list tools scope to it unless you pass an explicit project.

Everything is read-only: nothing here creates, updates, or deletes Taiga
entities."#
                    .into(),
            ),
            ..Default::default()
        }
    }
}

/// Authenticate against Taiga and serve the MCP protocol over stdio.
pub async fn run_stdio_server(config: Config) -> anyhow::Result<()> {
    use tokio::io::{stdin, stdout};

    let client = TaigaClient::new(config.api_url.clone());
    let session = client
        .authenticate(&config.username, &config.password)
        .await?;

    match config.default_project {
        Some(project) => tracing::info!(project, "default project configured"),
        None => tracing::warn!("TAIGA_DEFAULT_PROJECT not set"),
    }

    tracing::info!("Starting MCP server via stdio");

    let service = McpServer::new(client, session, config.default_project);
    let server = service.serve((stdin(), stdout())).await?;

    let quit_reason = server.waiting().await?;
    tracing::info!("MCP server stopped: {:?}", quit_reason);

    Ok(())
}

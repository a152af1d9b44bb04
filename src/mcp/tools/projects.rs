//! Project tool implementations
//!
//! Handles the MCP tools for Neon project lifecycle operations.

use rmcp::{ErrorData as McpError, model::*, schemars, schemars::JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::{json_result, map_neon_error};
use crate::neon::NeonClient;
use crate::neon::models::ListProjectsQuery;

/// Maximum page size the API accepts for project listings.
pub const MAX_PROJECTS_LIMIT: u32 = 400;

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectsParams {
    #[schemars(
        description = "Cursor from a previous response's pagination object, to fetch the next page"
    )]
    pub cursor: Option<String>,
    #[schemars(description = "Maximum number of projects to return (default: 10, max: 400)")]
    pub limit: Option<u32>,
    #[schemars(description = "Search by project name or ID (optional, partial match)")]
    pub search: Option<String>,
    #[schemars(description = "Organization ID to list projects for (optional)")]
    pub org_id: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectParams {
    #[schemars(description = "Name of the project (optional, generated when omitted)")]
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectIdParams {
    #[schemars(description = "The ID of the project")]
    pub project_id: String,
}

/// Clamp the requested page size to what the API accepts.
pub fn apply_limit(limit: Option<u32>) -> u32 {
    limit.unwrap_or(10).clamp(1, MAX_PROJECTS_LIMIT)
}

/// List projects, returning the upstream items verbatim.
pub async fn list_projects(
    client: &NeonClient,
    params: ListProjectsParams,
) -> Result<CallToolResult, McpError> {
    let query = ListProjectsQuery {
        cursor: params.cursor,
        limit: Some(apply_limit(params.limit)),
        search: params.search,
        org_id: params.org_id,
    };

    let response = client.list_projects(&query).await.map_err(map_neon_error)?;

    json_result(&json!({
        "projects": response.projects,
        "pagination": response.pagination,
    }))
}

pub async fn create_project(
    client: &NeonClient,
    params: CreateProjectParams,
) -> Result<CallToolResult, McpError> {
    let created = client
        .create_project(params.name)
        .await
        .map_err(map_neon_error)?;

    info!(project_id = %created.project.id, "created project");

    let database_name = created.databases.first().map(|d| d.name.clone());
    let connection_uri = created
        .connection_uris
        .first()
        .map(|c| c.connection_uri.clone());

    json_result(&json!({
        "message": format!(
            "Project {} created with default branch {}",
            created.project.id, created.branch.id
        ),
        "project": {"id": created.project.id, "name": created.project.name},
        "branch": {"id": created.branch.id, "name": created.branch.name},
        "databaseName": database_name,
        "connectionUri": connection_uri,
    }))
}

pub async fn delete_project(
    client: &NeonClient,
    params: ProjectIdParams,
) -> Result<CallToolResult, McpError> {
    let deleted = client
        .delete_project(&params.project_id)
        .await
        .map_err(map_neon_error)?;

    info!(project_id = %deleted.project.id, "deleted project");

    json_result(&json!({
        "success": true,
        "message": format!(
            "Project {} ({}) deleted successfully",
            deleted.project.name, deleted.project.id
        ),
    }))
}

/// Project details together with its branches.
pub async fn describe_project(
    client: &NeonClient,
    params: ProjectIdParams,
) -> Result<CallToolResult, McpError> {
    let project = client
        .get_project(&params.project_id)
        .await
        .map_err(map_neon_error)?;
    let branches = client
        .list_branches(&params.project_id)
        .await
        .map_err(map_neon_error)?;

    json_result(&json!({
        "project": project.project,
        "branches": branches.branches,
    }))
}

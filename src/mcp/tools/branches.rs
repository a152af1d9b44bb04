//! Branch tool implementations

use rmcp::{ErrorData as McpError, model::*, schemars, schemars::JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::{json_result, map_neon_error};
use crate::neon::NeonClient;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBranchParams {
    #[schemars(description = "The ID of the project to create the branch in")]
    pub project_id: String,
    #[schemars(description = "Name of the branch (optional, generated when omitted)")]
    pub branch_name: Option<String>,
    #[schemars(
        description = "Parent branch ID (optional). Defaults to the project's default branch."
    )]
    pub parent_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BranchIdParams {
    #[schemars(description = "The ID of the project")]
    pub project_id: String,
    #[schemars(description = "The ID of the branch")]
    pub branch_id: String,
}

pub async fn create_branch(
    client: &NeonClient,
    params: CreateBranchParams,
) -> Result<CallToolResult, McpError> {
    let created = client
        .create_branch(&params.project_id, params.branch_name, params.parent_id)
        .await
        .map_err(map_neon_error)?;

    info!(
        project_id = %params.project_id,
        branch_id = %created.branch.id,
        "created branch"
    );

    json_result(&json!({
        "message": format!(
            "Branch {} ({}) created in project {}",
            created.branch.name, created.branch.id, params.project_id
        ),
        "branch": created.branch,
        "endpoints": created.endpoints,
    }))
}

pub async fn delete_branch(
    client: &NeonClient,
    params: BranchIdParams,
) -> Result<CallToolResult, McpError> {
    client
        .delete_branch(&params.project_id, &params.branch_id)
        .await
        .map_err(map_neon_error)?;

    info!(
        project_id = %params.project_id,
        branch_id = %params.branch_id,
        "deleted branch"
    );

    json_result(&json!({
        "success": true,
        "message": format!(
            "Branch {} deleted from project {}",
            params.branch_id, params.project_id
        ),
    }))
}

/// Branch details with the databases and roles that live on it.
pub async fn describe_branch(
    client: &NeonClient,
    params: BranchIdParams,
) -> Result<CallToolResult, McpError> {
    let branch = client
        .get_branch(&params.project_id, &params.branch_id)
        .await
        .map_err(map_neon_error)?;
    let databases = client
        .list_branch_databases(&params.project_id, &params.branch_id)
        .await
        .map_err(map_neon_error)?;
    let roles = client
        .list_branch_roles(&params.project_id, &params.branch_id)
        .await
        .map_err(map_neon_error)?;

    json_result(&json!({
        "branch": branch.branch,
        "databases": databases.databases,
        "roles": roles.roles,
    }))
}

//! Connection string tool and the branch/database defaults shared by the
//! SQL tools.

use rmcp::{ErrorData as McpError, model::*, schemars, schemars::JsonSchema};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{json_result, map_neon_error};
use crate::neon::NeonClient;
use crate::neon::models::ConnectionUriQuery;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetConnectionStringParams {
    #[schemars(description = "The ID of the project")]
    pub project_id: String,
    #[schemars(description = "Branch ID (optional). Defaults to the project's default branch.")]
    pub branch_id: Option<String>,
    #[schemars(description = "Compute endpoint ID (optional)")]
    pub compute_id: Option<String>,
    #[schemars(
        description = "Database name (optional). Defaults to the first database on the branch."
    )]
    pub database_name: Option<String>,
    #[schemars(description = "Role name (optional). Defaults to the database owner.")]
    pub role_name: Option<String>,
    #[schemars(description = "Use the connection pooler (optional, default: false)")]
    pub pooled: Option<bool>,
}

/// Fully resolved connection target.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionTarget {
    pub project_id: String,
    pub branch_id: String,
    pub database_name: String,
    pub role_name: String,
    pub uri: String,
}

/// Pick the branch to use: the given one, else the project's default branch.
pub async fn resolve_branch_id(
    client: &NeonClient,
    project_id: &str,
    branch_id: Option<String>,
) -> Result<String, McpError> {
    if let Some(id) = branch_id {
        return Ok(id);
    }

    let branches = client
        .list_branches(project_id)
        .await
        .map_err(map_neon_error)?
        .branches;

    branches
        .iter()
        .find(|b| b.default)
        .or_else(|| branches.first())
        .map(|b| b.id.clone())
        .ok_or_else(|| {
            McpError::invalid_params(format!("Project {project_id} has no branches"), None)
        })
}

/// Resolve database and role names on a branch.
///
/// A missing database defaults to the first one on the branch; a missing
/// role defaults to that database's owner.
pub async fn resolve_database(
    client: &NeonClient,
    project_id: &str,
    branch_id: &str,
    database_name: Option<String>,
    role_name: Option<String>,
) -> Result<(String, String), McpError> {
    if let (Some(db), Some(role)) = (&database_name, &role_name) {
        return Ok((db.clone(), role.clone()));
    }

    let databases = client
        .list_branch_databases(project_id, branch_id)
        .await
        .map_err(map_neon_error)?
        .databases;

    let database = match &database_name {
        Some(name) => databases.iter().find(|d| &d.name == name).ok_or_else(|| {
            McpError::invalid_params(
                format!("Database {name} not found on branch {branch_id}"),
                None,
            )
        })?,
        None => databases.first().ok_or_else(|| {
            McpError::invalid_params(format!("Branch {branch_id} has no databases"), None)
        })?,
    };

    let role = role_name.unwrap_or_else(|| database.owner_name.clone());
    Ok((database.name.clone(), role))
}

/// Resolve defaults and fetch a connection URI.
pub async fn resolve_connection(
    client: &NeonClient,
    project_id: &str,
    branch_id: Option<String>,
    database_name: Option<String>,
    role_name: Option<String>,
) -> Result<ConnectionTarget, McpError> {
    let branch_id = resolve_branch_id(client, project_id, branch_id).await?;
    let (database_name, role_name) =
        resolve_database(client, project_id, &branch_id, database_name, role_name).await?;

    let query = ConnectionUriQuery {
        branch_id: branch_id.clone(),
        database_name: database_name.clone(),
        role_name: role_name.clone(),
        endpoint_id: None,
        pooled: None,
    };
    let uri = client
        .get_connection_uri(project_id, &query)
        .await
        .map_err(map_neon_error)?
        .uri;

    debug!(project_id, %branch_id, %database_name, "resolved connection");

    Ok(ConnectionTarget {
        project_id: project_id.to_string(),
        branch_id,
        database_name,
        role_name,
        uri,
    })
}

pub async fn get_connection_string(
    client: &NeonClient,
    params: GetConnectionStringParams,
) -> Result<CallToolResult, McpError> {
    let branch_id = resolve_branch_id(client, &params.project_id, params.branch_id).await?;
    let (database_name, role_name) = resolve_database(
        client,
        &params.project_id,
        &branch_id,
        params.database_name,
        params.role_name,
    )
    .await?;

    let query = ConnectionUriQuery {
        branch_id: branch_id.clone(),
        database_name: database_name.clone(),
        role_name: role_name.clone(),
        endpoint_id: params.compute_id,
        pooled: params.pooled,
    };
    let uri = client
        .get_connection_uri(&params.project_id, &query)
        .await
        .map_err(map_neon_error)?
        .uri;

    json_result(&ConnectionTarget {
        project_id: params.project_id,
        branch_id,
        database_name,
        role_name,
        uri,
    })
}

//! Two-step schema migrations.
//!
//! `prepare_database_migration` applies the migration to a fresh temporary
//! branch so the caller can inspect the result. `complete_database_migration`
//! applies the same SQL to the parent branch and drops the temporary one.
//! Nothing is remembered in between: every value the second step needs is
//! returned by the first and passed back by the caller.

use chrono::Utc;
use rmcp::{ErrorData as McpError, model::*, schemars, schemars::JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, warn};

use super::connection::{resolve_branch_id, resolve_connection};
use super::{json_result, map_neon_error};
use crate::neon::NeonClient;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrepareMigrationParams {
    #[schemars(description = "The SQL to run as the migration (DDL)")]
    pub migration_sql: String,
    #[schemars(description = "The ID of the project")]
    pub project_id: String,
    #[schemars(description = "Database name (optional). Defaults to the first database.")]
    pub database_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompleteMigrationParams {
    #[schemars(description = "The migration SQL, as returned by prepare_database_migration")]
    pub migration_sql: String,
    #[schemars(description = "The ID of the project")]
    pub project_id: String,
    #[schemars(description = "Database name, as returned by prepare_database_migration")]
    pub database_name: String,
    #[schemars(description = "Temporary branch ID, as returned by prepare_database_migration")]
    pub temporary_branch_id: String,
    #[schemars(
        description = "Branch to apply the migration to (optional). Defaults to the project's default branch."
    )]
    pub parent_branch_id: Option<String>,
}

/// Name for a temporary migration branch created at the current time, to
/// the millisecond.
pub fn migration_branch_name() -> String {
    format!("migration_{}", Utc::now().format("%Y%m%d%H%M%S%3f"))
}

/// Attach the temporary branch id to an error so the caller can clean it up.
fn with_temporary_branch(mut err: McpError, branch_id: &str) -> McpError {
    match err.data.as_mut() {
        Some(Value::Object(data)) => {
            data.insert("temporaryBranchId".to_string(), json!(branch_id));
        }
        _ => err.data = Some(json!({"temporaryBranchId": branch_id})),
    }
    err
}

pub async fn prepare_database_migration(
    client: &NeonClient,
    params: PrepareMigrationParams,
) -> Result<CallToolResult, McpError> {
    let parent_branch_id = resolve_branch_id(client, &params.project_id, None).await?;

    let created = client
        .create_branch(
            &params.project_id,
            Some(migration_branch_name()),
            Some(parent_branch_id.clone()),
        )
        .await
        .map_err(map_neon_error)?;
    let temporary = created.branch;

    info!(
        project_id = %params.project_id,
        branch_id = %temporary.id,
        "created temporary migration branch"
    );

    let target = resolve_connection(
        client,
        &params.project_id,
        Some(temporary.id.clone()),
        params.database_name,
        None,
    )
    .await
    .map_err(|e| with_temporary_branch(e, &temporary.id))?;

    let result = client
        .run_sql(&target.uri, &params.migration_sql, &[])
        .await
        .map_err(|e| with_temporary_branch(map_neon_error(e), &temporary.id))?;

    json_result(&json!({
        "message": format!(
            "Migration applied to temporary branch {} ({}). Verify it, then call complete_database_migration with the values below to apply it to branch {}.",
            temporary.name, temporary.id, parent_branch_id
        ),
        "migration": {
            "projectId": params.project_id,
            "databaseName": target.database_name,
            "migrationSql": params.migration_sql,
            "temporaryBranchId": temporary.id,
            "temporaryBranchName": temporary.name,
            "parentBranchId": parent_branch_id,
        },
        "result": result,
    }))
}

pub async fn complete_database_migration(
    client: &NeonClient,
    params: CompleteMigrationParams,
) -> Result<CallToolResult, McpError> {
    let target = resolve_connection(
        client,
        &params.project_id,
        params.parent_branch_id,
        Some(params.database_name),
        None,
    )
    .await?;

    if target.branch_id == params.temporary_branch_id {
        return Err(McpError::invalid_params(
            "temporaryBranchId must differ from the branch the migration is applied to",
            None,
        ));
    }

    let result = client
        .run_sql(&target.uri, &params.migration_sql, &[])
        .await
        .map_err(map_neon_error)?;

    info!(
        project_id = %params.project_id,
        branch_id = %target.branch_id,
        "applied migration"
    );

    // The migration is already applied; a failed cleanup is reported, not raised.
    let cleanup = match client
        .delete_branch(&params.project_id, &params.temporary_branch_id)
        .await
    {
        Ok(_) => json!({"deleted": true, "branchId": params.temporary_branch_id}),
        Err(e) => {
            warn!(error = %e, branch_id = %params.temporary_branch_id, "failed to delete temporary branch");
            json!({"deleted": false, "branchId": params.temporary_branch_id, "error": e.to_string()})
        }
    };

    json_result(&json!({
        "message": format!(
            "Migration applied to branch {} of project {}",
            target.branch_id, params.project_id
        ),
        "branchId": target.branch_id,
        "databaseName": target.database_name,
        "result": result,
        "temporaryBranch": cleanup,
    }))
}

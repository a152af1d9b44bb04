//! SQL tool implementations
//!
//! Statements run over HTTP against the compute of the resolved branch.

use rmcp::{ErrorData as McpError, model::*, schemars, schemars::JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::connection::resolve_connection;
use super::{json_result, map_neon_error};
use crate::neon::NeonClient;

const LIST_TABLES_SQL: &str = "SELECT table_schema, table_name, table_type \
     FROM information_schema.tables \
     WHERE table_schema NOT IN ('pg_catalog', 'information_schema') \
     ORDER BY table_schema, table_name";

const DESCRIBE_TABLE_SQL: &str = "SELECT column_name, data_type, character_maximum_length, \
     is_nullable, column_default \
     FROM information_schema.columns \
     WHERE table_name = $1 AND table_schema = $2 \
     ORDER BY ordinal_position";

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunSqlParams {
    #[schemars(description = "The SQL statement to execute")]
    pub sql: String,
    #[schemars(description = "The ID of the project")]
    pub project_id: String,
    #[schemars(description = "Branch ID (optional). Defaults to the project's default branch.")]
    pub branch_id: Option<String>,
    #[schemars(description = "Database name (optional). Defaults to the first database.")]
    pub database_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunSqlTransactionParams {
    #[schemars(description = "The SQL statements to execute in one transaction, in order")]
    pub sql_statements: Vec<String>,
    #[schemars(description = "The ID of the project")]
    pub project_id: String,
    #[schemars(description = "Branch ID (optional). Defaults to the project's default branch.")]
    pub branch_id: Option<String>,
    #[schemars(description = "Database name (optional). Defaults to the first database.")]
    pub database_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseTarget {
    #[schemars(description = "The ID of the project")]
    pub project_id: String,
    #[schemars(description = "Branch ID (optional). Defaults to the project's default branch.")]
    pub branch_id: Option<String>,
    #[schemars(description = "Database name (optional). Defaults to the first database.")]
    pub database_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DescribeTableSchemaParams {
    #[schemars(description = "The table to describe")]
    pub table_name: String,
    #[schemars(description = "Schema containing the table (optional, default: public)")]
    pub schema_name: Option<String>,
    #[schemars(description = "The ID of the project")]
    pub project_id: String,
    #[schemars(description = "Branch ID (optional). Defaults to the project's default branch.")]
    pub branch_id: Option<String>,
    #[schemars(description = "Database name (optional). Defaults to the first database.")]
    pub database_name: Option<String>,
}

pub async fn run_sql(
    client: &NeonClient,
    params: RunSqlParams,
) -> Result<CallToolResult, McpError> {
    let target = resolve_connection(
        client,
        &params.project_id,
        params.branch_id,
        params.database_name,
        None,
    )
    .await?;

    info!(
        project_id = %target.project_id,
        branch_id = %target.branch_id,
        "running sql"
    );

    let result = client
        .run_sql(&target.uri, &params.sql, &[])
        .await
        .map_err(map_neon_error)?;

    json_result(&result)
}

pub async fn run_sql_transaction(
    client: &NeonClient,
    params: RunSqlTransactionParams,
) -> Result<CallToolResult, McpError> {
    if params.sql_statements.is_empty() {
        return Err(McpError::invalid_params(
            "sqlStatements must contain at least one statement",
            None,
        ));
    }

    let target = resolve_connection(
        client,
        &params.project_id,
        params.branch_id,
        params.database_name,
        None,
    )
    .await?;

    info!(
        project_id = %target.project_id,
        branch_id = %target.branch_id,
        statements = params.sql_statements.len(),
        "running sql transaction"
    );

    let results = client
        .run_sql_transaction(&target.uri, &params.sql_statements)
        .await
        .map_err(map_neon_error)?;

    json_result(&results)
}

pub async fn get_database_tables(
    client: &NeonClient,
    params: DatabaseTarget,
) -> Result<CallToolResult, McpError> {
    let target = resolve_connection(
        client,
        &params.project_id,
        params.branch_id,
        params.database_name,
        None,
    )
    .await?;

    let result = client
        .run_sql(&target.uri, LIST_TABLES_SQL, &[])
        .await
        .map_err(map_neon_error)?;

    json_result(&result["rows"])
}

pub async fn describe_table_schema(
    client: &NeonClient,
    params: DescribeTableSchemaParams,
) -> Result<CallToolResult, McpError> {
    let target = resolve_connection(
        client,
        &params.project_id,
        params.branch_id,
        params.database_name,
        None,
    )
    .await?;

    let schema = params.schema_name.unwrap_or_else(|| "public".to_string());
    let result = client
        .run_sql(
            &target.uri,
            DESCRIBE_TABLE_SQL,
            &[json!(params.table_name), json!(schema)],
        )
        .await
        .map_err(map_neon_error)?;

    json_result(&json!({
        "table": params.table_name,
        "schema": schema,
        "columns": result["rows"],
    }))
}

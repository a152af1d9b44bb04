//! MCP server implementation
//!
//! Registers the Neon tools on an rmcp tool router and serves the resource
//! catalog. The server holds only the shared API client and its router, so
//! cloning it per request is cheap.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    service::RequestContext,
    tool, tool_handler, tool_router,
};

use super::catalog::{CatalogError, NEON_TOOLS, verify_tool_catalog};
use super::resources;
use super::tools::branches::{self, BranchIdParams, CreateBranchParams};
use super::tools::connection::{self, GetConnectionStringParams};
use super::tools::migrations::{self, CompleteMigrationParams, PrepareMigrationParams};
use super::tools::projects::{self, CreateProjectParams, ListProjectsParams, ProjectIdParams};
use super::tools::sql::{
    self, DatabaseTarget, DescribeTableSchemaParams, RunSqlParams, RunSqlTransactionParams,
};
use crate::neon::NeonClient;

pub const SERVER_NAME: &str = "mcp-server-neon";

#[derive(Clone)]
pub struct NeonMcpServer {
    client: Arc<NeonClient>,
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for NeonMcpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NeonMcpServer")
            .field("api_host", &self.client.base_url())
            .field("tools", &self.tool_router.list_all().len())
            .finish()
    }
}

#[tool_router]
impl NeonMcpServer {
    /// Create a server without checking the catalog. Prefer [`Self::try_new`].
    pub fn new(client: Arc<NeonClient>) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    /// Create a server, failing if the tool catalog and the registered
    /// handlers disagree.
    pub fn try_new(client: Arc<NeonClient>) -> Result<Self, CatalogError> {
        let server = Self::new(client);
        server.verify_catalog()?;
        Ok(server)
    }

    pub fn verify_catalog(&self) -> Result<(), CatalogError> {
        let tools = self.tool_router.list_all();
        verify_tool_catalog(NEON_TOOLS, tools.iter().map(|t| t.name.as_ref()))
    }

    /// Names of the registered tools.
    pub fn tool_names(&self) -> Vec<String> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect()
    }

    #[tool(
        description = "List Neon projects in your account. Returns the projects and a pagination cursor. Default limit: 10."
    )]
    pub async fn list_projects(
        &self,
        Parameters(params): Parameters<ListProjectsParams>,
    ) -> Result<CallToolResult, McpError> {
        projects::list_projects(&self.client, params).await
    }

    #[tool(
        description = "Create a new Neon project. Returns the project ID, its default branch, database and connection string."
    )]
    pub async fn create_project(
        &self,
        Parameters(params): Parameters<CreateProjectParams>,
    ) -> Result<CallToolResult, McpError> {
        projects::create_project(&self.client, params).await
    }

    #[tool(description = "Delete a Neon project and all of its branches and data")]
    pub async fn delete_project(
        &self,
        Parameters(params): Parameters<ProjectIdParams>,
    ) -> Result<CallToolResult, McpError> {
        projects::delete_project(&self.client, params).await
    }

    #[tool(description = "Describe a Neon project, including its branches")]
    pub async fn describe_project(
        &self,
        Parameters(params): Parameters<ProjectIdParams>,
    ) -> Result<CallToolResult, McpError> {
        projects::describe_project(&self.client, params).await
    }

    #[tool(description = "Execute a single SQL statement against a Neon database")]
    pub async fn run_sql(
        &self,
        Parameters(params): Parameters<RunSqlParams>,
    ) -> Result<CallToolResult, McpError> {
        sql::run_sql(&self.client, params).await
    }

    #[tool(
        description = "Execute a list of SQL statements in a single transaction against a Neon database"
    )]
    pub async fn run_sql_transaction(
        &self,
        Parameters(params): Parameters<RunSqlTransactionParams>,
    ) -> Result<CallToolResult, McpError> {
        sql::run_sql_transaction(&self.client, params).await
    }

    #[tool(description = "Describe the columns of a table in a Neon database")]
    pub async fn describe_table_schema(
        &self,
        Parameters(params): Parameters<DescribeTableSchemaParams>,
    ) -> Result<CallToolResult, McpError> {
        sql::describe_table_schema(&self.client, params).await
    }

    #[tool(description = "List all user tables in a Neon database")]
    pub async fn get_database_tables(
        &self,
        Parameters(params): Parameters<DatabaseTarget>,
    ) -> Result<CallToolResult, McpError> {
        sql::get_database_tables(&self.client, params).await
    }

    #[tool(description = "Create a branch in a Neon project, with a read-write compute endpoint")]
    pub async fn create_branch(
        &self,
        Parameters(params): Parameters<CreateBranchParams>,
    ) -> Result<CallToolResult, McpError> {
        branches::create_branch(&self.client, params).await
    }

    #[tool(
        description = "Start a schema migration: creates a temporary branch and applies the migration SQL there. Returns the values complete_database_migration needs. Use for DDL (CREATE, ALTER, DROP), not for data changes."
    )]
    pub async fn prepare_database_migration(
        &self,
        Parameters(params): Parameters<PrepareMigrationParams>,
    ) -> Result<CallToolResult, McpError> {
        migrations::prepare_database_migration(&self.client, params).await
    }

    #[tool(
        description = "Finish a schema migration started with prepare_database_migration: applies it to the parent branch and deletes the temporary branch"
    )]
    pub async fn complete_database_migration(
        &self,
        Parameters(params): Parameters<CompleteMigrationParams>,
    ) -> Result<CallToolResult, McpError> {
        migrations::complete_database_migration(&self.client, params).await
    }

    #[tool(description = "Describe a branch, including its databases and roles")]
    pub async fn describe_branch(
        &self,
        Parameters(params): Parameters<BranchIdParams>,
    ) -> Result<CallToolResult, McpError> {
        branches::describe_branch(&self.client, params).await
    }

    #[tool(description = "Delete a branch from a Neon project")]
    pub async fn delete_branch(
        &self,
        Parameters(params): Parameters<BranchIdParams>,
    ) -> Result<CallToolResult, McpError> {
        branches::delete_branch(&self.client, params).await
    }

    #[tool(
        description = "Get a PostgreSQL connection string for a Neon database. Branch, database and role default to the project's default branch, its first database and that database's owner."
    )]
    pub async fn get_connection_string(
        &self,
        Parameters(params): Parameters<GetConnectionStringParams>,
    ) -> Result<CallToolResult, McpError> {
        connection::get_connection_string(&self.client, params).await
    }
}

#[tool_handler]
impl ServerHandler for NeonMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(
            ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
        )
        .with_server_info(Implementation::new(SERVER_NAME, crate::VERSION))
        .with_instructions(
            "Neon MCP Server - Manage Neon Postgres projects and branches, run SQL and perform schema migrations",
        )
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(resources::list_resources())
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        Ok(resources::list_resource_templates())
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        resources::read_resource(&self.client, &request.uri).await
    }
}

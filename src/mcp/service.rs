//! MCP Streamable HTTP service creation
//!
//! The service is stateless: every HTTP request gets its own transport and
//! its own clone of the server, and no session id is issued. Any `Host`
//! header is accepted, since the server is meant to be reached remotely.

use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use tokio_util::sync::CancellationToken;

use super::server::NeonMcpServer;

/// Create the MCP Streamable HTTP service
///
/// The returned service implements `tower::Service` and is meant to be
/// nested into an Axum router.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use axum::Router;
/// use tokio_util::sync::CancellationToken;
/// # use mcp_server_neon::mcp::{NeonMcpServer, create_mcp_service};
/// # use mcp_server_neon::neon::{NeonClient, NeonConfig};
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Arc::new(NeonClient::new(NeonConfig::new("napi_key"))?);
/// let server = NeonMcpServer::try_new(client)?;
///
/// let app: Router = Router::new()
///     .nest_service("/mcp", create_mcp_service(server, CancellationToken::new()));
/// # Ok(())
/// # }
/// ```
pub fn create_mcp_service(
    server: NeonMcpServer,
    cancellation_token: CancellationToken,
) -> StreamableHttpService<NeonMcpServer, LocalSessionManager> {
    // Returns io::Error to match rmcp's expected signature
    let service_factory = move || -> Result<NeonMcpServer, std::io::Error> { Ok(server.clone()) };

    let config = StreamableHttpServerConfig::default()
        .with_stateful_mode(false)
        .with_cancellation_token(cancellation_token)
        .disable_allowed_hosts();

    // The session manager is unused in stateless mode but required by the constructor.
    StreamableHttpService::new(
        service_factory,
        LocalSessionManager::default().into(),
        config,
    )
}

//! API route configuration.

use axum::Router;
use axum::routing::get;
use tokio_util::sync::CancellationToken;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::mcp::{NeonMcpServer, create_mcp_service};

/// Create the router: liveness routes plus the MCP endpoint.
///
/// Panics inside request handling become a generic 500 response. Once a
/// streamed response has started nothing more is sent.
pub fn create_router(server: NeonMcpServer, cancellation_token: CancellationToken) -> Router {
    let system_routes = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health));

    system_routes
        .nest_service("/mcp", create_mcp_service(server, cancellation_token))
        .layer(CatchPanicLayer::custom(handlers::handle_panic))
        .layer(TraceLayer::new_for_http())
}

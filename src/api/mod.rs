//! HTTP front door.
//!
//! Serves the MCP endpoint at `/mcp` for every HTTP method and an
//! unauthenticated liveness message at `/`.

mod handlers;
mod routes;


use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use miette::Diagnostic;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::mcp::NeonMcpServer;

pub use routes::create_router;

/// Default port when neither `--port` nor `PORT` is given.
pub const DEFAULT_PORT: u16 = 3000;

/// API server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Host address to bind to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Error, Diagnostic, Debug)]
pub enum ServerError {
    #[error("Failed to bind {addr}")]
    #[diagnostic(
        code(neon_mcp::api::bind),
        help("Is another process listening on this port? Set PORT or --port to use a different one.")
    )]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP server error")]
    #[diagnostic(code(neon_mcp::api::serve))]
    Serve {
        #[source]
        source: std::io::Error,
    },
}

/// Initialize tracing subscriber with env filter
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mcp_server_neon=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Run the HTTP server until Ctrl-C.
pub async fn run(config: Config, server: NeonMcpServer) -> Result<(), ServerError> {
    let cancellation_token = CancellationToken::new();
    let app = create_router(server, cancellation_token.clone());

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    info!("MCP Server Neon listening at http://{}", addr);
    info!("MCP requests should be sent to http://{}/mcp", addr);

    let shutdown = cancellation_token.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for shutdown signal");
            }
            info!("shutting down");
            shutdown.cancel();
        })
        .await
        .map_err(|source| ServerError::Serve { source })
}

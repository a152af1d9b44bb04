//! Model Context Protocol (MCP) server implementation
//!
//! This module exposes the Neon management API over the Streamable HTTP
//! transport.
//!
//! - **catalog**: the ordered list of tool names, checked against the
//!   registered handlers at startup
//! - **tools**: parameter types and handlers, one module per API area
//! - **resources**: the resource catalog and its readers
//! - **server**: the rmcp `ServerHandler` tying tools and resources together
//! - **service**: the stateless HTTP service wrapping the server

pub mod catalog;
pub mod resources;
pub mod server;
mod service;
pub mod tools;

#[cfg(test)]
mod service_test;

pub use catalog::{CatalogError, NEON_TOOLS};
pub use server::NeonMcpServer;
pub use service::create_mcp_service;

//! MCP tool implementations
//!
//! Each module holds the parameter types and handler functions for one area
//! of the Neon API. Handlers take the shared [`crate::neon::NeonClient`] and perform one
//! conceptual operation; the server's tool router delegates to them.

pub mod branches;
pub mod connection;
pub mod migrations;
pub mod projects;
pub mod sql;


use rmcp::{ErrorData as McpError, model::*};
use serde::Serialize;
use serde_json::json;

use crate::neon::NeonError;

/// Map an upstream error onto the MCP error channel.
///
/// The upstream status and body travel in the error data.
pub fn map_neon_error(e: NeonError) -> McpError {
    let data = Some(json!({
        "status": e.status(),
        "error": e.to_string(),
    }));
    match &e {
        NeonError::Api { status: 404, .. } => McpError::resource_not_found(e.to_string(), data),
        NeonError::Api { status, .. } if (400..500).contains(status) => {
            McpError::invalid_params(e.to_string(), data)
        }
        NeonError::InvalidConnectionUri { .. } => McpError::invalid_params(e.to_string(), data),
        _ => McpError::internal_error(e.to_string(), data),
    }
}

/// Serialize a value as pretty JSON text content.
pub fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let content = serde_json::to_string_pretty(value).map_err(|e| {
        McpError::internal_error(
            "serialization_error",
            Some(json!({"error": e.to_string()})),
        )
    })?;

    Ok(CallToolResult::success(vec![Content::text(content)]))
}

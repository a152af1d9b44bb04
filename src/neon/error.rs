//! Neon API error types.
//!
//! Upstream failures are kept close to what the API returned (status code and
//! body) so tool handlers can pass them through to the MCP caller.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum NeonError {
    #[error("Failed to reach the Neon API")]
    #[diagnostic(
        code(neon_mcp::neon::request_failed),
        help("Check network connectivity, or set NEON_API_HOST if you use a non-default API endpoint.")
    )]
    Request {
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to build HTTP client")]
    #[diagnostic(code(neon_mcp::neon::client_build))]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("Neon API error ({status}): {message}")]
    #[diagnostic(code(neon_mcp::neon::api_error))]
    Api { status: u16, message: String },

    #[error("Invalid response from Neon API: {message}")]
    #[diagnostic(
        code(neon_mcp::neon::invalid_response),
        help("The API returned data in an unexpected format. This might indicate an API version mismatch.")
    )]
    InvalidResponse { message: String },

    #[error("Invalid connection URI: {message}")]
    #[diagnostic(code(neon_mcp::neon::invalid_connection_uri))]
    InvalidConnectionUri { message: String },
}

impl NeonError {
    /// HTTP status returned by the API, if the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            NeonError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for NeonError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            NeonError::InvalidResponse {
                message: e.to_string(),
            }
        } else {
            NeonError::Request { source: e }
        }
    }
}

impl From<serde_json::Error> for NeonError {
    fn from(e: serde_json::Error) -> Self {
        NeonError::InvalidResponse {
            message: e.to_string(),
        }
    }
}

pub type NeonResult<T> = Result<T, NeonError>;

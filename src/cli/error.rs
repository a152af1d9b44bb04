use miette::Diagnostic;
use thiserror::Error;

use crate::api::ServerError;
use crate::mcp::CatalogError;
use crate::neon::NeonError;

use super::init::InitError;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error("Neon API key is required for the \"{command}\" command")]
    #[diagnostic(
        code(neon_mcp::cli::missing_api_key),
        help("Provide it via --neon-api-key or the NEON_API_KEY environment variable.")
    )]
    MissingApiKey { command: &'static str },

    #[error("Init failed: {0}")]
    #[diagnostic(code(neon_mcp::cli::init))]
    Init(#[from] InitError),

    #[error("Neon client error: {0}")]
    #[diagnostic(code(neon_mcp::cli::neon))]
    Neon(#[from] NeonError),

    #[error("Tool catalog error: {0}")]
    #[diagnostic(code(neon_mcp::cli::catalog))]
    Catalog(#[from] CatalogError),

    #[error("Server error: {0}")]
    #[diagnostic(code(neon_mcp::cli::server))]
    Server(#[from] ServerError),
}

pub type CliResult<T> = Result<T, CliError>;

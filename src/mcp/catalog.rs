//! Tool catalog and its startup consistency check.

use miette::Diagnostic;
use std::collections::HashSet;
use thiserror::Error;

/// Every tool the server exposes, in listing order.
pub const NEON_TOOLS: &[&str] = &[
    "list_projects",
    "create_project",
    "delete_project",
    "describe_project",
    "run_sql",
    "run_sql_transaction",
    "describe_table_schema",
    "get_database_tables",
    "create_branch",
    "prepare_database_migration",
    "complete_database_migration",
    "describe_branch",
    "delete_branch",
    "get_connection_string",
];

#[derive(Error, Diagnostic, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Handler for tool {name} not found")]
    #[diagnostic(code(neon_mcp::catalog::missing_handler))]
    MissingHandler { name: String },

    #[error("Tool {name} has a handler but is not listed in the catalog")]
    #[diagnostic(code(neon_mcp::catalog::unlisted_tool))]
    Unlisted { name: String },

    #[error("Tool {name} is listed more than once")]
    #[diagnostic(code(neon_mcp::catalog::duplicate_tool))]
    Duplicate { name: String },
}

/// Check that the catalog and the registered handlers match one-to-one.
pub fn verify_tool_catalog<'a>(
    catalog: &[&str],
    registered: impl IntoIterator<Item = &'a str>,
) -> Result<(), CatalogError> {
    let mut listed = HashSet::new();
    for name in catalog {
        if !listed.insert(*name) {
            return Err(CatalogError::Duplicate {
                name: name.to_string(),
            });
        }
    }

    let registered: HashSet<&str> = registered.into_iter().collect();

    if let Some(name) = catalog.iter().find(|name| !registered.contains(**name)) {
        return Err(CatalogError::MissingHandler {
            name: name.to_string(),
        });
    }

    let mut unlisted: Vec<&str> = registered.difference(&listed).copied().collect();
    unlisted.sort_unstable();
    if let Some(name) = unlisted.first() {
        return Err(CatalogError::Unlisted {
            name: name.to_string(),
        });
    }

    Ok(())
}

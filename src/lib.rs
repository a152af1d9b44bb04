pub mod api;
pub mod cli;
pub mod mcp;
pub mod neon;

#[cfg(test)]
mod test_support;

/// Crate version, reported in server info and the root endpoint.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

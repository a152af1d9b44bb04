//! Neon management API client.
//!
//! A thin typed wrapper over the Neon API v2 and the SQL-over-HTTP endpoint of
//! branch computes. It adds no retry or caching; errors carry the upstream
//! status and body unchanged.

mod client;
mod error;
pub mod models;
mod sql;


pub use client::{DEFAULT_API_HOST, NeonClient, NeonConfig, install_crypto_provider};
pub use error::{NeonError, NeonResult};
pub use sql::sql_endpoint;

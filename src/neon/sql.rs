//! SQL over HTTP against a branch's compute endpoint.
//!
//! Neon computes accept queries at `https://<endpoint-host>/sql`, with the
//! Postgres connection string carried in the `Neon-Connection-String`
//! header. Loopback hosts are addressed over plain HTTP on the URI's port,
//! which is how a local proxy is reached.

use std::net::IpAddr;

use reqwest::Url;
use serde::Serialize;
use serde_json::Value;

use super::client::NeonClient;
use super::error::{NeonError, NeonResult};

const CONNECTION_STRING_HEADER: &str = "Neon-Connection-String";
const RAW_TEXT_OUTPUT_HEADER: &str = "Neon-Raw-Text-Output";
const ARRAY_MODE_HEADER: &str = "Neon-Array-Mode";

#[derive(Debug, Serialize)]
struct SqlQuery<'a> {
    query: &'a str,
    params: &'a [Value],
}

#[derive(Debug, Serialize)]
struct SqlBatch<'a> {
    queries: Vec<SqlQuery<'a>>,
}

/// Derive the SQL-over-HTTP URL for a Postgres connection URI.
pub fn sql_endpoint(connection_uri: &str) -> NeonResult<Url> {
    let uri = Url::parse(connection_uri).map_err(|e| NeonError::InvalidConnectionUri {
        message: e.to_string(),
    })?;

    let host = uri
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| NeonError::InvalidConnectionUri {
            message: "connection URI has no host".to_string(),
        })?;

    let endpoint = if is_loopback(host) {
        match uri.port() {
            Some(port) => format!("http://{host}:{port}/sql"),
            None => format!("http://{host}/sql"),
        }
    } else {
        format!("https://{host}/sql")
    };

    Url::parse(&endpoint).map_err(|e| NeonError::InvalidConnectionUri {
        message: e.to_string(),
    })
}

fn is_loopback(host: &str) -> bool {
    if host == "localhost" {
        return true;
    }
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<IpAddr>()
        .map(|ip| ip.is_loopback())
        .unwrap_or(false)
}

impl NeonClient {
    /// Run one statement. Returns the endpoint's JSON result (`command`,
    /// `rowCount`, `rows`, `fields`) unchanged.
    pub async fn run_sql(
        &self,
        connection_uri: &str,
        sql: &str,
        params: &[Value],
    ) -> NeonResult<Value> {
        let body = SqlQuery { query: sql, params };
        self.post_sql(connection_uri, &body).await
    }

    /// Run statements in order inside a single transaction. Returns one
    /// result per statement.
    pub async fn run_sql_transaction(
        &self,
        connection_uri: &str,
        statements: &[String],
    ) -> NeonResult<Vec<Value>> {
        let body = SqlBatch {
            queries: statements
                .iter()
                .map(|s| SqlQuery {
                    query: s,
                    params: &[],
                })
                .collect(),
        };

        let mut response = self.post_sql(connection_uri, &body).await?;
        match response.get_mut("results").map(Value::take) {
            Some(Value::Array(results)) => Ok(results),
            _ => Err(NeonError::InvalidResponse {
                message: "transaction response has no results array".to_string(),
            }),
        }
    }

    async fn post_sql<B: Serialize>(&self, connection_uri: &str, body: &B) -> NeonResult<Value> {
        let endpoint = sql_endpoint(connection_uri)?;
        let response = self
            .http()
            .post(endpoint)
            .header(CONNECTION_STRING_HEADER, connection_uri)
            .header(RAW_TEXT_OUTPUT_HEADER, "true")
            .header(ARRAY_MODE_HEADER, "false")
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }
}

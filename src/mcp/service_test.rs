//! Tests for the stateless MCP Streamable HTTP service
//!
//! Requests are JSON-RPC messages posted to `/mcp`; responses may come back
//! as plain JSON or as a server-sent event stream, so both are accepted.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use crate::mcp::{NeonMcpServer, create_mcp_service};
use crate::test_support::FakeNeon;

fn test_app(fake: &FakeNeon) -> Router {
    let server = NeonMcpServer::try_new(fake.client()).unwrap();
    Router::new().nest_service("/mcp", create_mcp_service(server, CancellationToken::new()))
}

fn rpc_request(body: Value) -> Request<Body> {
    rpc_request_for_host("localhost", body)
}

fn rpc_request_for_host(host: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("host", host)
        .header(CONTENT_TYPE, "application/json")
        .header("accept", "application/json, text/event-stream")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

/// Extract the JSON-RPC response carrying `id` from a JSON or SSE body.
async fn rpc_response(response: axum::response::Response, id: i64) -> Value {
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    if let Ok(value) = serde_json::from_str::<Value>(&text) {
        return value;
    }

    text.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .filter_map(|data| serde_json::from_str::<Value>(data.trim()).ok())
        .find(|message| message["id"] == id)
        .unwrap_or_else(|| panic!("No JSON-RPC response with id {id} in: {text}"))
}

fn tool_call(id: i64, name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments}
    })
}

fn result_json(message: &Value) -> Value {
    let text = message["result"]["content"][0]["text"]
        .as_str()
        .unwrap_or_else(|| panic!("Expected text content in {message}"));
    serde_json::from_str(text).unwrap()
}

#[tokio::test]
async fn test_list_projects_over_http() {
    let fake = FakeNeon::start().await;
    let app = test_app(&fake);

    let response = app
        .oneshot(rpc_request(tool_call(1, "list_projects", json!({}))))
        .await
        .unwrap();
    let message = rpc_response(response, 1).await;

    let body = result_json(&message);
    assert_eq!(body["projects"][0]["id"], "proj-alpha");
    assert_eq!(body["projects"][1]["id"], "proj-beta");
}

#[tokio::test]
async fn test_no_session_id_issued() {
    let fake = FakeNeon::start().await;
    let app = test_app(&fake);

    let response = app
        .oneshot(rpc_request(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2025-03-26",
                "capabilities": {},
                "clientInfo": {"name": "test", "version": "0.0.0"}
            }
        })))
        .await
        .unwrap();

    assert!(response.headers().get("mcp-session-id").is_none());
    let message = rpc_response(response, 1).await;
    assert_eq!(message["result"]["serverInfo"]["name"], "mcp-server-neon");
    assert!(message["result"]["capabilities"]["resources"].is_object());
}

#[tokio::test]
async fn test_tools_list_matches_catalog() {
    let fake = FakeNeon::start().await;
    let app = test_app(&fake);

    let response = app
        .oneshot(rpc_request(json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "tools/list",
            "params": {}
        })))
        .await
        .unwrap();
    let message = rpc_response(response, 4).await;

    let tools = message["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), crate::mcp::NEON_TOOLS.len());
    let run_sql = tools.iter().find(|t| t["name"] == "run_sql").unwrap();
    let required = run_sql["inputSchema"]["required"].as_array().unwrap();
    assert!(required.contains(&json!("sql")));
    assert!(required.contains(&json!("projectId")));
}

#[tokio::test]
async fn test_unknown_tool_is_protocol_error() {
    let fake = FakeNeon::start().await;
    let app = test_app(&fake);

    let response = app
        .oneshot(rpc_request(tool_call(2, "drop_everything", json!({}))))
        .await
        .unwrap();
    let message = rpc_response(response, 2).await;

    assert!(message["error"].is_object(), "Expected error in {message}");
    assert!(message.get("result").is_none());
    assert_eq!(fake.hits(), 0);
}

#[tokio::test]
async fn test_schema_violation_rejected_before_handler() {
    let fake = FakeNeon::start().await;
    let app = test_app(&fake);

    // projectId is required and sql must be a string.
    let response = app
        .oneshot(rpc_request(tool_call(3, "run_sql", json!({"sql": 42}))))
        .await
        .unwrap();
    let message = rpc_response(response, 3).await;

    // Reported either as a JSON-RPC error or as a tool error result.
    let rejected =
        message["error"].is_object() || message["result"]["isError"] == json!(true);
    assert!(rejected, "Expected rejection in {message}");
    assert_eq!(fake.hits(), 0);
}

#[tokio::test]
async fn test_remote_host_header_accepted() {
    let fake = FakeNeon::start().await;
    let app = test_app(&fake);

    let response = app
        .oneshot(rpc_request_for_host(
            "mcp-neon.onrender.com",
            tool_call(6, "list_projects", json!({})),
        ))
        .await
        .unwrap();
    let message = rpc_response(response, 6).await;

    assert_eq!(result_json(&message)["projects"][0]["id"], "proj-alpha");
}

#[tokio::test]
async fn test_upstream_failure_surfaces_as_mcp_error() {
    let fake = FakeNeon::start().await;
    let app = test_app(&fake);

    let response = app
        .oneshot(rpc_request(tool_call(
            5,
            "describe_project",
            json!({"projectId": "missing"}),
        )))
        .await
        .unwrap();
    let message = rpc_response(response, 5).await;

    assert!(message["error"]["message"]
        .as_str()
        .unwrap()
        .contains("project not found"));
}

#[tokio::test]
async fn test_concurrent_requests_do_not_interfere() {
    let fake = FakeNeon::start().await;
    let app = test_app(&fake);

    let projects = app
        .clone()
        .oneshot(rpc_request(tool_call(10, "list_projects", json!({}))));
    let branch = app.clone().oneshot(rpc_request(tool_call(
        11,
        "describe_branch",
        json!({"projectId": "proj-alpha", "branchId": "br-dev"}),
    )));

    let (projects, branch) = futures_util::future::join(projects, branch).await;
    let projects = rpc_response(projects.unwrap(), 10).await;
    let branch = rpc_response(branch.unwrap(), 11).await;

    assert_eq!(projects["id"], 10);
    assert!(result_json(&projects)["projects"].is_array());
    assert!(result_json(&projects).get("branch").is_none());

    assert_eq!(branch["id"], 11);
    assert_eq!(result_json(&branch)["branch"]["id"], "br-dev");
    assert!(result_json(&branch).get("projects").is_none());
}

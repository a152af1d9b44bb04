//! Request and response shapes for the Neon API v2.
//!
//! Only the fields the server reads are typed; everything else is kept in
//! `extra` so responses can be handed back to callers without loss.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub default: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    pub name: String,
    #[serde(default)]
    pub owner_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionDetails {
    pub connection_uri: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Query string for `GET /projects`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListProjectsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
}

/// Query string for `GET /projects/{id}/connection_uri`.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionUriQuery {
    pub branch_id: String,
    pub database_name: String,
    pub role_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pooled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectsResponse {
    pub projects: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub project: Project,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectResponse {
    pub project: Project,
    pub branch: Branch,
    #[serde(default)]
    pub connection_uris: Vec<ConnectionDetails>,
    #[serde(default)]
    pub databases: Vec<Database>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub endpoints: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchesResponse {
    pub branches: Vec<Branch>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchResponse {
    pub branch: Branch,
    #[serde(default)]
    pub endpoints: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabasesResponse {
    pub databases: Vec<Database>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolesResponse {
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionUriResponse {
    pub uri: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateProjectRequest {
    pub project: ProjectSettings,
}

#[derive(Debug, Default, Serialize)]
pub(crate) struct ProjectSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateBranchRequest {
    pub branch: BranchSettings,
    pub endpoints: Vec<EndpointSettings>,
}

#[derive(Debug, Default, Serialize)]
pub(crate) struct BranchSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EndpointSettings {
    #[serde(rename = "type")]
    pub endpoint_type: String,
}

impl EndpointSettings {
    pub fn read_write() -> Self {
        Self {
            endpoint_type: "read_write".to_string(),
        }
    }
}

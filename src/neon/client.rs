use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::{NeonError, NeonResult};
use super::models::{
    BranchResponse, BranchSettings, BranchesResponse, ConnectionUriQuery, ConnectionUriResponse,
    CreateBranchRequest, CreateProjectRequest, CreateProjectResponse, DatabasesResponse,
    EndpointSettings, ListProjectsQuery, ProjectResponse, ProjectSettings, ProjectsResponse,
    RolesResponse,
};

/// Default Neon API v2 base URL.
pub const DEFAULT_API_HOST: &str = "https://console.neon.tech/api/v2";

/// Settings used to build a [`NeonClient`].
#[derive(Clone)]
pub struct NeonConfig {
    pub api_key: String,
    pub api_host: String,
    pub user_agent: String,
}

impl NeonConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_host: DEFAULT_API_HOST.to_string(),
            user_agent: format!("mcp-server-neon/{}", crate::VERSION),
        }
    }

    pub fn with_api_host(mut self, api_host: impl Into<String>) -> Self {
        self.api_host = api_host.into();
        self
    }
}

/// Install the ring crypto provider for rustls.
///
/// reqwest is built without a default provider, so this must run before the
/// first client is constructed. Repeated calls are harmless.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Client for the Neon management API.
///
/// Built once at startup and shared by every tool and resource handler. It
/// holds no mutable state.
pub struct NeonClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl NeonClient {
    pub fn new(config: NeonConfig) -> NeonResult<Self> {
        install_crypto_provider();

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(config.user_agent)
            .default_headers(headers)
            .build()
            .map_err(|source| NeonError::ClientBuild { source })?;

        Ok(Self {
            base_url: config.api_host.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            client,
        })
    }

    /// Get the base URL being used
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Underlying HTTP client, without API credentials attached.
    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "neon api request");
        self.client.request(method, &url).bearer_auth(&self.api_key)
    }

    /// Decode a successful response, or turn the status and body into
    /// [`NeonError::Api`].
    pub(crate) async fn handle_response<T: DeserializeOwned>(response: Response) -> NeonResult<T> {
        if response.status().is_success() {
            response.json().await.map_err(|e| NeonError::InvalidResponse {
                message: e.to_string(),
            })
        } else {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(NeonError::Api { status, message })
        }
    }

    /// Fetch a public document as text. No API credentials are sent.
    pub async fn fetch_text(&self, url: &str) -> NeonResult<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(NeonError::Api {
                status: status.as_u16(),
                message: body,
            })
        }
    }

    pub async fn list_projects(&self, query: &ListProjectsQuery) -> NeonResult<ProjectsResponse> {
        let response = self
            .request(Method::GET, "/projects")
            .query(query)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    pub async fn create_project(&self, name: Option<String>) -> NeonResult<CreateProjectResponse> {
        let body = CreateProjectRequest {
            project: ProjectSettings { name },
        };
        let response = self
            .request(Method::POST, "/projects")
            .json(&body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    pub async fn get_project(&self, project_id: &str) -> NeonResult<ProjectResponse> {
        let response = self
            .request(Method::GET, &format!("/projects/{project_id}"))
            .send()
            .await?;
        Self::handle_response(response).await
    }

    pub async fn delete_project(&self, project_id: &str) -> NeonResult<ProjectResponse> {
        let response = self
            .request(Method::DELETE, &format!("/projects/{project_id}"))
            .send()
            .await?;
        Self::handle_response(response).await
    }

    pub async fn list_branches(&self, project_id: &str) -> NeonResult<BranchesResponse> {
        let response = self
            .request(Method::GET, &format!("/projects/{project_id}/branches"))
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Create a branch with a single read-write compute endpoint.
    ///
    /// Without `parent_id` the API branches from the project's default branch.
    pub async fn create_branch(
        &self,
        project_id: &str,
        name: Option<String>,
        parent_id: Option<String>,
    ) -> NeonResult<BranchResponse> {
        let body = CreateBranchRequest {
            branch: BranchSettings { name, parent_id },
            endpoints: vec![EndpointSettings::read_write()],
        };
        let response = self
            .request(Method::POST, &format!("/projects/{project_id}/branches"))
            .json(&body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    pub async fn get_branch(&self, project_id: &str, branch_id: &str) -> NeonResult<BranchResponse> {
        let response = self
            .request(
                Method::GET,
                &format!("/projects/{project_id}/branches/{branch_id}"),
            )
            .send()
            .await?;
        Self::handle_response(response).await
    }

    pub async fn delete_branch(
        &self,
        project_id: &str,
        branch_id: &str,
    ) -> NeonResult<BranchResponse> {
        let response = self
            .request(
                Method::DELETE,
                &format!("/projects/{project_id}/branches/{branch_id}"),
            )
            .send()
            .await?;
        Self::handle_response(response).await
    }

    pub async fn list_branch_databases(
        &self,
        project_id: &str,
        branch_id: &str,
    ) -> NeonResult<DatabasesResponse> {
        let response = self
            .request(
                Method::GET,
                &format!("/projects/{project_id}/branches/{branch_id}/databases"),
            )
            .send()
            .await?;
        Self::handle_response(response).await
    }

    pub async fn list_branch_roles(
        &self,
        project_id: &str,
        branch_id: &str,
    ) -> NeonResult<RolesResponse> {
        let response = self
            .request(
                Method::GET,
                &format!("/projects/{project_id}/branches/{branch_id}/roles"),
            )
            .send()
            .await?;
        Self::handle_response(response).await
    }

    pub async fn get_connection_uri(
        &self,
        project_id: &str,
        query: &ConnectionUriQuery,
    ) -> NeonResult<ConnectionUriResponse> {
        let response = self
            .request(
                Method::GET,
                &format!("/projects/{project_id}/connection_uri"),
            )
            .query(query)
            .send()
            .await?;
        Self::handle_response(response).await
    }
}

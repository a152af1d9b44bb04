//! Resource catalog
//!
//! Static documents with usage rules for Neon features, fetched from GitHub
//! on read, and a templated resource exposing a project's current state.

use rmcp::{ErrorData as McpError, model::*};
use tracing::debug;

use super::tools::map_neon_error;
use crate::neon::NeonClient;

pub const PROJECT_URI_PREFIX: &str = "neon://projects/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// A document fetched over HTTP on every read.
    RemoteDocument,
    /// Project details, addressed by `neon://projects/{project_id}`.
    Project,
}

#[derive(Debug, Clone, Copy)]
pub struct ResourceDescriptor {
    pub name: &'static str,
    pub uri: &'static str,
    pub description: &'static str,
    pub mime_type: &'static str,
    pub kind: ResourceKind,
}

impl ResourceDescriptor {
    pub fn is_template(&self) -> bool {
        self.uri.contains('{')
    }

    fn to_resource(self) -> Resource {
        let mut raw = RawResource::new(self.uri, self.name);
        raw.description = Some(self.description.to_string());
        raw.mime_type = Some(self.mime_type.to_string());
        raw.no_annotation()
    }

    fn to_template(self) -> ResourceTemplate {
        RawResourceTemplate {
            uri_template: self.uri.to_string(),
            name: self.name.to_string(),
            title: None,
            description: Some(self.description.to_string()),
            mime_type: Some(self.mime_type.to_string()),
            icons: None,
        }
        .no_annotation()
    }
}

pub const NEON_RESOURCES: &[ResourceDescriptor] = &[
    ResourceDescriptor {
        name: "neon-auth",
        uri: "https://github.com/neondatabase-labs/ai-rules/blob/main/neon-auth.mdc",
        description: "Neon Auth usage instructions",
        mime_type: "text/plain",
        kind: ResourceKind::RemoteDocument,
    },
    ResourceDescriptor {
        name: "neon-serverless",
        uri: "https://github.com/neondatabase-labs/ai-rules/blob/main/neon-serverless.mdc",
        description: "Neon Serverless driver usage instructions",
        mime_type: "text/plain",
        kind: ResourceKind::RemoteDocument,
    },
    ResourceDescriptor {
        name: "neon-drizzle",
        uri: "https://github.com/neondatabase-labs/ai-rules/blob/main/neon-drizzle.mdc",
        description: "Neon Drizzle ORM usage instructions",
        mime_type: "text/plain",
        kind: ResourceKind::RemoteDocument,
    },
    ResourceDescriptor {
        name: "neon-project",
        uri: "neon://projects/{project_id}",
        description: "Current details of a Neon project",
        mime_type: "application/json",
        kind: ResourceKind::Project,
    },
];

pub fn list_resources() -> ListResourcesResult {
    ListResourcesResult::with_all_items(
        NEON_RESOURCES
            .iter()
            .filter(|d| !d.is_template())
            .map(|d| d.to_resource())
            .collect(),
    )
}

pub fn list_resource_templates() -> ListResourceTemplatesResult {
    ListResourceTemplatesResult::with_all_items(
        NEON_RESOURCES
            .iter()
            .filter(|d| d.is_template())
            .map(|d| d.to_template())
            .collect(),
    )
}

/// Rewrite a GitHub `blob` page URL to its raw content URL.
pub fn raw_github_url(uri: &str) -> String {
    match uri.strip_prefix("https://github.com/") {
        Some(rest) => format!(
            "https://raw.githubusercontent.com/{}",
            rest.replacen("/blob/", "/", 1)
        ),
        None => uri.to_string(),
    }
}

/// Extract the project id from a `neon://projects/{project_id}` URI.
pub fn match_project_uri(uri: &str) -> Option<&str> {
    uri.strip_prefix(PROJECT_URI_PREFIX)
        .filter(|id| !id.is_empty() && !id.contains('/'))
}

/// Find the catalog entry that serves a concrete URI.
pub fn find_resource(uri: &str) -> Option<&'static ResourceDescriptor> {
    NEON_RESOURCES.iter().find(|d| match d.kind {
        ResourceKind::RemoteDocument => d.uri == uri,
        ResourceKind::Project => match_project_uri(uri).is_some(),
    })
}

fn text_contents(text: String, uri: &str, mime: &str) -> ReadResourceResult {
    ReadResourceResult::new(vec![ResourceContents::text(text, uri).with_mime_type(mime)])
}

pub(crate) async fn read_document(
    client: &NeonClient,
    uri: &str,
    fetch_url: &str,
    mime: &str,
) -> Result<ReadResourceResult, McpError> {
    debug!(%uri, %fetch_url, "fetching resource document");
    let text = client.fetch_text(fetch_url).await.map_err(map_neon_error)?;
    Ok(text_contents(text, uri, mime))
}

pub async fn read_resource(
    client: &NeonClient,
    uri: &str,
) -> Result<ReadResourceResult, McpError> {
    let descriptor = find_resource(uri).ok_or_else(|| {
        McpError::resource_not_found(format!("Unknown resource: {uri}"), None)
    })?;

    match descriptor.kind {
        ResourceKind::RemoteDocument => {
            read_document(client, uri, &raw_github_url(uri), descriptor.mime_type).await
        }
        ResourceKind::Project => {
            let project_id = match_project_uri(uri).unwrap_or_default();
            let project = client
                .get_project(project_id)
                .await
                .map_err(map_neon_error)?;
            let text = serde_json::to_string_pretty(&project.project).map_err(|e| {
                McpError::internal_error(
                    "serialization_error",
                    Some(serde_json::json!({"error": e.to_string()})),
                )
            })?;
            Ok(text_contents(text, uri, descriptor.mime_type))
        }
    }
}

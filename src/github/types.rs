// GitHub API types.
// Defines the repository model and structs for deserializing GraphQL responses.

use serde::{Deserialize, Serialize};

/// A starred repository as stored in the cache and ranked by search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Repository {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub readme: String,
}

impl Repository {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
        readme: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            description: description.into(),
            readme: readme.into(),
        }
    }
}

/// Cursor information for a page of a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// One page of starred repositories.
#[derive(Debug, Clone, Default)]
pub struct StarredPage {
    pub repositories: Vec<Repository>,
    pub page_info: PageInfo,
}

/// Rate limit information from response headers and the GraphQL `rateLimit` field.
#[derive(Debug, Clone, Default)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}

/// GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

/// A single entry of a GraphQL `errors` array.
#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
}

/// `data` payload of the starred repositories query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StarredQueryData {
    pub viewer: Viewer,
    pub rate_limit: Option<RateLimitNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Viewer {
    pub starred_repositories: StarredConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StarredConnection {
    #[serde(default)]
    pub nodes: Vec<StarredNode>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StarredNode {
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    /// README blob; null when the repository has no `HEAD:README.md`.
    pub object: Option<BlobNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BlobNode {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RateLimitNode {
    pub limit: u64,
    pub remaining: u64,
    pub reset_at: String,
}

impl From<StarredNode> for Repository {
    fn from(node: StarredNode) -> Self {
        Self {
            name: node.name,
            url: node.url,
            description: node.description.unwrap_or_default(),
            readme: node.object.and_then(|o| o.text).unwrap_or_default(),
        }
    }
}

impl StarredQueryData {
    /// Split the query payload into a page of repositories.
    pub fn into_page(self) -> StarredPage {
        let connection = self.viewer.starred_repositories;
        StarredPage {
            repositories: connection.nodes.into_iter().map(Repository::from).collect(),
            page_info: connection.page_info,
        }
    }
}

// GitHub API queries.
// Provides typed methods for fetching starred repositories through GraphQL.

use async_trait::async_trait;
use serde_json::json;

use crate::error::GitHubError;
use crate::fetch::StarredSource;

use super::client::GitHubClient;
use super::types::{StarredPage, StarredQueryData};

/// Number of repositories requested per page.
pub const PAGE_SIZE: u32 = 100;

/// Git expression used to pull README text alongside each repository.
const README_EXPRESSION: &str = "HEAD:README.md";

const STARRED_REPOSITORIES_QUERY: &str = r#"
query StarredRepositories($after: String, $first: Int!, $expression: String!) {
  viewer {
    starredRepositories(after: $after, first: $first) {
      nodes {
        name
        url
        description
        object(expression: $expression) {
          ... on Blob {
            text
          }
        }
      }
      pageInfo {
        hasNextPage
        endCursor
      }
    }
  }
  rateLimit {
    cost
    limit
    remaining
    resetAt
  }
}
"#;

impl GitHubClient {
    /// Get one page of the authenticated user's starred repositories.
    pub async fn get_starred_repositories(
        &mut self,
        after: Option<&str>,
    ) -> Result<StarredPage, GitHubError> {
        let variables = json!({
            "after": after,
            "first": PAGE_SIZE,
            "expression": README_EXPRESSION,
        });

        let data: StarredQueryData = self
            .graphql(STARRED_REPOSITORIES_QUERY, variables)
            .await?;

        if let Some(rate) = &data.rate_limit {
            let limits = self.rate_limit_mut();
            limits.limit = rate.limit;
            limits.remaining = rate.remaining;
            if let Ok(reset_at) = chrono::DateTime::parse_from_rfc3339(&rate.reset_at) {
                limits.reset = reset_at.timestamp().max(0) as u64;
            }
            tracing::debug!(
                remaining = rate.remaining,
                limit = rate.limit,
                "GraphQL rate limit"
            );
        }

        Ok(data.into_page())
    }
}

#[async_trait]
impl StarredSource for GitHubClient {
    async fn list_starred(&mut self, cursor: Option<&str>) -> Result<StarredPage, GitHubError> {
        self.get_starred_repositories(cursor).await
    }
}

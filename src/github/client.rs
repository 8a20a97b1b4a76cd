// GitHub API HTTP client.
// Handles authentication, rate limiting, and GraphQL request/response processing.

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::GitHubError;

use super::types::{GraphQlResponse, RateLimit};

const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";

type Result<T> = std::result::Result<T, GitHubError>;

/// GitHub API client with authentication and rate limit tracking.
pub struct GitHubClient {
    client: Client,
    rate_limit: RateLimit,
}

/// Body of a GraphQL POST request.
#[derive(Serialize)]
struct GraphQlRequest<'a, V> {
    query: &'a str,
    variables: V,
}

impl GitHubClient {
    /// Create a new GitHub client with the given token.
    pub fn new(token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();

        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| GitHubError::Other(e.to_string()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("starfind"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(GitHubError::Api)?;

        Ok(Self {
            client,
            rate_limit: RateLimit::default(),
        })
    }

    /// Create a client from the GITHUB_TOKEN (or GH_TOKEN) environment variable.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("GITHUB_TOKEN")
            .or_else(|_| std::env::var("GH_TOKEN"))
            .map_err(|_| GitHubError::MissingToken)?;
        Self::new(&token)
    }

    /// Get the current rate limit information.
    pub fn rate_limit(&self) -> &RateLimit {
        &self.rate_limit
    }

    pub(crate) fn rate_limit_mut(&mut self) -> &mut RateLimit {
        &mut self.rate_limit
    }

    /// Run a GraphQL query and decode its `data` payload.
    pub async fn graphql<V: Serialize, T: DeserializeOwned>(
        &mut self,
        query: &str,
        variables: V,
    ) -> Result<T> {
        let body = GraphQlRequest { query, variables };
        let response = self
            .client
            .post(GITHUB_GRAPHQL_URL)
            .json(&body)
            .send()
            .await
            .map_err(GitHubError::Api)?;

        self.update_rate_limit(&response);
        let response = self.check_response(response).await?;

        let text = response.text().await?;
        let envelope: GraphQlResponse<T> = serde_json::from_str(&text)?;
        self.check_graphql_errors(envelope)
    }

    /// Convert a GraphQL envelope into its data or the first reported error.
    fn check_graphql_errors<T>(&self, envelope: GraphQlResponse<T>) -> Result<T> {
        if let Some(first) = envelope.errors.first() {
            if first.error_type.as_deref() == Some("RATE_LIMITED") {
                return Err(GitHubError::RateLimited {
                    reset_at: self.reset_display(),
                });
            }
            let messages: Vec<&str> = envelope
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect();
            return Err(GitHubError::GraphQl(messages.join("; ")));
        }

        envelope
            .data
            .ok_or_else(|| GitHubError::GraphQl("response contained no data".to_string()))
    }

    /// Update rate limit from response headers.
    fn update_rate_limit(&mut self, response: &Response) {
        if let Some(limit) = header_u64(response, "x-ratelimit-limit") {
            self.rate_limit.limit = limit;
        }
        if let Some(remaining) = header_u64(response, "x-ratelimit-remaining") {
            self.rate_limit.remaining = remaining;
        }
        if let Some(reset) = header_u64(response, "x-ratelimit-reset") {
            self.rate_limit.reset = reset;
        }
    }

    /// Format the rate limit reset time for error messages.
    fn reset_display(&self) -> String {
        chrono::DateTime::from_timestamp(self.rate_limit.reset as i64, 0)
            .map(|dt| dt.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Check response status and convert errors.
    async fn check_response(&self, response: Response) -> Result<Response> {
        match response.status() {
            StatusCode::OK => Ok(response),
            StatusCode::UNAUTHORIZED => Err(GitHubError::Unauthorized),
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
                if self.rate_limit.remaining == 0 =>
            {
                Err(GitHubError::RateLimited {
                    reset_at: self.reset_display(),
                })
            }
            status => Err(GitHubError::Other(format!(
                "HTTP {}: {}",
                status,
                response.text().await.unwrap_or_default()
            ))),
        }
    }
}

fn header_u64(response: &Response, name: &str) -> Option<u64> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

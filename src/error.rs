// Error types for starfind.
// Separates GitHub transport errors from cache, fetch, and search failures.

use thiserror::Error;

/// Errors raised while talking to the GitHub API.
#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("GitHub API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("Rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: String },

    #[error("Missing GITHUB_TOKEN environment variable")]
    MissingToken,

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors raised by the on-disk repository cache.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache file not found")]
    NotFound,

    #[error("cache file is corrupt: {0}")]
    Corrupt(String),

    #[error("cache expired at {expires_at}")]
    Expired { expires_at: String },

    #[error("cache IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that abort a fetch of the starred repository set.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to fetch starred repositories: {0}")]
    Transport(GitHubError),

    #[error("authentication failed: {0}")]
    Auth(GitHubError),

    #[error("fetched {count} repositories but failed to cache them: {source}")]
    CacheWriteFailed {
        count: usize,
        #[source]
        source: CacheError,
    },
}

impl From<GitHubError> for FetchError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::Unauthorized | GitHubError::MissingToken => FetchError::Auth(err),
            other => FetchError::Transport(other),
        }
    }
}

/// Errors raised while building a search index.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("search index error: {0}")]
    Index(#[from] tantivy::TantivyError),
}

/// Errors that end a search session.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Search(#[from] SearchError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors_map_to_auth() {
        assert!(matches!(
            FetchError::from(GitHubError::Unauthorized),
            FetchError::Auth(_)
        ));
        assert!(matches!(
            FetchError::from(GitHubError::MissingToken),
            FetchError::Auth(_)
        ));
    }

    #[test]
    fn test_other_errors_map_to_transport() {
        let err = FetchError::from(GitHubError::RateLimited {
            reset_at: "12:00:00".to_string(),
        });
        assert!(matches!(err, FetchError::Transport(_)));
        assert_eq!(
            err.to_string(),
            "failed to fetch starred repositories: Rate limit exceeded, resets at 12:00:00"
        );
    }
}

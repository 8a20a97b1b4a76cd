// GitHub API module.
// Provides the client and types for fetching starred repositories over GraphQL.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::GitHubClient;
pub use endpoints::PAGE_SIZE;
pub use types::{PageInfo, RateLimit, Repository, StarredPage};

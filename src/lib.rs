// starfind: find starred GitHub repositories by relevance.
// Fetches the starred set (or loads it from cache) and ranks it against query words.

pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod github;
pub mod search;
pub mod state;
pub mod ui;

pub use config::{CacheWritePolicy, Config};
pub use error::{CacheError, FetchError, GitHubError, SearchError, SessionError};
pub use fetch::{FetchOutcome, FetchProgress, FetchSource, Fetcher, StarredSource};
pub use github::{GitHubClient, PageInfo, Repository};
pub use search::{ScoringStrategy, SearchFields, SearchResultItem, StrategyKind, search};

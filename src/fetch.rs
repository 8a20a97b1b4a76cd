// Starred repository fetcher.
// Serves the full starred set from cache or by walking every page of the remote listing.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::cache;
use crate::config::{CacheWritePolicy, Config};
use crate::error::{CacheError, FetchError, GitHubError};
use crate::github::{Repository, StarredPage};

/// Source of starred repository pages, addressed by an opaque cursor.
#[async_trait]
pub trait StarredSource: Send {
    /// Fetch the page after `cursor` (`None` for the first page).
    async fn list_starred(&mut self, cursor: Option<&str>) -> Result<StarredPage, GitHubError>;
}

/// Where a fetched repository set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSource {
    Cache,
    Remote,
}

/// Progress report emitted while fetching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchProgress {
    /// Repositories accumulated so far.
    pub count: usize,
    pub from_cache: bool,
}

/// Result of a successful fetch.
#[derive(Debug)]
pub struct FetchOutcome {
    pub repositories: Vec<Repository>,
    pub source: FetchSource,
    /// Set when the cache write failed under [`CacheWritePolicy::ReturnData`].
    pub cache_write_error: Option<CacheError>,
}

impl FetchOutcome {
    pub fn from_cache(&self) -> bool {
        self.source == FetchSource::Cache
    }
}

/// Fetches the complete starred set, consulting the cache first.
pub struct Fetcher<S> {
    source: S,
    cache_path: PathBuf,
    ttl: Duration,
    use_cache: bool,
    write_policy: CacheWritePolicy,
}

impl<S: StarredSource> Fetcher<S> {
    pub fn new(source: S, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            source,
            cache_path: cache_path.into(),
            ttl: cache::DEFAULT_TTL,
            use_cache: true,
            write_policy: CacheWritePolicy::default(),
        }
    }

    /// Create a fetcher with the cache settings from `config`.
    pub fn from_config(source: S, config: &Config) -> Self {
        Self::new(source, config.cache_path())
            .with_ttl(config.ttl)
            .with_cache_reads(config.use_cache)
            .with_write_policy(config.cache_write_policy)
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Enable or disable reading the cache before fetching.
    pub fn with_cache_reads(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub fn with_write_policy(mut self, policy: CacheWritePolicy) -> Self {
        self.write_policy = policy;
        self
    }

    /// Fetch the full starred set.
    pub async fn fetch_all(&mut self) -> Result<FetchOutcome, FetchError> {
        self.fetch_all_with_progress(|_| {}).await
    }

    /// Fetch the full starred set, reporting progress after the cache lookup and each page.
    pub async fn fetch_all_with_progress(
        &mut self,
        mut on_progress: impl FnMut(FetchProgress) + Send,
    ) -> Result<FetchOutcome, FetchError> {
        if self.use_cache {
            match cache::read(&self.cache_path) {
                Ok(repositories) => {
                    tracing::info!(
                        count = repositories.len(),
                        path = %self.cache_path.display(),
                        "Loaded starred repositories from cache"
                    );
                    on_progress(FetchProgress {
                        count: repositories.len(),
                        from_cache: true,
                    });
                    return Ok(FetchOutcome {
                        repositories,
                        source: FetchSource::Cache,
                        cache_write_error: None,
                    });
                }
                Err(e) => tracing::debug!(error = %e, "Cache unusable, fetching from GitHub"),
            }
        }

        let repositories = self.fetch_pages(&mut on_progress).await?;

        let cache_write_error = match cache::write(&self.cache_path, &repositories, self.ttl) {
            Ok(()) => None,
            Err(source) => match self.write_policy {
                CacheWritePolicy::Fail => {
                    return Err(FetchError::CacheWriteFailed {
                        count: repositories.len(),
                        source,
                    });
                }
                CacheWritePolicy::ReturnData => {
                    tracing::warn!(error = %source, "Failed to cache starred repositories");
                    Some(source)
                }
            },
        };

        tracing::info!(count = repositories.len(), "Fetched starred repositories");

        Ok(FetchOutcome {
            repositories,
            source: FetchSource::Remote,
            cache_write_error,
        })
    }

    /// Walk the remote listing page by page until it is exhausted.
    async fn fetch_pages(
        &mut self,
        on_progress: &mut (impl FnMut(FetchProgress) + Send),
    ) -> Result<Vec<Repository>, FetchError> {
        let mut repositories = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            tracing::debug!(cursor = ?cursor, "Requesting starred repositories page");
            let page = self.source.list_starred(cursor.as_deref()).await?;

            repositories.extend(page.repositories);
            on_progress(FetchProgress {
                count: repositories.len(),
                from_cache: false,
            });

            if !page.page_info.has_next_page {
                break;
            }

            match page.page_info.end_cursor {
                Some(next) => cursor = Some(next),
                None => {
                    return Err(FetchError::Transport(GitHubError::Other(
                        "page reported more results but no end cursor".to_string(),
                    )));
                }
            }
        }

        Ok(repositories)
    }
}

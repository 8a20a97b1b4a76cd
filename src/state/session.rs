// Search session state machine.
// Tracks a fetch-then-search run and drives it from fetcher and scorer signals.

use tokio::sync::mpsc::UnboundedSender;

use crate::error::SessionError;
use crate::fetch::{FetchProgress, Fetcher, StarredSource};
use crate::search::{self, ScoringStrategy, SearchResultItem};

/// Observation-only signals emitted while a session runs.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Repositories accumulated so far.
    FetchProgress(FetchProgress),
    FetchFailed(String),
    /// Ranking has started over `count` repositories.
    SearchStarted { count: usize },
    SearchCompleted(Vec<SearchResultItem>),
    SearchFailed(String),
}

/// Phase of a search session.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Idle,
    Fetching {
        count: usize,
        from_cache: bool,
    },
    Searching {
        count: usize,
    },
    Done {
        results: Vec<SearchResultItem>,
        /// Size of the searched repository set.
        searched: usize,
    },
    Failed {
        message: String,
    },
}

impl SessionState {
    pub fn is_finished(&self) -> bool {
        matches!(self, SessionState::Done { .. } | SessionState::Failed { .. })
    }

    pub fn results(&self) -> Option<&[SearchResultItem]> {
        match self {
            SessionState::Done { results, .. } => Some(results),
            _ => None,
        }
    }
}

/// Session state plus whether the repository set came from the cache.
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
    from_cache: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn from_cache(&self) -> bool {
        self.from_cache
    }

    /// Apply an event. Events that make no sense in the current state are ignored.
    pub fn apply(&mut self, event: SessionEvent) {
        let next = match (&self.state, event) {
            (
                SessionState::Idle | SessionState::Fetching { .. },
                SessionEvent::FetchProgress(progress),
            ) => {
                self.from_cache |= progress.from_cache;
                SessionState::Fetching {
                    count: progress.count,
                    from_cache: progress.from_cache,
                }
            }
            (
                SessionState::Idle | SessionState::Fetching { .. },
                SessionEvent::FetchFailed(message),
            ) => SessionState::Failed { message },
            (
                SessionState::Idle | SessionState::Fetching { .. },
                SessionEvent::SearchStarted { count },
            ) => SessionState::Searching { count },
            (SessionState::Searching { count }, SessionEvent::SearchCompleted(results)) => {
                SessionState::Done {
                    results,
                    searched: *count,
                }
            }
            (SessionState::Searching { .. }, SessionEvent::SearchFailed(message)) => {
                SessionState::Failed { message }
            }
            (state, event) => {
                tracing::warn!(?state, ?event, "Ignoring out-of-order session event");
                return;
            }
        };
        self.state = next;
    }
}

/// Fetch the starred set, rank it against `terms`, and report each step on `events`.
///
/// Send failures are ignored so the session still completes after the receiver is gone.
pub async fn run_session<S: StarredSource>(
    mut fetcher: Fetcher<S>,
    terms: Vec<String>,
    strategy: Box<dyn ScoringStrategy>,
    events: UnboundedSender<SessionEvent>,
) -> Result<Vec<SearchResultItem>, SessionError> {
    let outcome = {
        let progress_events = events.clone();
        fetcher
            .fetch_all_with_progress(move |progress| {
                let _ = progress_events.send(SessionEvent::FetchProgress(progress));
            })
            .await
    };

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(error = %e, "Fetch failed");
            let _ = events.send(SessionEvent::FetchFailed(e.to_string()));
            return Err(e.into());
        }
    };

    let _ = events.send(SessionEvent::SearchStarted {
        count: outcome.repositories.len(),
    });

    match search::search(&outcome.repositories, &terms, strategy.as_ref()) {
        Ok(results) => {
            tracing::info!(
                terms = ?terms,
                results = results.len(),
                from_cache = outcome.from_cache(),
                "Search complete"
            );
            let _ = events.send(SessionEvent::SearchCompleted(results.clone()));
            Ok(results)
        }
        Err(e) => {
            tracing::error!(error = %e, "Search failed");
            let _ = events.send(SessionEvent::SearchFailed(e.to_string()));
            Err(e.into())
        }
    }
}

// Relevance search over starred repositories.
// Ranks an in-memory repository set against query terms with a pluggable scoring strategy.

mod indexed;
mod weighted;

use std::fmt;
use std::str::FromStr;

use crate::error::SearchError;
use crate::github::Repository;

pub use indexed::IndexedRelevance;
pub use weighted::WeightedSubstring;

/// A repository paired with its relevance score.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResultItem {
    pub repository: Repository,
    pub score: f64,
}

/// Repository fields a search looks at. All are enabled by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchFields {
    pub name: bool,
    pub description: bool,
    pub readme: bool,
}

impl SearchFields {
    pub const ALL: Self = Self {
        name: true,
        description: true,
        readme: true,
    };
    pub const NONE: Self = Self {
        name: false,
        description: false,
        readme: false,
    };

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

impl Default for SearchFields {
    fn default() -> Self {
        Self::ALL
    }
}

/// Parses a comma separated list such as `name,description`.
impl FromStr for SearchFields {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = Self::NONE;
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.to_ascii_lowercase().as_str() {
                "name" => fields.name = true,
                "description" => fields.description = true,
                "readme" => fields.readme = true,
                other => {
                    return Err(format!(
                        "unknown field: {other} (expected name, description or readme)"
                    ));
                }
            }
        }
        if fields.is_empty() {
            return Err("at least one search field is required".to_string());
        }
        Ok(fields)
    }
}

/// Scores repositories against query terms.
///
/// Implementations return only the repositories they consider relevant, each at
/// most once, with non-negative scores. Ordering is applied by [`search`].
pub trait ScoringStrategy: Send + Sync {
    fn score(
        &self,
        repositories: &[Repository],
        terms: &[String],
    ) -> Result<Vec<SearchResultItem>, SearchError>;
}

/// Selectable scoring strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyKind {
    /// Weighted substring counts over name, description, and README.
    #[default]
    Weighted,
    /// BM25 relevance from an in-memory tantivy index.
    Indexed,
}

impl StrategyKind {
    /// Build the strategy. `case_sensitive` only affects [`StrategyKind::Weighted`].
    pub fn build(self, case_sensitive: bool, fields: SearchFields) -> Box<dyn ScoringStrategy> {
        match self {
            StrategyKind::Weighted => {
                Box::new(WeightedSubstring::new(case_sensitive).with_fields(fields))
            }
            StrategyKind::Indexed => Box::new(IndexedRelevance::new().with_fields(fields)),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "weighted" => Ok(Self::Weighted),
            "indexed" => Ok(Self::Indexed),
            other => Err(format!(
                "unknown strategy: {other} (expected weighted or indexed)"
            )),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Weighted => write!(f, "weighted"),
            StrategyKind::Indexed => write!(f, "indexed"),
        }
    }
}

/// Rank `repositories` against `terms`, highest score first.
///
/// Equal scores keep the order the strategy produced them in. A query with no
/// non-empty terms yields no results.
pub fn search(
    repositories: &[Repository],
    terms: &[String],
    strategy: &dyn ScoringStrategy,
) -> Result<Vec<SearchResultItem>, SearchError> {
    if terms.iter().all(|t| t.trim().is_empty()) {
        return Ok(Vec::new());
    }

    let mut results = strategy.score(repositories, terms)?;
    results.sort_by(|a, b| b.score.total_cmp(&a.score));

    tracing::debug!(
        repositories = repositories.len(),
        results = results.len(),
        "Search finished"
    );
    Ok(results)
}

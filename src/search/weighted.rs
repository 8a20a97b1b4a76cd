// Weighted substring scoring.
// Deterministic scores from counting term occurrences in each repository field.

use std::borrow::Cow;

use crate::error::SearchError;
use crate::github::Repository;

use super::{ScoringStrategy, SearchFields, SearchResultItem};

/// Per-character weight when a term equals the whole name.
const NAME_EXACT_WEIGHT: usize = 10;
/// Per-character weight for each occurrence in the name.
const NAME_WEIGHT: usize = 7;
/// Per-character weight for each occurrence in the description.
const DESCRIPTION_WEIGHT: usize = 3;
/// Per-character weight for each occurrence in the README.
const README_WEIGHT: usize = 1;

/// Scores repositories by summing weighted, overlapping substring matches.
#[derive(Debug, Clone, Copy)]
pub struct WeightedSubstring {
    case_sensitive: bool,
    fields: SearchFields,
}

impl Default for WeightedSubstring {
    fn default() -> Self {
        Self::new(true)
    }
}

impl WeightedSubstring {
    pub fn new(case_sensitive: bool) -> Self {
        Self {
            case_sensitive,
            fields: SearchFields::ALL,
        }
    }

    /// Restrict scoring to the given fields.
    pub fn with_fields(mut self, fields: SearchFields) -> Self {
        self.fields = fields;
        self
    }

    fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.case_sensitive {
            Cow::Borrowed(text)
        } else {
            Cow::Owned(text.to_lowercase())
        }
    }

    /// Total score of one repository across all terms.
    fn score_repository(&self, repository: &Repository, terms: &[Cow<'_, str>]) -> usize {
        let name = self.normalize(&repository.name);
        let description = self.normalize(&repository.description);
        let readme = self.normalize(&repository.readme);

        terms
            .iter()
            .map(|term| {
                let term_len = term.chars().count();

                let mut score = 0;
                if self.fields.name {
                    score += if name == *term {
                        repository.name.chars().count() * NAME_EXACT_WEIGHT
                    } else {
                        count_occurrences(&name, term) * term_len * NAME_WEIGHT
                    };
                }
                if self.fields.description {
                    score += count_occurrences(&description, term) * term_len * DESCRIPTION_WEIGHT;
                }
                if self.fields.readme {
                    score += count_occurrences(&readme, term) * term_len * README_WEIGHT;
                }
                score
            })
            .sum()
    }
}

impl ScoringStrategy for WeightedSubstring {
    fn score(
        &self,
        repositories: &[Repository],
        terms: &[String],
    ) -> Result<Vec<SearchResultItem>, SearchError> {
        let terms: Vec<Cow<'_, str>> = terms
            .iter()
            .filter(|t| !t.trim().is_empty())
            .map(|t| self.normalize(t))
            .collect();

        Ok(repositories
            .iter()
            .filter_map(|repository| {
                let score = self.score_repository(repository, &terms);
                (score > 0).then(|| SearchResultItem {
                    repository: repository.clone(),
                    score: score as f64,
                })
            })
            .collect())
    }
}

/// Count occurrences of `needle` in `haystack`, including overlapping ones.
fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() || needle.len() > haystack.len() {
        return 0;
    }
    haystack
        .char_indices()
        .filter(|(i, _)| haystack[*i..].starts_with(needle))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn score_of(strategy: &WeightedSubstring, repo: Repository, words: &[&str]) -> Option<f64> {
        strategy
            .score(&[repo], &terms(words))
            .unwrap()
            .first()
            .map(|r| r.score)
    }

    #[test]
    fn test_count_occurrences() {
        assert_eq!(count_occurrences("an example of example", "example"), 2);
        assert_eq!(count_occurrences("aaaa", "aa"), 3);
        assert_eq!(count_occurrences("abc", "abcd"), 0);
        assert_eq!(count_occurrences("abc", ""), 0);
        assert_eq!(count_occurrences("héhé", "hé"), 2);
    }

    #[test]
    fn test_exact_name_and_description_occurrences() {
        let repo = Repository::new(
            "example",
            "https://github.com/x/example",
            "an example of example",
            "",
        );
        let score = score_of(&WeightedSubstring::default(), repo, &["example"]);

        // 7 * 10 for the exact name plus two description hits at 7 * 3
        assert_eq!(score, Some(112.0));
    }

    #[test]
    fn test_partial_name_match() {
        let repo = Repository::new("example-rs", "u", "", "");
        let score = score_of(&WeightedSubstring::default(), repo, &["example"]);
        assert_eq!(score, Some(49.0));
    }

    #[test]
    fn test_readme_weight() {
        let repo = Repository::new("x", "u", "", "tokio tokio tokio");
        let score = score_of(&WeightedSubstring::default(), repo, &["tokio"]);
        assert_eq!(score, Some(15.0));
    }

    #[test]
    fn test_terms_accumulate() {
        let repo = Repository::new("serde", "u", "json serializer", "");
        let strategy = WeightedSubstring::default();
        // serde: exact name 50; json: description 4 * 3 = 12
        assert_eq!(score_of(&strategy, repo, &["serde", "json"]), Some(62.0));
    }

    #[test]
    fn test_zero_score_excluded() {
        let repos = vec![
            Repository::new("tokio", "u", "async runtime", ""),
            Repository::new("serde", "u", "serialization", "framework"),
        ];
        let results = WeightedSubstring::default()
            .score(&repos, &terms(&["async"]))
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].repository.name, "tokio");
    }

    #[test]
    fn test_disabled_fields_are_not_scored() {
        let repo = Repository::new("tokio", "u", "tokio runtime", "tokio");
        let name_only = SearchFields {
            name: true,
            description: false,
            readme: false,
        };
        let readme_only = SearchFields {
            name: false,
            description: false,
            readme: true,
        };

        let strategy = WeightedSubstring::default().with_fields(name_only);
        assert_eq!(score_of(&strategy, repo.clone(), &["tokio"]), Some(50.0));

        let strategy = WeightedSubstring::default().with_fields(readme_only);
        assert_eq!(score_of(&strategy, repo.clone(), &["tokio"]), Some(5.0));

        let strategy = WeightedSubstring::default().with_fields(readme_only);
        assert_eq!(score_of(&strategy, repo, &["runtime"]), None);
    }

    #[test]
    fn test_exact_name_length_uses_original_name() {
        // Lowercasing 'İ' yields two chars; the exact match still counts one
        let repo = Repository::new("İ", "u", "", "");
        assert_eq!(score_of(&WeightedSubstring::new(false), repo, &["İ"]), Some(10.0));
    }

    #[test]
    fn test_case_sensitivity_is_configurable() {
        let repo = Repository::new("Tokio", "u", "", "");

        assert_eq!(score_of(&WeightedSubstring::new(true), repo.clone(), &["tokio"]), None);
        assert_eq!(
            score_of(&WeightedSubstring::new(false), repo, &["tokio"]),
            Some(50.0)
        );
    }
}

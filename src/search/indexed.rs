// Indexed relevance scoring.
// Builds a throwaway in-memory tantivy index per search and returns its BM25 scores.

use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::*;
use tantivy::{Index, IndexWriter, doc};

use crate::error::SearchError;
use crate::github::Repository;

use super::{ScoringStrategy, SearchFields, SearchResultItem};

/// Writer memory budget; a single indexing thread needs at least 15 MB.
const WRITER_MEMORY_BYTES: usize = 50_000_000;

const NAME_BOOST: f32 = 10.0;
const DESCRIPTION_BOOST: f32 = 3.0;
const README_BOOST: f32 = 1.0;

/// Full-text relevance over name, description, and README.
///
/// Queries accept tantivy syntax (`+must`, `-exclude`, `"phrases"`, `term~1`).
/// Matching is always case-insensitive because the default tokenizer lowercases.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexedRelevance {
    fields: SearchFields,
}

impl IndexedRelevance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the query to the given fields.
    pub fn with_fields(mut self, fields: SearchFields) -> Self {
        self.fields = fields;
        self
    }
}

impl ScoringStrategy for IndexedRelevance {
    fn score(
        &self,
        repositories: &[Repository],
        terms: &[String],
    ) -> Result<Vec<SearchResultItem>, SearchError> {
        if repositories.is_empty() || self.fields.is_empty() {
            return Ok(Vec::new());
        }

        let mut schema_builder = Schema::builder();
        let f_position = schema_builder.add_u64_field("position", STORED);
        let f_name = schema_builder.add_text_field("name", TEXT);
        let f_description = schema_builder.add_text_field("description", TEXT);
        let f_readme = schema_builder.add_text_field("readme", TEXT);
        let schema = schema_builder.build();

        let index = Index::create_in_ram(schema);
        let mut writer: IndexWriter = index.writer_with_num_threads(1, WRITER_MEMORY_BYTES)?;

        // Documents are keyed by position so repeated names stay distinct.
        // Disabled fields are left out so explicit `field:term` queries cannot reach them.
        for (position, repository) in repositories.iter().enumerate() {
            let mut document = doc!(f_position => position as u64);
            if self.fields.name {
                document.add_text(f_name, &repository.name);
            }
            if self.fields.description {
                document.add_text(f_description, &repository.description);
            }
            if self.fields.readme {
                document.add_text(f_readme, &repository.readme);
            }
            writer.add_document(document)?;
        }
        writer.commit()?;

        let reader = index.reader()?;
        let searcher = reader.searcher();

        let searched: Vec<(Field, f32)> = [
            (self.fields.name, f_name, NAME_BOOST),
            (self.fields.description, f_description, DESCRIPTION_BOOST),
            (self.fields.readme, f_readme, README_BOOST),
        ]
        .into_iter()
        .filter_map(|(enabled, field, boost)| enabled.then_some((field, boost)))
        .collect();

        let mut query_parser =
            QueryParser::for_index(&index, searched.iter().map(|(field, _)| *field).collect());
        for (field, boost) in &searched {
            query_parser.set_field_boost(*field, *boost);
        }

        let query_str = terms.join(" ");
        let (query, errors) = query_parser.parse_query_lenient(&query_str);
        if !errors.is_empty() {
            tracing::debug!(query = %query_str, errors = ?errors, "Ignored malformed query parts");
        }

        let top_docs = searcher.search(&query, &TopDocs::with_limit(repositories.len()))?;

        let mut results = Vec::with_capacity(top_docs.len());
        for (score, doc_address) in top_docs {
            let doc: TantivyDocument = searcher.doc(doc_address)?;
            let Some(repository) = doc
                .get_first(f_position)
                .and_then(|v| v.as_u64())
                .and_then(|position| repositories.get(position as usize))
            else {
                continue;
            };

            results.push(SearchResultItem {
                repository: repository.clone(),
                score: f64::from(score).max(0.0),
            });
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn repos() -> Vec<Repository> {
        vec![
            Repository::new("serde", "u1", "serialization framework", ""),
            Repository::new("tokio", "u2", "an async runtime", "Tokio is a runtime"),
            Repository::new("parser", "u3", "", ""),
            Repository::new("nom", "u4", "a parser combinator library", ""),
        ]
    }

    fn names(results: &[SearchResultItem]) -> Vec<&str> {
        results.iter().map(|r| r.repository.name.as_str()).collect()
    }

    #[test]
    fn test_matches_description_and_readme() {
        let results = IndexedRelevance::new()
            .score(&repos(), &terms(&["runtime"]))
            .unwrap();
        assert_eq!(names(&results), ["tokio"]);
        assert!(results[0].score > 0.0);
    }

    #[test]
    fn test_case_insensitive() {
        let results = IndexedRelevance::new()
            .score(&repos(), &terms(&["SERDE"]))
            .unwrap();
        assert_eq!(names(&results), ["serde"]);
    }

    #[test]
    fn test_name_outranks_description() {
        let results = IndexedRelevance::new()
            .score(&repos(), &terms(&["parser"]))
            .unwrap();
        assert_eq!(names(&results), ["parser", "nom"]);
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn test_duplicate_names_stay_distinct() {
        let repos = vec![
            Repository::new("dup", "u1", "first", ""),
            Repository::new("dup", "u2", "second", ""),
        ];
        let results = IndexedRelevance::new()
            .score(&repos, &terms(&["dup"]))
            .unwrap();

        let mut urls: Vec<_> = results.iter().map(|r| r.repository.url.as_str()).collect();
        urls.sort();
        assert_eq!(urls, ["u1", "u2"]);
    }

    #[test]
    fn test_malformed_query_does_not_fail() {
        let results = IndexedRelevance::new()
            .score(&repos(), &terms(&["tokio", "(", "\"unterminated"]))
            .unwrap();
        assert!(names(&results).contains(&"tokio"));
    }

    #[test]
    fn test_excluded_fields_do_not_match() {
        let no_description = SearchFields {
            description: false,
            ..SearchFields::ALL
        };
        let strategy = IndexedRelevance::new().with_fields(no_description);

        let results = strategy.score(&repos(), &terms(&["combinator"])).unwrap();
        assert!(results.is_empty());

        let results = strategy
            .score(&repos(), &terms(&["description:combinator"]))
            .unwrap();
        assert!(results.is_empty());

        // README still searched
        let results = strategy.score(&repos(), &terms(&["runtime"])).unwrap();
        assert_eq!(names(&results), ["tokio"]);
    }

    #[test]
    fn test_no_fields_yields_nothing() {
        let results = IndexedRelevance::new()
            .with_fields(SearchFields::NONE)
            .score(&repos(), &terms(&["tokio"]))
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_no_match() {
        let results = IndexedRelevance::new()
            .score(&repos(), &terms(&["kubernetes"]))
            .unwrap();
        assert!(results.is_empty());
    }
}

//! Query completion heuristic.

use std::sync::Arc;

use crate::catalog::{CatalogError, CatalogStore};
use crate::metrics;

/// Upper bound on returned suggestions.
pub const MAX_SUGGESTIONS: usize = 10;

/// Past keywords consulted per request.
const HISTORY_LIMIT: u32 = 5;

/// Titles consulted per request.
const TITLE_LIMIT: u32 = 5;

/// Below this many collected suggestions the suffix vocabulary kicks in.
const SUFFIX_THRESHOLD: usize = 5;

/// Produces completions for a partial query from search history, catalog
/// titles and a fixed suffix vocabulary, in that order.
pub struct SuggestionEngine {
    store: Arc<dyn CatalogStore>,
    suffixes: Vec<String>,
}

impl SuggestionEngine {
    pub fn new(store: Arc<dyn CatalogStore>, suffixes: Vec<String>) -> Self {
        Self { store, suffixes }
    }

    /// Suggest up to [`MAX_SUGGESTIONS`] distinct completions for `q`.
    ///
    /// The query is used verbatim, whitespace included. Only an empty query
    /// yields an empty list, and it does so without touching the store.
    pub fn suggest(&self, q: &str) -> Result<Vec<String>, CatalogError> {
        if q.is_empty() {
            return Ok(Vec::new());
        }

        let mut out = Suggestions::default();

        for keyword in self.store.keywords_with_prefix(q, HISTORY_LIMIT)? {
            out.push(keyword);
        }

        for title in self.store.titles_containing(q, TITLE_LIMIT)? {
            for completion in title_completions(q, &title) {
                out.push(completion);
            }
        }

        if out.len() < SUFFIX_THRESHOLD {
            for suffix in &self.suffixes {
                if out.is_full() {
                    break;
                }
                out.push(format!("{q}{suffix}"));
            }
        }

        let suggestions = out.into_vec();
        metrics::SUGGESTIONS_SERVED.inc();
        tracing::debug!(query = %q, count = suggestions.len(), "Built suggestions");
        Ok(suggestions)
    }
}

/// Completions synthesised from the words of a title.
///
/// Every word that contains `q` and is longer than it yields `q` followed by
/// whatever comes after the first occurrence of `q` in that word.
fn title_completions<'a>(q: &'a str, title: &'a str) -> impl Iterator<Item = String> + 'a {
    title.split_whitespace().filter_map(move |word| {
        if word.len() <= q.len() {
            return None;
        }
        let idx = word.find(q)?;
        Some(format!("{}{}", q, &word[idx + q.len()..]))
    })
}

/// Insertion-ordered, duplicate-free, capped list.
#[derive(Default)]
struct Suggestions {
    items: Vec<String>,
}

impl Suggestions {
    fn push(&mut self, candidate: String) {
        if !self.is_full() && !self.items.contains(&candidate) {
            self.items.push(candidate);
        }
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn is_full(&self) -> bool {
        self.items.len() >= MAX_SUGGESTIONS
    }

    fn into_vec(self) -> Vec<String> {
        self.items
    }
}

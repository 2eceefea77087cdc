//! Turns a free-text query and category selector into a store-level predicate.

use serde::Serialize;

/// Category selector meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// Predicate over resources.
///
/// Every filter implicitly requires `valid = true`. Each term must occur as a
/// substring of the title or the description; terms are AND-combined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResourceFilter {
    /// Whitespace-separated terms of the query, empties dropped.
    pub terms: Vec<String>,
    /// Category `value` the resource must belong to.
    pub category: Option<String>,
}

impl ResourceFilter {
    /// Build the filter for a search request.
    ///
    /// `category` values `""` and `"all"` disable the category restriction.
    pub fn from_request(query: &str, category: Option<&str>) -> Self {
        let terms = query.split_whitespace().map(str::to_string).collect();

        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
            .map(str::to_string);

        Self { terms, category }
    }

    /// Filter matching every valid resource.
    pub fn valid_only() -> Self {
        Self::default()
    }

    pub fn has_text_constraint(&self) -> bool {
        !self.terms.is_empty()
    }

    /// Evaluate the predicate in memory (case-sensitive substring match).
    ///
    /// `category_value` is the `value` of the resource's category, if it has one.
    pub fn matches(
        &self,
        valid: bool,
        title: &str,
        description: &str,
        category_value: Option<&str>,
    ) -> bool {
        if !valid {
            return false;
        }

        if let Some(ref wanted) = self.category {
            if category_value != Some(wanted.as_str()) {
                return false;
            }
        }

        self.terms
            .iter()
            .all(|term| title.contains(term.as_str()) || description.contains(term.as_str()))
    }
}

/// Escape `LIKE` wildcards so a term is matched literally. Pair with `ESCAPE '\'`.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

//! In-memory catalog for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::catalog::{
    CatalogError, CatalogStore, Category, DownloadRecord, HelpRequest, ListedResource,
    NewCategory, Resource, SearchRecord,
};
use crate::search::{ResourceFilter, SortMode};

#[derive(Default)]
struct State {
    categories: Vec<Category>,
    resources: Vec<Resource>,
    search_records: Vec<SearchRecord>,
    downloads: Vec<DownloadRecord>,
    help_requests: Vec<HelpRequest>,
}

impl State {
    fn category(&self, id: i64) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    fn matching<'a>(&'a self, filter: &'a ResourceFilter) -> impl Iterator<Item = &'a Resource> {
        self.resources.iter().filter(move |r| {
            let category_value = self.category(r.category_id).map(|c| c.value.as_str());
            filter.matches(r.valid, &r.title, &r.description, category_value)
        })
    }
}

/// Mock implementation of the CatalogStore trait.
///
/// Provides controllable behavior for testing:
/// - Seed categories, resources and search history
/// - Inspect written downloads, search records and help requests
/// - Simulate store failures
///
/// Text matching is case-sensitive, unlike SQLite's `LIKE`.
///
/// # Example
///
/// ```rust,ignore
/// use pansearch_core::testing::MockCatalog;
///
/// let catalog = MockCatalog::new();
/// let docs = catalog.add_category(NewCategory::new("document", "Documents", 1));
/// catalog.add_resource(Resource::new("r1", "Linux Guide", docs.id, "https://..."));
///
/// catalog.set_failing(true);
/// assert!(catalog.get_resource("r1").is_err());
/// ```
#[derive(Default)]
pub struct MockCatalog {
    state: Mutex<State>,
    failing: AtomicBool,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every store call fail with a database error until reset.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Add a category, assigning the next id.
    pub fn add_category(&self, new: NewCategory) -> Category {
        let mut state = self.state.lock().unwrap();
        let category = Category {
            id: state.categories.len() as i64 + 1,
            value: new.value,
            label: new.label,
            icon: new.icon,
            sort_order: new.sort_order,
            is_active: new.is_active,
        };
        state.categories.push(category.clone());
        category
    }

    pub fn add_resource(&self, resource: Resource) {
        self.state.lock().unwrap().resources.push(resource);
    }

    pub fn add_search_record(&self, record: SearchRecord) {
        self.state.lock().unwrap().search_records.push(record);
    }

    /// Current state of a resource, regardless of validity.
    pub fn resource(&self, id: &str) -> Option<Resource> {
        self.state
            .lock()
            .unwrap()
            .resources
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    pub fn downloads(&self) -> Vec<DownloadRecord> {
        self.state.lock().unwrap().downloads.clone()
    }

    pub fn search_records(&self) -> Vec<SearchRecord> {
        self.state.lock().unwrap().search_records.clone()
    }

    pub fn help_requests(&self) -> Vec<HelpRequest> {
        self.state.lock().unwrap().help_requests.clone()
    }

    fn check(&self) -> Result<(), CatalogError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CatalogError::Database("Mock failure".to_string()));
        }
        Ok(())
    }
}

/// Distinct values ranked by the maximum of a score, highest first, ties by value.
fn ranked_distinct<'a>(entries: impl Iterator<Item = (&'a str, u64)>, limit: u32) -> Vec<String> {
    let mut best: HashMap<&str, u64> = HashMap::new();
    for (value, score) in entries {
        let slot = best.entry(value).or_insert(score);
        *slot = (*slot).max(score);
    }

    let mut ranked: Vec<(&str, u64)> = best.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(limit as usize)
        .map(|(value, _)| value.to_string())
        .collect()
}

impl CatalogStore for MockCatalog {
    fn count_resources(&self, filter: &ResourceFilter) -> Result<u64, CatalogError> {
        self.check()?;
        let state = self.state.lock().unwrap();
        Ok(state.matching(filter).count() as u64)
    }

    fn find_resources(
        &self,
        filter: &ResourceFilter,
        sort: SortMode,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<ListedResource>, CatalogError> {
        self.check()?;
        let state = self.state.lock().unwrap();

        let mut found: Vec<&Resource> = state.matching(filter).collect();
        found.sort_by(|a, b| sort.compare(a, b));

        Ok(found
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|r| ListedResource {
                resource: r.clone(),
                category_label: state
                    .category(r.category_id)
                    .map(|c| c.label.clone())
                    .unwrap_or_default(),
            })
            .collect())
    }

    fn get_resource(&self, id: &str) -> Result<Resource, CatalogError> {
        self.check()?;
        self.resource(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    fn active_categories(&self) -> Result<Vec<Category>, CatalogError> {
        self.check()?;
        let state = self.state.lock().unwrap();
        let mut active: Vec<Category> = state
            .categories
            .iter()
            .filter(|c| c.is_active)
            .cloned()
            .collect();
        active.sort_by_key(|c| (c.sort_order, c.id));
        Ok(active)
    }

    fn count_valid_in_category(&self, category_id: i64) -> Result<u64, CatalogError> {
        self.check()?;
        let state = self.state.lock().unwrap();
        Ok(state
            .resources
            .iter()
            .filter(|r| r.valid && r.category_id == category_id)
            .count() as u64)
    }

    fn keywords_with_prefix(&self, prefix: &str, limit: u32) -> Result<Vec<String>, CatalogError> {
        self.check()?;
        let state = self.state.lock().unwrap();
        Ok(ranked_distinct(
            state
                .search_records
                .iter()
                .filter(|r| r.keyword.starts_with(prefix))
                .map(|r| (r.keyword.as_str(), r.result_count)),
            limit,
        ))
    }

    fn titles_containing(&self, fragment: &str, limit: u32) -> Result<Vec<String>, CatalogError> {
        self.check()?;
        let state = self.state.lock().unwrap();
        Ok(ranked_distinct(
            state
                .resources
                .iter()
                .filter(|r| r.valid && r.title.contains(fragment))
                .map(|r| (r.title.as_str(), r.view_count)),
            limit,
        ))
    }

    fn record_download(&self, record: &DownloadRecord) -> Result<(), CatalogError> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        let resource = state
            .resources
            .iter_mut()
            .find(|r| r.id == record.resource_id)
            .ok_or_else(|| CatalogError::NotFound(record.resource_id.clone()))?;
        resource.download_count += 1;
        state.downloads.push(record.clone());
        Ok(())
    }

    fn insert_search_record(&self, record: &SearchRecord) -> Result<(), CatalogError> {
        self.check()?;
        self.state
            .lock()
            .unwrap()
            .search_records
            .push(record.clone());
        Ok(())
    }

    fn insert_help_request(&self, request: &HelpRequest) -> Result<(), CatalogError> {
        self.check()?;
        self.state
            .lock()
            .unwrap()
            .help_requests
            .push(request.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_failure_injection() {
        let catalog = MockCatalog::new();
        catalog.add_resource(fixtures::resource("r1", "Doc", 1));

        catalog.set_failing(true);
        assert!(matches!(
            catalog.get_resource("r1"),
            Err(CatalogError::Database(_))
        ));

        catalog.set_failing(false);
        assert!(catalog.get_resource("r1").is_ok());
    }

    #[test]
    fn test_category_label_joined() {
        let catalog = MockCatalog::new();
        let docs = catalog.add_category(NewCategory::new("document", "Documents", 1));
        catalog.add_resource(fixtures::resource("r1", "Doc", docs.id));
        catalog.add_resource(fixtures::resource("r2", "Orphan", 99));

        let listed = catalog
            .find_resources(&ResourceFilter::valid_only(), SortMode::Relevance, 0, 10)
            .unwrap();
        assert_eq!(listed[0].category_label, "Documents");
        assert_eq!(listed[1].category_label, "");
    }

    #[test]
    fn test_ranked_distinct_uses_max_score() {
        let ranked = ranked_distinct(
            [("a", 1), ("b", 5), ("a", 9), ("c", 5)].into_iter(),
            10,
        );
        assert_eq!(ranked, vec!["a", "b", "c"]);
    }
}

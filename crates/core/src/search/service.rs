//! Request-level entry points of the search engine.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{PageRequest, Pagination, ResourceFilter, SortMode, SuggestionEngine};
use crate::catalog::{CatalogError, CatalogStore, Category, ListedResource, SearchRecord};
use crate::config::SearchConfig;
use crate::metrics;
use crate::telemetry::SearchTelemetry;

/// Raw search parameters as received from a client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub category: Option<String>,
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Who issued a request, for logging purposes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClientInfo {
    pub ip_address: String,
    pub user_agent: String,
}

/// One page of search results.
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub list: Vec<ListedResource>,
    pub pagination: Pagination,
    pub sort: SortMode,
}

/// Entry of the hot list. `rank` starts at 1.
#[derive(Debug, Clone)]
pub struct HotResource {
    pub rank: u32,
    pub listed: ListedResource,
}

/// Active category with its live count of valid resources.
#[derive(Debug, Clone)]
pub struct CategorySummary {
    pub category: Category,
    pub count: u64,
}

/// Search, hot list, category browsing and suggestions over one catalog.
pub struct SearchService {
    store: Arc<dyn CatalogStore>,
    telemetry: SearchTelemetry,
    suggestions: SuggestionEngine,
    config: SearchConfig,
}

impl SearchService {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        telemetry: SearchTelemetry,
        config: SearchConfig,
    ) -> Self {
        let suggestions =
            SuggestionEngine::new(Arc::clone(&store), config.suggestion_suffixes.clone());
        Self {
            store,
            telemetry,
            suggestions,
            config,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run a search and enqueue its log record.
    ///
    /// The log record is handed to telemetry after the page is assembled;
    /// telemetry problems never affect the result.
    pub fn search(
        &self,
        request: &SearchRequest,
        client: &ClientInfo,
    ) -> Result<SearchPage, CatalogError> {
        let filter = ResourceFilter::from_request(&request.query, request.category.as_deref());
        let sort = SortMode::parse(request.sort.as_deref());
        let page = PageRequest::new(
            request.page,
            request.page_size,
            self.config.default_page_size,
            self.config.max_page_size,
        );

        let total = self.store.count_resources(&filter)?;
        let list = if page.offset() < total {
            self.store
                .find_resources(&filter, sort, page.offset(), page.limit())?
        } else {
            Vec::new()
        };

        metrics::SEARCHES_TOTAL
            .with_label_values(&[sort.as_str()])
            .inc();
        metrics::SEARCH_RESULTS.observe(total as f64);

        tracing::debug!(
            query = %request.query,
            sort = %sort,
            page = page.page,
            total,
            returned = list.len(),
            "Search executed"
        );

        self.telemetry.try_record(SearchRecord {
            keyword: request.query.clone(),
            category: request.category.clone().unwrap_or_default(),
            sort_by: sort.as_str().to_string(),
            user_id: String::new(),
            ip_address: client.ip_address.clone(),
            user_agent: client.user_agent.clone(),
            result_count: total,
            search_time: Utc::now(),
        });

        Ok(SearchPage {
            list,
            pagination: page.pagination(total),
            sort,
        })
    }

    /// Effective hot list size: missing or non-positive means the default,
    /// anything above the maximum is capped.
    pub fn hot_limit(&self, limit: Option<i64>) -> u32 {
        match limit {
            Some(l) if l > 0 => l.min(self.config.hot_max_limit as i64) as u32,
            _ => self.config.hot_default_limit.min(self.config.hot_max_limit),
        }
    }

    /// Most viewed valid resources, ranked from 1.
    pub fn hot(&self, limit: Option<i64>) -> Result<Vec<HotResource>, CatalogError> {
        let limit = self.hot_limit(limit);
        let listed = self.store.find_resources(
            &ResourceFilter::valid_only(),
            SortMode::Relevance,
            0,
            limit,
        )?;

        Ok(listed
            .into_iter()
            .enumerate()
            .map(|(i, listed)| HotResource {
                rank: i as u32 + 1,
                listed,
            })
            .collect())
    }

    /// Active categories in display order with their valid resource counts.
    ///
    /// Counts are read one category at a time and may lag concurrent writes.
    pub fn categories(&self) -> Result<Vec<CategorySummary>, CatalogError> {
        let categories = self.store.active_categories()?;

        let mut summaries = Vec::with_capacity(categories.len());
        for category in categories {
            let count = self.store.count_valid_in_category(category.id)?;
            summaries.push(CategorySummary { category, count });
        }
        Ok(summaries)
    }

    pub fn suggest(&self, query: &str) -> Result<Vec<String>, CatalogError> {
        self.suggestions.suggest(query)
    }
}

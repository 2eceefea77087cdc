//! Resource catalog - the persistent store behind search, browsing and
//! download logging.
//!
//! The engine never holds a connection of its own; every component receives
//! an `Arc<dyn CatalogStore>` and issues one synchronous call per read or
//! write.

mod sqlite;
mod types;

pub use sqlite::SqliteCatalog;
pub use types::*;

use crate::search::{ResourceFilter, SortMode};

/// Trait for resource catalog storage.
pub trait CatalogStore: Send + Sync {
    /// Count resources matching the filter.
    fn count_resources(&self, filter: &ResourceFilter) -> Result<u64, CatalogError>;

    /// Fetch one page of matching resources in the given order, with category labels.
    fn find_resources(
        &self,
        filter: &ResourceFilter,
        sort: SortMode,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<ListedResource>, CatalogError>;

    /// Get a resource by id, valid or not.
    fn get_resource(&self, id: &str) -> Result<Resource, CatalogError>;

    /// Active categories ordered by sort order ascending.
    fn active_categories(&self) -> Result<Vec<Category>, CatalogError>;

    /// Number of valid resources in a category.
    fn count_valid_in_category(&self, category_id: i64) -> Result<u64, CatalogError>;

    /// Distinct past search keywords starting with `prefix`, highest result
    /// count first.
    fn keywords_with_prefix(&self, prefix: &str, limit: u32) -> Result<Vec<String>, CatalogError>;

    /// Distinct titles of valid resources containing `fragment`, most viewed first.
    fn titles_containing(&self, fragment: &str, limit: u32) -> Result<Vec<String>, CatalogError>;

    /// Persist a download event and add one to the resource's download
    /// counter, both or neither.
    ///
    /// Returns `NotFound` if `record.resource_id` names no resource, in which
    /// case nothing is written.
    fn record_download(&self, record: &DownloadRecord) -> Result<(), CatalogError>;

    /// Persist a search log entry.
    fn insert_search_record(&self, record: &SearchRecord) -> Result<(), CatalogError>;

    /// Persist a new help request.
    fn insert_help_request(&self, request: &HelpRequest) -> Result<(), CatalogError>;
}

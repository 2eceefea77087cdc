//! Testing utilities and an in-memory catalog.
//!
//! This module provides a mock implementation of the catalog store trait,
//! allowing engine and HTTP tests without a database.
//!
//! # Example
//!
//! ```rust,ignore
//! use pansearch_core::testing::{fixtures, MockCatalog};
//!
//! let catalog = MockCatalog::new();
//! catalog.add_search_record(fixtures::search_record("movies 2024", 12));
//!
//! // Use in a SearchService or AppState...
//! ```

mod mock_catalog;

pub use mock_catalog::MockCatalog;

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::Utc;

    use crate::catalog::{Resource, SearchRecord};

    /// Create a valid resource with reasonable defaults.
    pub fn resource(id: &str, title: &str, category_id: i64) -> Resource {
        let mut resource = Resource::new(
            id,
            title,
            category_id,
            format!("https://pan.example.com/s/{}", id),
        );
        resource.size = "1.2GB".to_string();
        resource.resource_type = "archive".to_string();
        resource.source = "Example Pan".to_string();
        resource
    }

    /// Create a past search for `keyword` that matched `result_count` resources.
    pub fn search_record(keyword: &str, result_count: u64) -> SearchRecord {
        SearchRecord {
            keyword: keyword.to_string(),
            category: String::new(),
            sort_by: "relevance".to_string(),
            user_id: String::new(),
            ip_address: "127.0.0.1".to_string(),
            user_agent: "test-agent".to_string(),
            result_count,
            search_time: Utc::now(),
        }
    }
}

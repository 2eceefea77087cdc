//! Search and ranking engine.
//!
//! A search request flows through [`ResourceFilter`] (what matches),
//! [`SortMode`] (in which order) and [`PageRequest`] (which slice), and is
//! answered by [`SearchService`]. Query completions come from
//! [`SuggestionEngine`].

mod pagination;
mod query;
mod ranking;
mod service;
mod suggest;

pub use pagination::{total_pages, PageRequest, Pagination};
pub use query::{escape_like, ResourceFilter, ALL_CATEGORIES};
pub use ranking::SortMode;
pub use service::{
    CategorySummary, ClientInfo, HotResource, SearchPage, SearchRequest, SearchService,
};
pub use suggest::{SuggestionEngine, MAX_SUGGESTIONS};

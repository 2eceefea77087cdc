//! Sort orders for resource listings.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::Resource;

/// How a result list is ordered.
///
/// Every mode ends with `id ASC` so equal keys paginate deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Views desc, then downloads desc.
    #[default]
    Relevance,
    /// Upload time desc.
    Time,
    /// Stored size string desc. The size is a display string ("1.2GB"), so
    /// this is a lexicographic order, not a byte-count order.
    Size,
}

impl SortMode {
    /// Parse the `sort` parameter; anything unrecognised is `Relevance`.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("time") => SortMode::Time,
            Some("size") => SortMode::Size,
            _ => SortMode::Relevance,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Relevance => "relevance",
            SortMode::Time => "time",
            SortMode::Size => "size",
        }
    }

    /// Total order used by in-memory stores. Mirrors the SQL `ORDER BY`.
    pub fn compare(&self, a: &Resource, b: &Resource) -> Ordering {
        let primary = match self {
            SortMode::Relevance => b
                .view_count
                .cmp(&a.view_count)
                .then_with(|| b.download_count.cmp(&a.download_count)),
            SortMode::Time => b.upload_time.cmp(&a.upload_time),
            SortMode::Size => b.size.as_bytes().cmp(a.size.as_bytes()),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

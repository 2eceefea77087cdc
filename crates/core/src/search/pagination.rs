//! Page arithmetic for paginated listings.

use serde::{Deserialize, Serialize};

/// Effective page selection after defaults and clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Normalise raw request values.
    ///
    /// `page <= 0` becomes 1, `page_size <= 0` becomes `default_size`, and
    /// `page_size` never exceeds `max_size`.
    pub fn new(page: Option<i64>, page_size: Option<i64>, default_size: u32, max_size: u32) -> Self {
        let page = match page {
            Some(p) if p > 0 => p.min(u32::MAX as i64) as u32,
            _ => 1,
        };

        let page_size = match page_size {
            Some(s) if s > 0 => s.min(max_size as i64) as u32,
            _ => default_size.min(max_size),
        };

        Self { page, page_size }
    }

    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }

    pub fn limit(&self) -> u32 {
        self.page_size
    }

    /// Metadata for a listing with `total` matches.
    pub fn pagination(&self, total: u64) -> Pagination {
        Pagination {
            page: self.page,
            page_size: self.page_size,
            total,
            total_pages: total_pages(total, self.page_size),
        }
    }
}

/// `ceil(total / page_size)`; zero for an empty listing.
pub fn total_pages(total: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    let size = page_size as u64;
    total / size + u64::from(total % size > 0)
}

/// Pagination block of a paginated response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u64,
}

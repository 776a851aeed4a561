//! Pagination types for list queries.

use serde::{Deserialize, Serialize};

/// Page size used when the caller supplies none (or a non-positive one).
pub const DEFAULT_LIMIT: i64 = 10;

/// Pagination request block embedded in every entity filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaginationParam {
    /// Page number (1-based). Values below 1 are treated as 1.
    pub page: i64,
    /// Number of items per page. Values below 1 are treated as [`DEFAULT_LIMIT`].
    pub limit: i64,
    /// Sort descriptors: `"column"` ascending, `"-column"` descending.
    pub sort_by: Vec<String>,
    /// Columns to group by.
    pub group_by: Vec<String>,
    /// Whether the caller wants `total_elements` computed.
    pub include_pagination: bool,
    /// Return every matching row instead of a single page.
    pub disable_limit: bool,
}

impl PaginationParam {
    /// Returns the effective page number.
    pub fn effective_page(&self) -> i64 {
        self.page.max(1)
    }

    /// Returns the effective page size.
    pub fn effective_limit(&self) -> i64 {
        if self.limit < 1 {
            DEFAULT_LIMIT
        } else {
            self.limit
        }
    }

    /// Calculate the SQL `OFFSET` value, or `None` when it does not fit in an `i64`.
    pub fn offset(&self) -> Option<i64> {
        (self.effective_page() - 1).checked_mul(self.effective_limit())
    }
}

/// Pagination metadata returned alongside a list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page number (1-based).
    pub current_page: i64,
    /// Number of rows actually returned on this page.
    pub current_elements: i64,
    /// Total number of pages, never below 1.
    pub total_pages: i64,
    /// Total number of matching rows; only computed when requested.
    pub total_elements: i64,
    /// Sort descriptors applied to the query.
    pub sort_by: Vec<String>,
}

impl Pagination {
    /// Create pagination metadata for a page that returned `current_elements` rows.
    pub fn new(param: &PaginationParam, current_elements: usize) -> Self {
        Self {
            current_page: param.page,
            current_elements: current_elements as i64,
            total_pages: 0,
            total_elements: 0,
            sort_by: param.sort_by.clone(),
        }
    }

    /// Derive `current_page` and `total_pages` from `total_elements`.
    pub fn process(&mut self, limit: i64) {
        if self.current_page < 1 {
            self.current_page = 1;
        }

        let limit = if limit < 1 { DEFAULT_LIMIT } else { limit };

        let mut total_pages = self.total_elements / limit;
        if self.total_elements % limit > 0 || self.total_elements == 0 {
            total_pages += 1;
        }

        self.total_pages = total_pages.max(1);
    }
}

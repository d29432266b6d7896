use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, bad_request};

// Paging defaults shared by every listing endpoint.
pub const DEFAULT_PAGE_NUMBER: i64 = 0;
pub const DEFAULT_PAGE_SIZE: i64 = 30;
pub const MAX_PAGE_SIZE: i64 = 30;

/// PageParams
///
/// Defines the accepted query parameters for every paginated listing endpoint
/// (`?page=<n>&size=<m>`). Used by Axum's Query extractor to safely bind HTTP
/// query parameters; omitted values fall back to the application defaults.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PageParams {
    /// Zero-based page index.
    #[serde(default = "default_page_number")]
    pub page: i64,
    /// Number of records per page, capped at 30.
    #[serde(default = "default_page_size")]
    pub size: i64,
}

fn default_page_number() -> i64 {
    DEFAULT_PAGE_NUMBER
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageParams {
    /// validate
    ///
    /// Enforces the pagination invariant before any query runs: page must be
    /// non-negative and size must lie in [1, MAX_PAGE_SIZE].
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.page < 0 {
            return Err(bad_request("Page number cannot be less than zero."));
        }
        if self.size < 1 {
            return Err(bad_request("Page size cannot be less than one."));
        }
        if self.size > MAX_PAGE_SIZE {
            return Err(bad_request(format!(
                "Page size must not be greater than {}.",
                MAX_PAGE_SIZE
            )));
        }
        Ok(())
    }

    /// SQL LIMIT value for this page.
    pub fn limit(&self) -> i64 {
        self.size
    }

    /// SQL OFFSET value for this page.
    pub fn offset(&self) -> i64 {
        self.page * self.size
    }
}

/// PagedResponse
///
/// The envelope returned by all listing endpoints: one page slice plus the
/// metadata a client needs to drive pagination controls.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PagedResponse<T> {
    pub content: Vec<T>,
    pub page: i64,
    pub size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
    pub last: bool,
}

impl<T> PagedResponse<T> {
    /// new
    ///
    /// Wraps a page slice with derived metadata. `total_pages` is the ceiling
    /// of `total_elements / size`; an empty result set yields zero pages and
    /// is reported as the last page.
    pub fn new(content: Vec<T>, params: &PageParams, total_elements: i64) -> Self {
        let total_pages = if total_elements == 0 {
            0
        } else {
            (total_elements + params.size - 1) / params.size
        };

        Self {
            content,
            page: params.page,
            size: params.size,
            total_elements,
            total_pages,
            last: params.page + 1 >= total_pages,
        }
    }
}

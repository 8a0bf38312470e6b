//! Pagination configuration and page-request helpers

use crate::resource::Filters;
use serde::{Deserialize, Serialize};

/// Page size used when none is configured
pub const DEFAULT_PAGE_SIZE: u64 = 50;

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

/// How a full collection is fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Records requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u64,

    /// Cap on in-flight page requests after the probe. `None` is unbounded.
    #[serde(default)]
    pub max_concurrency: Option<usize>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_concurrency: None,
        }
    }
}

impl PaginationConfig {
    pub fn new(page_size: u64) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(limit);
        self
    }

    /// This config with the page size replaced, if one is given
    #[must_use]
    pub fn with_page_size(mut self, page_size: Option<u64>) -> Self {
        if let Some(size) = page_size {
            self.page_size = size;
        }
        self
    }
}

/// Number of pages needed to cover `total` records
pub fn total_pages(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Filters for the first request.
///
/// Caller filters are laid over the paging keys, so a caller-supplied
/// `length`, `offset` or `withTotal` wins.
pub fn probe_filters(filters: &Filters, page_size: u64) -> Filters {
    Filters::empty()
        .length(page_size)
        .offset(0)
        .with_total(true)
        .merge(filters)
}

/// Filters for page `page` (zero-based) after the probe.
///
/// The paging keys are laid over the caller filters.
pub fn remainder_filters(filters: &Filters, page_size: u64, page: u64) -> Filters {
    filters
        .clone()
        .length(page_size)
        .offset(page * page_size)
        .with_total(false)
}

//! Pagination module
//!
//! Fetches every page of an offset/length paginated collection.
//!
//! # Overview
//!
//! A probe page is requested with `withTotal: true` to learn the item count.
//! The remaining pages are then requested concurrently with `withTotal: false`
//! and stitched together in page order, whatever order they complete in.

mod aggregator;
mod types;

pub use aggregator::{fetch_all_pages, try_fetch_all_pages};
pub use types::{
    probe_filters, remainder_filters, total_pages, PaginationConfig, DEFAULT_PAGE_SIZE,
};

//! Probe-then-fan-out page aggregation

use super::types::{probe_filters, remainder_filters, total_pages, PaginationConfig};
use crate::error::{Error, Result};
use crate::resource::{Filters, ListResponse};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::future::Future;
use tracing::{debug, error};

/// Fetch every record of a paginated collection.
///
/// Requests one probe page with `withTotal: true`, then every remaining page
/// at once (or at most `max_concurrency` at a time). Records come back in
/// page order: probe data first, then pages `1..n` as declared.
///
/// Any failure fails the whole call. See [`fetch_all_pages`] for the variant
/// that degrades to an empty result.
pub async fn try_fetch_all_pages<M, F, Fut>(
    fetch: F,
    filters: Filters,
    config: &PaginationConfig,
) -> Result<Vec<M>>
where
    F: Fn(Filters) -> Fut,
    Fut: Future<Output = Result<ListResponse<M>>>,
{
    let page_size = config.page_size;
    if page_size == 0 {
        return Err(Error::invalid_value("page_size", "must be greater than zero"));
    }

    let probe = fetch(probe_filters(&filters, page_size)).await?;
    let total = probe.total_or_zero();
    let pages = total_pages(total, page_size);
    debug!(total, pages, page_size, "Fetched probe page");

    let mut records = probe.data;
    if pages <= 1 {
        return Ok(records);
    }

    let requests = (1..pages).map(|page| fetch(remainder_filters(&filters, page_size, page)));
    let remainder: Vec<ListResponse<M>> = match config.max_concurrency {
        Some(limit) => {
            stream::iter(requests)
                .buffered(limit.max(1))
                .try_collect()
                .await?
        }
        None => futures::future::try_join_all(requests).await?,
    };

    for page in remainder {
        records.extend(page.data);
    }
    Ok(records)
}

/// Fetch every record of a paginated collection, or nothing.
///
/// Same as [`try_fetch_all_pages`], but a failure is logged and turned into
/// an empty result. Callers cannot tell "empty" from "failed".
pub async fn fetch_all_pages<M, F, Fut>(
    fetch: F,
    filters: Filters,
    config: &PaginationConfig,
) -> Vec<M>
where
    F: Fn(Filters) -> Fut,
    Fut: Future<Output = Result<ListResponse<M>>>,
{
    match try_fetch_all_pages(fetch, filters, config).await {
        Ok(records) => records,
        Err(e) => {
            error!(error = %e, page_size = config.page_size, "Failed to fetch all pages");
            Vec::new()
        }
    }
}

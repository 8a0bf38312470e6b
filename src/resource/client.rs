//! Typed CRUD client for one REST resource

use super::capabilities::ResourceCapabilities;
use super::normalize::overlay;
use super::types::{Created, Filters, GetOptions, ListResponse, Payload};
use crate::endpoint::EndpointResolver;
use crate::error::{Error, Result};
use crate::http::{CacheOptions, Transport};
use crate::pagination::{fetch_all_pages, try_fetch_all_pages, PaginationConfig};
use crate::types::{JsonValue, QueryPairs};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Client for a REST collection of `T` records.
///
/// Every call resolves its URL at call time, so a base endpoint that is still
/// being discovered is awaited rather than read early.
///
/// # Example
///
/// ```ignore
/// let client = ResourceClient::new("/api/orders", capabilities, Order::default());
/// let page = client.index(Filters::default()).await?;
/// let order = client.get("42").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ResourceClient<T> {
    endpoints: EndpointResolver,
    capabilities: ResourceCapabilities,
    defaults: T,
    pagination: PaginationConfig,
}

impl<T> ResourceClient<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Create a client.
    ///
    /// `defaults` fills in any field a fetched record leaves out.
    pub fn new(
        endpoints: impl Into<EndpointResolver>,
        capabilities: ResourceCapabilities,
        defaults: T,
    ) -> Self {
        Self {
            endpoints: endpoints.into(),
            capabilities,
            defaults,
            pagination: PaginationConfig::default(),
        }
    }

    /// Set the page size and concurrency used by the all-pages helpers
    #[must_use]
    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn endpoints(&self) -> &EndpointResolver {
        &self.endpoints
    }

    pub fn capabilities(&self) -> &ResourceCapabilities {
        &self.capabilities
    }

    pub fn pagination(&self) -> &PaginationConfig {
        &self.pagination
    }

    /// The defaults record applied by [`get`](Self::get)
    pub fn defaults(&self) -> &T {
        &self.defaults
    }

    pub fn set_defaults(&mut self, defaults: T) {
        self.defaults = defaults;
    }

    /// The authenticated transport
    pub fn transport(&self) -> Arc<dyn Transport> {
        self.capabilities.transport()
    }

    /// The unauthenticated transport
    pub fn raw_transport(&self) -> Arc<dyn Transport> {
        self.capabilities.raw_transport()
    }

    // ========================================================================
    // CRUD
    // ========================================================================

    /// Fetch one page of the collection.
    ///
    /// Filters go through the filter normalizer and query serializer, the
    /// response through the list normalizer, and each record through the
    /// item normalizer. Page metadata is kept as the server sent it.
    pub async fn index(&self, filters: Filters) -> Result<ListResponse<T>> {
        let url = self.endpoints.resolve_base().await?;
        self.index_at(&url, filters).await
    }

    /// Fetch one page of a related collection at `url`.
    ///
    /// Uses this client's transport and normalizers, but deserializes the
    /// records as `M` and applies no defaults.
    pub async fn index_at<M>(&self, url: &str, filters: Filters) -> Result<ListResponse<M>>
    where
        M: DeserializeOwned,
    {
        let query = self.capabilities.query(filters);
        debug!(url = %url, params = query.len(), "Listing resource");

        let response = self.transport().get(url, &query).await?;
        let mut page = self.capabilities.normalize_list(response)?;
        let records = std::mem::take(&mut page.data);
        let data = self.get_normalized_list(records)?;
        Ok(page.with_data(data))
    }

    /// Fetch one page of a named extension endpoint
    pub async fn index_named<M>(&self, name: &str, filters: Filters) -> Result<ListResponse<M>>
    where
        M: DeserializeOwned,
    {
        let url = self.endpoints.resolve(name).await?;
        self.index_at(&url, filters).await
    }

    /// Fetch one record, served from the cache when a fresh copy exists
    pub async fn get(&self, id: &str) -> Result<T> {
        self.get_with_options(id, GetOptions::default()).await
    }

    /// Fetch one record.
    ///
    /// The response goes through the item normalizer and is then laid over
    /// the defaults record.
    pub async fn get_with_options(&self, id: &str, options: GetOptions) -> Result<T> {
        let url = self.endpoints.resolve_by_id(id).await?;
        let transport = self.transport();
        let no_query = QueryPairs::new();

        debug!(url = %url, use_cache = options.use_cache, "Fetching resource");
        let response = if options.use_cache {
            transport
                .get_cached(&url, &no_query, CacheOptions::new(options.ttl))
                .await?
        } else {
            transport.get(&url, &no_query).await?
        };

        let record = self.capabilities.normalize_item(response);
        self.normalize(record, &self.defaults)
    }

    /// Create a record and return the id the server assigned
    pub async fn create<'a>(&self, data: impl Into<Payload<'a, T>>) -> Result<i64>
    where
        T: 'a,
    {
        let payload: Payload<'a, T> = data.into();
        let body = payload.into_body()?;
        let url = self.endpoints.resolve_base().await?;

        debug!(url = %url, "Creating resource");
        let response = self.transport().post(&url, body).await?;
        let created: Created = serde_json::from_value(response)
            .map_err(|e| Error::decode(format!("create response has no numeric id: {e}")))?;
        Ok(created.id)
    }

    /// Replace the record with `id`
    pub async fn update<'a>(&self, id: &str, data: impl Into<Payload<'a, T>>) -> Result<()>
    where
        T: 'a,
    {
        let payload: Payload<'a, T> = data.into();
        let body = payload.into_body()?;
        let url = self.endpoints.resolve_by_id(id).await?;

        debug!(url = %url, "Updating resource");
        self.transport().put(&url, body).await
    }

    /// Delete the record with `id`
    pub async fn delete(&self, id: &str) -> Result<()> {
        let url = self.endpoints.resolve_by_id(id).await?;

        debug!(url = %url, "Deleting resource");
        self.transport().delete(&url).await
    }

    // ========================================================================
    // Normalization
    // ========================================================================

    /// Run the item normalizer over each raw record, in order
    pub fn get_normalized_list<M>(&self, records: Vec<JsonValue>) -> Result<Vec<M>>
    where
        M: DeserializeOwned,
    {
        records
            .into_iter()
            .map(|record| Ok(serde_json::from_value(self.capabilities.normalize_item(record))?))
            .collect()
    }

    /// Lay a fetched record over `defaults`.
    ///
    /// Fetched keys win, `null` values included. Nested objects are replaced,
    /// not merged.
    pub fn normalize(&self, response: JsonValue, defaults: &T) -> Result<T> {
        let defaults = serde_json::to_value(defaults)?;
        Ok(serde_json::from_value(overlay(defaults, response))?)
    }

    // ========================================================================
    // All pages
    // ========================================================================

    /// Every record of the collection, or an empty list if any page fails.
    ///
    /// `page_size` overrides the configured page size for this call.
    ///
    /// Pass [`Filters::empty`], not [`Filters::default`]. A `length` in
    /// `filters` wins on the first page only, while later pages still start
    /// at multiples of the page size, so the records in between are skipped.
    /// `Filters::default()` carries `length: 10`.
    pub async fn get_all_pages_base_list(
        &self,
        filters: Filters,
        page_size: Option<u64>,
    ) -> Vec<T> {
        let config = self.pagination.with_page_size(page_size);
        fetch_all_pages(|f| self.index(f), filters, &config).await
    }

    /// Every record of the collection, failing if any page fails.
    ///
    /// Same `filters` caveat as [`get_all_pages_base_list`](Self::get_all_pages_base_list).
    pub async fn try_get_all_pages_base_list(
        &self,
        filters: Filters,
        page_size: Option<u64>,
    ) -> Result<Vec<T>> {
        let config = self.pagination.with_page_size(page_size);
        try_fetch_all_pages(|f| self.index(f), filters, &config).await
    }

    /// Every record reachable through `fetch`, or an empty list if any page
    /// fails.
    ///
    /// `fetch` is any single-page list call, typically [`index_at`](Self::index_at)
    /// on a related collection.
    pub async fn get_all_pages<M, F, Fut>(
        &self,
        fetch: F,
        filters: Filters,
        page_size: Option<u64>,
    ) -> Vec<M>
    where
        F: Fn(Filters) -> Fut,
        Fut: Future<Output = Result<ListResponse<M>>>,
    {
        let config = self.pagination.with_page_size(page_size);
        fetch_all_pages(fetch, filters, &config).await
    }
}

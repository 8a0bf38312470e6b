//! Pluggable behavior of a resource client
//!
//! A [`ResourceClient`](super::ResourceClient) never talks to the network or
//! reshapes data by itself. It asks its [`ResourceCapabilities`] for:
//! - the authenticated transport
//! - the raw (unauthenticated) transport
//! - the query serializer
//! - the list, filter and item normalizers
//!
//! The normalizers default to pass-through.

use super::types::{Filters, ListResponse};
use crate::error::{Error, Result};
use crate::http::{HttpClient, QuerySerializer, Transport};
use crate::types::{JsonObject, JsonValue, QueryPairs};
use std::sync::Arc;

/// Produces a transport on demand
pub type TransportFactory = Arc<dyn Fn() -> Arc<dyn Transport> + Send + Sync>;
/// Turns a raw list response into a page envelope
pub type ListNormalizer =
    Arc<dyn Fn(JsonValue) -> Result<ListResponse<JsonValue>> + Send + Sync>;
/// Turns filters into outgoing query parameters
pub type FilterNormalizer = Arc<dyn Fn(Filters) -> JsonObject + Send + Sync>;
/// Reshapes a single raw record
pub type ItemNormalizer = Arc<dyn Fn(JsonValue) -> JsonValue + Send + Sync>;

/// The transports and normalizers a resource client runs on
#[derive(Clone)]
pub struct ResourceCapabilities {
    transport: TransportFactory,
    raw_transport: TransportFactory,
    query_serializer: QuerySerializer,
    normalize_list: ListNormalizer,
    normalize_filters: FilterNormalizer,
    normalize_item: ItemNormalizer,
}

impl ResourceCapabilities {
    /// Create capabilities from two transport factories
    pub fn new<A, R>(transport: A, raw_transport: R) -> Self
    where
        A: Fn() -> Arc<dyn Transport> + Send + Sync + 'static,
        R: Fn() -> Arc<dyn Transport> + Send + Sync + 'static,
    {
        Self {
            transport: Arc::new(transport),
            raw_transport: Arc::new(raw_transport),
            query_serializer: QuerySerializer::default(),
            normalize_list: Arc::new(default_list_normalizer),
            normalize_filters: Arc::new(Filters::into_object),
            normalize_item: Arc::new(|item| item),
        }
    }

    /// Create capabilities that always hand out the same two transports
    pub fn from_transports(
        transport: Arc<dyn Transport>,
        raw_transport: Arc<dyn Transport>,
    ) -> Self {
        Self::new(move || transport.clone(), move || raw_transport.clone())
    }

    /// Use `client` for authenticated calls and an unauthenticated copy of it
    /// for raw calls
    pub fn from_http_client(client: HttpClient) -> Self {
        let raw: Arc<dyn Transport> = Arc::new(client.without_auth());
        Self::from_transports(Arc::new(client), raw)
    }

    #[must_use]
    pub fn with_query_serializer(mut self, serializer: QuerySerializer) -> Self {
        self.query_serializer = serializer;
        self
    }

    #[must_use]
    pub fn with_list_normalizer<F>(mut self, f: F) -> Self
    where
        F: Fn(JsonValue) -> Result<ListResponse<JsonValue>> + Send + Sync + 'static,
    {
        self.normalize_list = Arc::new(f);
        self
    }

    #[must_use]
    pub fn with_filter_normalizer<F>(mut self, f: F) -> Self
    where
        F: Fn(Filters) -> JsonObject + Send + Sync + 'static,
    {
        self.normalize_filters = Arc::new(f);
        self
    }

    #[must_use]
    pub fn with_item_normalizer<F>(mut self, f: F) -> Self
    where
        F: Fn(JsonValue) -> JsonValue + Send + Sync + 'static,
    {
        self.normalize_item = Arc::new(f);
        self
    }

    /// The authenticated transport
    pub fn transport(&self) -> Arc<dyn Transport> {
        (self.transport)()
    }

    /// The unauthenticated transport
    pub fn raw_transport(&self) -> Arc<dyn Transport> {
        (self.raw_transport)()
    }

    pub fn query_serializer(&self) -> &QuerySerializer {
        &self.query_serializer
    }

    pub fn normalize_list(&self, response: JsonValue) -> Result<ListResponse<JsonValue>> {
        (self.normalize_list)(response)
    }

    pub fn normalize_item(&self, item: JsonValue) -> JsonValue {
        (self.normalize_item)(item)
    }

    /// Run the filter normalizer, then serialize the result
    pub fn query(&self, filters: Filters) -> QueryPairs {
        let params = (self.normalize_filters)(filters);
        self.query_serializer.serialize(&params)
    }
}

impl std::fmt::Debug for ResourceCapabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceCapabilities")
            .field("query_serializer", &self.query_serializer)
            .finish_non_exhaustive()
    }
}

/// Accepts either a bare array of records or a page envelope object
pub fn default_list_normalizer(response: JsonValue) -> Result<ListResponse<JsonValue>> {
    match response {
        JsonValue::Array(records) => Ok(ListResponse::new(records)),
        JsonValue::Object(_) => Ok(serde_json::from_value(response)?),
        other => Err(Error::decode(format!(
            "expected a list envelope or an array, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

//! Resource-level types: list envelopes, filters and per-call options

use crate::error::Result;
use crate::http::{Body, FormData};
use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

/// Filter key carrying the page size
pub const LENGTH_KEY: &str = "length";
/// Filter key carrying the starting offset
pub const OFFSET_KEY: &str = "offset";
/// Filter key asking the server to include a total count
pub const WITH_TOTAL_KEY: &str = "withTotal";
/// Page size used by [`Filters::default`]
pub const DEFAULT_INDEX_LENGTH: u64 = 10;
/// Freshness window for cached single-item reads
pub const DEFAULT_GET_TTL: Duration = Duration::from_millis(1000);

// ============================================================================
// List envelope
// ============================================================================

/// One page of a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    /// Records on this page
    #[serde(default)]
    pub data: Vec<T>,

    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,

    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,

    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,

    /// Total number of records across all pages, when the server reports it
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,

    /// Any other envelope fields, passed through untouched
    #[serde(flatten)]
    pub extensions: JsonObject,
}

impl<T> Default for ListResponse<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> ListResponse<T> {
    /// Create a page holding `data` and no metadata
    pub fn new(data: Vec<T>) -> Self {
        Self {
            data,
            offset: None,
            page: None,
            length: None,
            total: None,
            extensions: JsonObject::new(),
        }
    }

    /// Set the reported total
    #[must_use]
    pub fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    /// Reported total, with a missing total counted as zero
    pub fn total_or_zero(&self) -> u64 {
        self.total.unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Replace the records, keeping every metadata field
    pub fn with_data<U>(self, data: Vec<U>) -> ListResponse<U> {
        ListResponse {
            data,
            offset: self.offset,
            page: self.page,
            length: self.length,
            total: self.total,
            extensions: self.extensions,
        }
    }

    /// Convert each record, keeping every metadata field
    pub fn try_map<U, F>(mut self, f: F) -> Result<ListResponse<U>>
    where
        F: FnMut(T) -> Result<U>,
    {
        let data = std::mem::take(&mut self.data)
            .into_iter()
            .map(f)
            .collect::<Result<Vec<_>>>()?;
        Ok(self.with_data(data))
    }
}

/// Accepts a number or a numeric string. Anything else reads as absent.
fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(match value {
        Some(JsonValue::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Some(JsonValue::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

// ============================================================================
// Filters
// ============================================================================

/// Query parameters for a list request.
///
/// Serializes as a plain object. The default holds `length: 10`; use
/// [`Filters::empty`] for no parameters at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filters(JsonObject);

impl Default for Filters {
    fn default() -> Self {
        Self::empty().length(DEFAULT_INDEX_LENGTH)
    }
}

impl Filters {
    /// Filters with no parameters
    pub fn empty() -> Self {
        Self(JsonObject::new())
    }

    /// Set a parameter, replacing any previous value
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a parameter in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Remove a parameter
    pub fn remove(&mut self, key: &str) -> Option<JsonValue> {
        self.0.remove(key)
    }

    #[must_use]
    pub fn length(self, length: u64) -> Self {
        self.set(LENGTH_KEY, length)
    }

    #[must_use]
    pub fn offset(self, offset: u64) -> Self {
        self.set(OFFSET_KEY, offset)
    }

    #[must_use]
    pub fn with_total(self, with_total: bool) -> Self {
        self.set(WITH_TOTAL_KEY, with_total)
    }

    /// Layer `overrides` on top of `self`; keys in `overrides` win
    #[must_use]
    pub fn merge(mut self, overrides: &Filters) -> Self {
        for (key, value) in &overrides.0 {
            self.0.insert(key.clone(), value.clone());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Numeric value of a parameter, if it is a non-negative integer
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.0.get(key).and_then(JsonValue::as_u64)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_object(&self) -> &JsonObject {
        &self.0
    }

    pub fn into_object(self) -> JsonObject {
        self.0
    }
}

impl From<JsonObject> for Filters {
    fn from(object: JsonObject) -> Self {
        Self(object)
    }
}

impl<K: Into<String>, V: Into<JsonValue>> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// ============================================================================
// Per-call options
// ============================================================================

/// Options for a single-item read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetOptions {
    /// Serve from the transport's response cache when fresh
    pub use_cache: bool,
    /// How long a cached response stays fresh
    pub ttl: Duration,
}

impl Default for GetOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            ttl: DEFAULT_GET_TTL,
        }
    }
}

impl GetOptions {
    /// Always go to the network
    pub fn no_cache() -> Self {
        Self {
            use_cache: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Body of a create or update call
#[derive(Debug, Clone)]
pub enum Payload<'a, T> {
    /// A record, sent as JSON
    Item(&'a T),
    /// A multipart form, sent as-is
    Form(FormData),
}

impl<'a, T> From<&'a T> for Payload<'a, T> {
    fn from(item: &'a T) -> Self {
        Payload::Item(item)
    }
}

impl<T> From<FormData> for Payload<'_, T> {
    fn from(form: FormData) -> Self {
        Payload::Form(form)
    }
}

impl<T: Serialize> Payload<'_, T> {
    /// Encode into a transport body
    pub fn into_body(self) -> Result<Body> {
        match self {
            Payload::Item(item) => Ok(Body::Json(serde_json::to_value(item)?)),
            Payload::Form(form) => Ok(Body::Form(form)),
        }
    }
}

/// Response of a create call
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct Created {
    pub id: i64,
}

//! Transport capability
//!
//! The verbs a resource client needs from the wire. `HttpClient` is the
//! default implementation; tests and embedders can supply their own.

use crate::error::Result;
use crate::types::QueryPairs;
use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use std::time::Duration;

/// Options for the caching GET verb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
    /// How long a cached response stays fresh
    pub ttl: Duration,
}

impl CacheOptions {
    /// Create cache options with the given TTL
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            ttl: Duration::from_millis(1000),
        }
    }
}

/// Request body for POST and PUT
#[derive(Debug, Clone)]
pub enum Body {
    /// JSON document
    Json(Value),
    /// Multipart form data
    Form(FormData),
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<FormData> for Body {
    fn from(form: FormData) -> Self {
        Self::Form(form)
    }
}

/// A multipart form payload
#[derive(Debug, Clone, Default)]
pub struct FormData {
    /// Parts in insertion order
    pub parts: Vec<FormPart>,
}

/// A single multipart field
#[derive(Debug, Clone)]
pub struct FormPart {
    /// Field name
    pub name: String,
    /// Field content
    pub value: FormValue,
}

/// Content of a multipart field
#[derive(Debug, Clone)]
pub enum FormValue {
    /// Plain text field
    Text(String),
    /// Binary field, usually a file upload
    Binary {
        /// Raw bytes
        data: Bytes,
        /// File name sent with the part
        file_name: Option<String>,
        /// MIME type of the part
        mime: Option<String>,
    },
}

impl FormData {
    /// Create an empty form
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            value: FormValue::Text(value.into()),
        });
        self
    }

    /// Add a binary field
    #[must_use]
    pub fn binary(
        mut self,
        name: impl Into<String>,
        data: impl Into<Bytes>,
        file_name: Option<String>,
        mime: Option<String>,
    ) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            value: FormValue::Binary {
                data: data.into(),
                file_name,
                mime,
            },
        });
        self
    }

    /// Check if the form has no parts
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Transport verbs used by resource clients
///
/// Every verb is asynchronous and independently failable. Non-success
/// responses surface as errors; the caller adds no retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET a JSON document
    async fn get(&self, url: &str, query: &QueryPairs) -> Result<Value>;

    /// GET through the response cache, keyed by URL.
    ///
    /// Transports without a cache fall back to a plain GET.
    async fn get_cached(
        &self,
        url: &str,
        query: &QueryPairs,
        _options: CacheOptions,
    ) -> Result<Value> {
        self.get(url, query).await
    }

    /// POST a body and return the response document
    async fn post(&self, url: &str, body: Body) -> Result<Value>;

    /// PUT a body, discarding the response
    async fn put(&self, url: &str, body: Body) -> Result<()>;

    /// DELETE a resource
    async fn delete(&self, url: &str) -> Result<()>;
}

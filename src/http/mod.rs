//! HTTP transport module
//!
//! Provides the transport capability and its default reqwest implementation.
//!
//! # Features
//!
//! - **Transport trait**: GET/POST/PUT/DELETE plus a caching GET verb
//! - **Response cache**: TTL cache keyed by URL and query
//! - **Query serialization**: configurable array and nested-object encoding
//! - **Authentication**: integration with the auth module

mod cache;
mod client;
mod query;
mod transport;

pub use cache::{CachedResponse, ResponseCache};
pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use query::QuerySerializer;
pub use transport::{Body, CacheOptions, FormData, FormPart, FormValue, Transport};

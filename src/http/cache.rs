//! In-memory response cache
//!
//! Stores GET responses keyed by URL and query with a per-entry TTL.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// A cached response body with its expiry
#[derive(Debug, Clone)]
pub struct CachedResponse {
    /// Response document
    pub value: Value,
    /// When the entry goes stale
    pub expires_at: DateTime<Utc>,
}

impl CachedResponse {
    /// Create an entry that stays fresh for `ttl`
    pub fn new(value: Value, ttl: Duration) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::zero());
        Self {
            value,
            expires_at: Utc::now() + ttl,
        }
    }

    /// Check if the entry is stale
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Response cache shared by clones of a transport
#[derive(Debug, Clone, Default)]
pub struct ResponseCache {
    entries: Arc<RwLock<HashMap<String, CachedResponse>>>,
}

impl ResponseCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the cache key for a request
    pub fn key(url: &str, query: &[(String, String)]) -> String {
        if query.is_empty() {
            return url.to_string();
        }
        let encoded: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
        format!("{url}?{}", encoded.join("&"))
    }

    /// Get a fresh entry
    pub async fn get(&self, key: &str) -> Option<Value> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone())
    }

    /// Store a response, evicting stale entries first
    pub async fn insert(&self, key: impl Into<String>, value: Value, ttl: Duration) {
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| !entry.is_expired());
        entries.insert(key.into(), CachedResponse::new(value, ttl));
    }

    /// Drop every entry for `url`, with or without a query
    pub async fn invalidate(&self, url: &str) {
        let prefix = format!("{url}?");
        let mut entries = self.entries.write().await;
        entries.retain(|key, _| key != url && !key.starts_with(&prefix));
    }

    /// Drop stale entries
    pub async fn purge_expired(&self) {
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| !entry.is_expired());
    }

    /// Drop everything
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of stored entries, stale ones included
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

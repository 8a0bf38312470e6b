//! Endpoint resolver
//!
//! Maps a resource to its collection URL, per-id URLs and any extra named
//! endpoints the owning client wants to keep next to them.

use super::types::BaseEndpoint;
use crate::error::{Error, Result};
use std::collections::HashMap;

/// Resolves the URLs of one resource
#[derive(Debug, Clone)]
pub struct EndpointResolver {
    base: BaseEndpoint,
    extensions: HashMap<String, BaseEndpoint>,
}

impl EndpointResolver {
    /// Create a resolver for the given base path
    pub fn new(base: impl Into<BaseEndpoint>) -> Self {
        Self {
            base: base.into(),
            extensions: HashMap::new(),
        }
    }

    /// Register an additional named endpoint
    #[must_use]
    pub fn with_extension(
        mut self,
        name: impl Into<String>,
        endpoint: impl Into<BaseEndpoint>,
    ) -> Self {
        self.extensions.insert(name.into(), endpoint.into());
        self
    }

    /// The base endpoint as configured
    pub fn base(&self) -> &BaseEndpoint {
        &self.base
    }

    /// Names of the registered extension endpoints
    pub fn extension_names(&self) -> impl Iterator<Item = &str> {
        self.extensions.keys().map(String::as_str)
    }

    /// Resolve the collection URL
    pub async fn resolve_base(&self) -> Result<String> {
        self.base.resolve().await
    }

    /// Resolve the URL of a single item.
    ///
    /// Reads the base at call time. The id is appended verbatim.
    pub async fn resolve_by_id(&self, id: &str) -> Result<String> {
        let base = self.resolve_base().await?;
        Ok(format!("{base}/{id}"))
    }

    /// Resolve a named extension endpoint
    pub async fn resolve(&self, name: &str) -> Result<String> {
        let endpoint = self
            .extensions
            .get(name)
            .ok_or_else(|| Error::UnknownEndpoint {
                name: name.to_string(),
            })?;
        endpoint.resolve().await
    }
}

impl From<BaseEndpoint> for EndpointResolver {
    fn from(base: BaseEndpoint) -> Self {
        Self::new(base)
    }
}

impl From<&str> for EndpointResolver {
    fn from(base: &str) -> Self {
        Self::new(base)
    }
}

impl From<String> for EndpointResolver {
    fn from(base: String) -> Self {
        Self::new(base)
    }
}

//! Base endpoint types
//!
//! A base path is either an immediate string or a pending resolution that
//! every caller awaits.

use crate::error::{Error, Result};
use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

/// Boxed future yielding a resolved base path
pub type BaseFuture = BoxFuture<'static, Result<String>>;

type BaseSource = Arc<dyn Fn() -> BaseFuture + Send + Sync>;

/// Base path of a resource collection
#[derive(Clone)]
pub enum BaseEndpoint {
    /// Known at construction
    Immediate(String),
    /// Produced asynchronously and awaited at the point of use
    Pending(PendingBase),
}

impl BaseEndpoint {
    /// Create an immediate base path
    pub fn immediate(url: impl Into<String>) -> Self {
        Self::Immediate(url.into())
    }

    /// Create a base path from a one-shot future.
    ///
    /// The future runs at most once. Its outcome is shared by every awaiter,
    /// so a failed future keeps reporting the same failure.
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<String>> + Send + 'static,
    {
        Self::Pending(PendingBase::from_future(future))
    }

    /// Create a base path from a re-invokable lookup.
    ///
    /// The lookup runs on first use. A failed lookup is not remembered and
    /// runs again on the next resolution.
    pub fn discover<F, Fut>(source: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String>> + Send + 'static,
    {
        Self::Pending(PendingBase::from_source(source))
    }

    /// Resolve the base path, suspending if it is still pending
    pub async fn resolve(&self) -> Result<String> {
        match self {
            Self::Immediate(url) => Ok(url.clone()),
            Self::Pending(pending) => pending.resolve().await,
        }
    }

    /// The base path if it is available without waiting
    pub fn peek(&self) -> Option<&str> {
        match self {
            Self::Immediate(url) => Some(url),
            Self::Pending(pending) => pending.peek(),
        }
    }

    /// Check if this is a pending base path
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

impl From<String> for BaseEndpoint {
    fn from(url: String) -> Self {
        Self::Immediate(url)
    }
}

impl From<&str> for BaseEndpoint {
    fn from(url: &str) -> Self {
        Self::Immediate(url.to_string())
    }
}

impl From<PendingBase> for BaseEndpoint {
    fn from(pending: PendingBase) -> Self {
        Self::Pending(pending)
    }
}

impl fmt::Debug for BaseEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Immediate(url) => f.debug_tuple("Immediate").field(url).finish(),
            Self::Pending(pending) => f.debug_tuple("Pending").field(pending).finish(),
        }
    }
}

/// A base path that becomes available later.
///
/// Clones share the same resolution: concurrent callers wait on a single
/// in-flight lookup and all observe the value it settles with.
#[derive(Clone)]
pub struct PendingBase {
    source: BaseSource,
    resolved: Arc<OnceCell<String>>,
}

impl PendingBase {
    /// Wrap a re-invokable lookup
    pub fn from_source<F, Fut>(source: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String>> + Send + 'static,
    {
        Self {
            source: Arc::new(move || source().boxed()),
            resolved: Arc::new(OnceCell::new()),
        }
    }

    /// Wrap a one-shot future
    pub fn from_future<F>(future: F) -> Self
    where
        F: Future<Output = Result<String>> + Send + 'static,
    {
        // Error is not Clone; the shared outcome carries its message instead.
        let shared = future
            .map(|result| result.map_err(|e| e.to_string()))
            .boxed()
            .shared();

        Self::from_source(move || {
            let shared = shared.clone();
            async move { shared.await.map_err(Error::endpoint) }
        })
    }

    /// Await the base path
    pub async fn resolve(&self) -> Result<String> {
        self.resolved
            .get_or_try_init(|| async {
                let url = (self.source)().await?;
                debug!("Resolved pending base endpoint: {}", url);
                Ok::<_, Error>(url)
            })
            .await
            .cloned()
    }

    /// The resolved value, if resolution already succeeded
    pub fn peek(&self) -> Option<&str> {
        self.resolved.get().map(String::as_str)
    }
}

impl fmt::Debug for PendingBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingBase")
            .field("resolved", &self.resolved.get())
            .finish_non_exhaustive()
    }
}

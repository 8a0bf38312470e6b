//! Endpoint module
//!
//! Resolves the collection URL and per-item URLs of a resource.
//!
//! # Overview
//!
//! A resource's base path is either known up front or produced later by an
//! asynchronous lookup (service discovery, a config fetch, ...). The
//! [`EndpointResolver`] hides the difference: every caller awaits
//! `resolve_base()` and gets the live value.

mod resolver;
mod types;

pub use resolver::EndpointResolver;
pub use types::{BaseEndpoint, BaseFuture, PendingBase};

#[cfg(test)]
mod tests;

// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # resource-client
//!
//! A typed client for REST resource collections.
//!
//! ## Features
//!
//! - **Typed CRUD**: `index`, `get`, `create`, `update` and `delete` over one collection
//! - **Late endpoints**: a base URL may still be resolving when calls are issued
//! - **Defaults overlay**: fetched records are laid over a defaults record
//! - **All pages**: probe once for the total, then fetch every other page concurrently
//! - **Pluggable transport**: authenticated and raw transports with a TTL response cache
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use resource_client::{Filters, HttpClient, ResourceCapabilities, ResourceClient};
//!
//! #[tokio::main]
//! async fn main() -> resource_client::Result<()> {
//!     let config = resource_client::load_config("client.yaml")?;
//!     let http = HttpClient::with_auth(config.http_client_config(), config.auth_config())?;
//!     let orders: ResourceClient<Order> = ResourceClient::new(
//!         "/orders",
//!         ResourceCapabilities::from_http_client(http),
//!         Order::default(),
//!     );
//!
//!     let page = orders.index(Filters::default()).await?;
//!     let order = orders.get("42").await?;
//!     let everything = orders.get_all_pages_base_list(Filters::empty(), None).await;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       ResourceClient<T>                      │
//! │  index  get  create  update  delete  get_all_pages_base_list │
//! └──────────────────────────────────────────────────────────────┘
//!                                │
//! ┌───────────────┬──────────────┴──┬────────────────┬───────────┐
//! │   Endpoint    │  Capabilities   │   Pagination   │   Auth    │
//! ├───────────────┼─────────────────┼────────────────┼───────────┤
//! │ Immediate     │ Transport       │ Probe          │ API Key   │
//! │ Pending       │ Raw transport   │ Fan-out        │ Basic     │
//! │ Extensions    │ Normalizers     │ Ordered merge  │ OAuth2    │
//! └───────────────┴─────────────────┴────────────────┴───────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication implementations
pub mod auth;

/// Transport trait, HTTP client and response cache
pub mod http;

/// Endpoint resolution
pub mod endpoint;

/// Typed resource client
pub mod resource;

/// All-pages aggregation
pub mod pagination;

/// Client configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{load_config, load_config_from_str, ClientConfig};
pub use endpoint::{BaseEndpoint, EndpointResolver};
pub use http::{HttpClient, HttpClientConfig, Transport};
pub use pagination::{fetch_all_pages, try_fetch_all_pages, PaginationConfig};
pub use resource::{
    Filters, GetOptions, ListResponse, Payload, ResourceCapabilities, ResourceClient,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

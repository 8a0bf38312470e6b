//! Authentication module
//!
//! Supports: API Key, Basic, Bearer, OAuth2 (client credentials, refresh token), Custom Headers
//!
//! The `Authenticator` is attached to an `HttpClient` and applied to every
//! request it sends. OAuth2 tokens are cached until they expire.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, CachedToken, Location};

//! Client configuration
//!
//! Describes the API a resource client talks to: where it lives, how to
//! authenticate, how responses are cached and paged, and which resource
//! collections it exposes. Usually loaded from a YAML file.

use crate::auth::{AuthConfig, Location};
use crate::error::{Error, Result, ResultExt};
use crate::http::HttpClientConfig;
use crate::pagination::PaginationConfig;
use crate::resource::GetOptions;
use crate::types::{ArrayFormat, StringMap};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

// ============================================================================
// Top-Level Client Config
// ============================================================================

/// Complete client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL that resource paths are relative to
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: StringMap,

    /// Authentication for the authenticated transport
    #[serde(default)]
    pub auth: AuthDefinition,

    /// Response cache for single-item reads
    #[serde(default)]
    pub cache: CacheConfig,

    /// Page size and fan-out for all-pages reads
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// How array filters are written into the query string
    #[serde(default)]
    pub array_format: ArrayFormat,

    /// Resource name to collection path
    #[serde(default)]
    pub resources: BTreeMap<String, String>,
}

fn default_timeout() -> u64 {
    30
}

impl ClientConfig {
    /// Transport settings derived from this config
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(Duration::from_secs(self.timeout_seconds));

        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent);
        }
        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }
        if !self.cache.enabled {
            builder = builder.no_cache();
        }
        builder.build()
    }

    /// Runtime auth settings derived from this config
    pub fn auth_config(&self) -> AuthConfig {
        self.auth.clone().into()
    }

    /// Default options for single-item reads
    pub fn get_options(&self) -> GetOptions {
        GetOptions {
            use_cache: self.cache.enabled,
            ttl: self.cache.ttl(),
        }
    }

    /// Collection path of a named resource
    pub fn resource_path(&self, name: &str) -> Result<&str> {
        self.resources.get(name).map(String::as_str).ok_or_else(|| {
            let known: Vec<&str> = self.resources.keys().map(String::as_str).collect();
            Error::config(format!(
                "Unknown resource '{name}'. Configured resources: {}",
                if known.is_empty() {
                    "(none)".to_string()
                } else {
                    known.join(", ")
                }
            ))
        })
    }

    /// Check the config for values that cannot work
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::missing_field("base_url"));
        }
        Url::parse(&self.base_url)?;

        if self.timeout_seconds == 0 {
            return Err(Error::invalid_value("timeout_seconds", "must be greater than zero"));
        }

        if self.pagination.page_size == 0 {
            return Err(Error::invalid_value(
                "pagination.page_size",
                "must be greater than zero",
            ));
        }

        if self.pagination.max_concurrency == Some(0) {
            return Err(Error::invalid_value(
                "pagination.max_concurrency",
                "must be greater than zero",
            ));
        }

        for (name, path) in &self.resources {
            if path.trim().is_empty() {
                return Err(Error::invalid_value(
                    format!("resources.{name}"),
                    "path cannot be empty",
                ));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Cache Config
// ============================================================================

/// Response cache settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Keep a response cache at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Freshness window in milliseconds
    #[serde(default = "default_ttl_ms")]
    pub ttl_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_ms: default_ttl_ms(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

fn default_true() -> bool {
    true
}

fn default_ttl_ms() -> u64 {
    1000
}

// ============================================================================
// Auth Definition (in YAML)
// ============================================================================

/// Authentication settings as written in the config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthDefinition {
    /// No authentication
    #[default]
    None,

    /// API key in a header or query parameter
    ApiKey {
        #[serde(default)]
        location: Location,
        #[serde(default)]
        header_name: Option<String>,
        #[serde(default)]
        query_param: Option<String>,
        /// Prefix added before the value
        #[serde(default)]
        prefix: Option<String>,
        value: String,
    },

    Basic {
        username: String,
        password: String,
    },

    Bearer {
        token: String,
    },

    /// OAuth2 client credentials grant
    Oauth2ClientCredentials {
        token_url: String,
        client_id: String,
        client_secret: String,
        #[serde(default)]
        scopes: Vec<String>,
        /// Extra form fields for the token request
        #[serde(default)]
        token_body: StringMap,
    },

    /// OAuth2 refresh token grant
    Oauth2Refresh {
        token_url: String,
        client_id: String,
        client_secret: String,
        refresh_token: String,
    },

    /// Fixed headers
    CustomHeaders {
        headers: StringMap,
    },
}

impl From<AuthDefinition> for AuthConfig {
    fn from(def: AuthDefinition) -> Self {
        match def {
            AuthDefinition::None => AuthConfig::None,
            AuthDefinition::ApiKey {
                location,
                header_name,
                query_param,
                prefix,
                value,
            } => AuthConfig::ApiKey {
                location,
                header_name,
                query_param,
                prefix,
                value,
            },
            AuthDefinition::Basic { username, password } => {
                AuthConfig::Basic { username, password }
            }
            AuthDefinition::Bearer { token } => AuthConfig::Bearer { token },
            AuthDefinition::Oauth2ClientCredentials {
                token_url,
                client_id,
                client_secret,
                scopes,
                token_body,
            } => AuthConfig::Oauth2ClientCredentials {
                token_url,
                client_id,
                client_secret,
                scopes,
                token_body,
            },
            AuthDefinition::Oauth2Refresh {
                token_url,
                client_id,
                client_secret,
                refresh_token,
            } => AuthConfig::Oauth2Refresh {
                token_url,
                client_id,
                client_secret,
                refresh_token,
            },
            AuthDefinition::CustomHeaders { headers } => AuthConfig::CustomHeaders { headers },
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load and validate a client config from a YAML file
pub fn load_config(path: impl AsRef<Path>) -> Result<ClientConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read client config '{}'", path.display()))?;
    load_config_from_str(&content)
}

/// Load and validate a client config from a YAML string
pub fn load_config_from_str(yaml: &str) -> Result<ClientConfig> {
    let config: ClientConfig = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse client config: {e}")))?;

    config.validate()?;
    Ok(config)
}

//! Authenticator implementation
//!
//! Attaches credentials to outgoing requests. OAuth2 access tokens are
//! fetched lazily and kept until shortly before they expire.

use super::types::{AuthConfig, CachedToken, Location};
use crate::error::{Error, Result};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Applies an [`AuthConfig`] to requests
pub struct Authenticator {
    config: AuthConfig,
    token: Arc<RwLock<Option<CachedToken>>>,
    http_client: Client,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Create an authenticator that fetches tokens with `http_client`
    pub fn with_client(config: AuthConfig, http_client: Client) -> Self {
        Self {
            config,
            token: Arc::new(RwLock::new(None)),
            http_client,
        }
    }

    /// Apply authentication to a request builder
    pub async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        let req = match &self.config {
            AuthConfig::None => req,

            AuthConfig::ApiKey {
                location,
                header_name,
                query_param,
                prefix,
                value,
            } => {
                let credential = format!("{}{value}", prefix.as_deref().unwrap_or(""));
                match location {
                    Location::Header => {
                        req.header(header_name.as_deref().unwrap_or("Authorization"), credential)
                    }
                    Location::Query => {
                        req.query(&[(query_param.as_deref().unwrap_or("api_key"), credential)])
                    }
                }
            }

            AuthConfig::Basic { username, password } => req.basic_auth(username, Some(password)),

            AuthConfig::Bearer { token } => req.bearer_auth(token),

            AuthConfig::CustomHeaders { headers } => headers
                .iter()
                .fold(req, |req, (key, value)| req.header(key.as_str(), value.as_str())),

            AuthConfig::Oauth2ClientCredentials { .. } | AuthConfig::Oauth2Refresh { .. } => {
                req.bearer_auth(self.access_token().await?)
            }
        };
        Ok(req)
    }

    /// Current access token, fetching a new one if none is cached or it expired
    async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.token.read().await.as_ref().filter(|t| !t.is_expired()) {
            return Ok(token.token.clone());
        }

        let mut slot = self.token.write().await;
        // Another task may have refreshed while we waited for the lock.
        if let Some(token) = slot.as_ref().filter(|t| !t.is_expired()) {
            return Ok(token.token.clone());
        }

        let fresh = self.request_token().await?;
        let value = fresh.token.clone();
        *slot = Some(fresh);
        Ok(value)
    }

    /// Exchange the configured grant for an access token
    async fn request_token(&self) -> Result<CachedToken> {
        let (token_url, form, refresh) = match &self.config {
            AuthConfig::Oauth2ClientCredentials {
                token_url,
                client_id,
                client_secret,
                scopes,
                token_body,
            } => {
                let mut form = vec![
                    ("grant_type".to_string(), "client_credentials".to_string()),
                    ("client_id".to_string(), client_id.clone()),
                    ("client_secret".to_string(), client_secret.clone()),
                ];
                if !scopes.is_empty() {
                    form.push(("scope".to_string(), scopes.join(" ")));
                }
                form.extend(token_body.iter().map(|(k, v)| (k.clone(), v.clone())));
                (token_url, form, false)
            }

            AuthConfig::Oauth2Refresh {
                token_url,
                client_id,
                client_secret,
                refresh_token,
            } => {
                let form = vec![
                    ("grant_type".to_string(), "refresh_token".to_string()),
                    ("client_id".to_string(), client_id.clone()),
                    ("client_secret".to_string(), client_secret.clone()),
                    ("refresh_token".to_string(), refresh_token.clone()),
                ];
                (token_url, form, true)
            }

            _ => return Err(Error::auth("Auth type does not use a token endpoint")),
        };

        debug!("Requesting access token from {}", token_url);
        let response = self.http_client.post(token_url).form(&form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = format!("Token request failed with status {}: {body}", status.as_u16());
            return Err(if refresh {
                Error::TokenRefresh { message }
            } else {
                Error::OAuth2 { message }
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.into_cached_token())
    }

    /// Forget the cached token so the next request fetches a new one
    pub async fn clear_cache(&self) {
        *self.token.write().await = None;
    }

    /// Get the current auth config
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}

/// OAuth2 token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn into_cached_token(self) -> CachedToken {
        match self.expires_in {
            Some(secs) => CachedToken::expires_in(self.access_token, secs),
            None => CachedToken::new(self.access_token, None),
        }
    }
}

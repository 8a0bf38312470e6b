//! HTTP client
//!
//! Provides the default reqwest-backed transport:
//! - Base URL joining for relative paths
//! - Optional authentication on every request
//! - JSON and multipart bodies
//! - A TTL response cache for the caching GET verb
//! - Status classification into `Error::HttpStatus`

use super::cache::ResponseCache;
use super::transport::{Body, CacheOptions, FormData, FormValue, Transport};
use crate::auth::{AuthConfig, Authenticator};
use crate::error::{Error, Result};
use crate::types::QueryPairs;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for relative request paths
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
    /// Keep a response cache for `get_cached`
    pub cache_enabled: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            default_headers: HashMap::new(),
            user_agent: format!("resource-client/{}", env!("CARGO_PKG_VERSION")),
            cache_enabled: true,
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Disable the response cache
    pub fn no_cache(mut self) -> Self {
        self.config.cache_enabled = false;
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters, in send order
    pub query: QueryPairs,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Request body
    pub body: Option<Body>,
    /// Override timeout for this request
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append serialized query pairs
    #[must_use]
    pub fn queries(mut self, pairs: &[(String, String)]) -> Self {
        self.query.extend_from_slice(pairs);
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(Body::Json(body));
        self
    }

    /// Set multipart body
    #[must_use]
    pub fn form(mut self, form: FormData) -> Self {
        self.body = Some(Body::Form(form));
        self
    }

    /// Set any body
    #[must_use]
    pub fn body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// reqwest-backed transport
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Option<Arc<Authenticator>>,
    cache: Option<ResponseCache>,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let cache = config.cache_enabled.then(ResponseCache::new);

        Ok(Self {
            client,
            config,
            authenticator: None,
            cache,
        })
    }

    /// Create a client with authentication
    pub fn with_auth(config: HttpClientConfig, auth_config: AuthConfig) -> Result<Self> {
        let mut client = Self::with_config(config)?;
        client.set_authenticator(auth_config);
        Ok(client)
    }

    /// Set the authenticator
    pub fn set_authenticator(&mut self, auth_config: AuthConfig) {
        self.authenticator = Some(Arc::new(Authenticator::with_client(
            auth_config,
            self.client.clone(),
        )));
    }

    /// A copy of this client that sends no credentials.
    ///
    /// Shares the connection pool but keeps its own response cache, so
    /// nothing fetched with credentials is served to it.
    pub fn without_auth(&self) -> Self {
        Self {
            client: self.client.clone(),
            config: self.config.clone(),
            authenticator: None,
            cache: self.cache.as_ref().map(|_| ResponseCache::new()),
        }
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Get the response cache, if enabled
    pub fn cache(&self) -> Option<&ResponseCache> {
        self.cache.as_ref()
    }

    /// Check if requests carry credentials
    pub fn is_authenticated(&self) -> bool {
        self.authenticator.is_some()
    }

    /// Make a request, failing on non-success statuses
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        config: RequestConfig,
    ) -> Result<Response> {
        let full_url = self.build_url(url);

        // Build request
        let mut req = self.client.request(method.clone(), &full_url);

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        for (key, value) in &config.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if !config.query.is_empty() {
            req = req.query(&config.query);
        }

        match config.body {
            Some(Body::Json(body)) => req = req.json(&body),
            Some(Body::Form(form)) => req = req.multipart(into_multipart(form)?),
            None => {}
        }

        if let Some(timeout) = config.timeout {
            req = req.timeout(timeout);
        }

        // Apply authentication
        if let Some(ref auth) = self.authenticator {
            req = auth.apply(req).await?;
        }

        debug!("{} {}", method, full_url);
        let response = req.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("{} {} failed with {}", method, full_url, status.as_u16());
            return Err(Error::http_status(status.as_u16(), body));
        }

        Ok(response)
    }

    /// Make a request and parse the JSON response.
    ///
    /// An empty body parses as `null`.
    pub async fn request_json(
        &self,
        method: Method,
        url: &str,
        config: RequestConfig,
    ) -> Result<Value> {
        let response = self.request(method, url, config).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Make a GET request and deserialize the response
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let value = self
            .request_json(Method::GET, url, RequestConfig::default())
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Build full URL from path
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = path.trim_start_matches('/');
                format!("{base}/{path}")
            }
            None => path.to_string(),
        }
    }

    async fn invalidate(&self, url: &str) {
        if let Some(cache) = &self.cache {
            cache.invalidate(&self.build_url(url)).await;
        }
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn get(&self, url: &str, query: &QueryPairs) -> Result<Value> {
        self.request_json(Method::GET, url, RequestConfig::new().queries(query))
            .await
    }

    async fn get_cached(
        &self,
        url: &str,
        query: &QueryPairs,
        options: CacheOptions,
    ) -> Result<Value> {
        let Some(cache) = &self.cache else {
            return self.get(url, query).await;
        };

        let key = ResponseCache::key(&self.build_url(url), query);
        if let Some(value) = cache.get(&key).await {
            debug!("Cache hit: {}", key);
            return Ok(value);
        }

        debug!("Cache miss: {}", key);
        let value = self.get(url, query).await?;
        cache.insert(key, value.clone(), options.ttl).await;
        Ok(value)
    }

    async fn post(&self, url: &str, body: Body) -> Result<Value> {
        self.request_json(Method::POST, url, RequestConfig::new().body(body))
            .await
    }

    async fn put(&self, url: &str, body: Body) -> Result<()> {
        self.request(Method::PUT, url, RequestConfig::new().body(body))
            .await?;
        self.invalidate(url).await;
        Ok(())
    }

    async fn delete(&self, url: &str) -> Result<()> {
        self.request(Method::DELETE, url, RequestConfig::new())
            .await?;
        self.invalidate(url).await;
        Ok(())
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_authenticator", &self.authenticator.is_some())
            .field("has_cache", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

/// Convert form data into a reqwest multipart form
fn into_multipart(form: FormData) -> Result<Form> {
    let mut multipart = Form::new();
    for part in form.parts {
        let value = match part.value {
            FormValue::Text(text) => Part::text(text),
            FormValue::Binary {
                data,
                file_name,
                mime,
            } => {
                let mut binary = Part::bytes(data.to_vec());
                if let Some(name) = file_name {
                    binary = binary.file_name(name);
                }
                if let Some(mime) = mime {
                    binary = binary.mime_str(&mime)?;
                }
                binary
            }
        };
        multipart = multipart.part(part.name, value);
    }
    Ok(multipart)
}

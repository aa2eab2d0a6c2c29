//! HTTP client backed by reqwest
//!
//! Provides the production `Transport`:
//! - Session options (proxy, cookie header, basic credentials)
//! - Connection error classification
//! - No retries and no rate limiting; the caller decides whether to re-issue

use super::transport::{ApiRequest, ApiResponse, Transport};
use crate::config::{Credentials, ScraperConfig};
use crate::error::{ConnectionFailure, Error, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, COOKIE};
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::time::Duration;
use tracing::debug;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
    /// Proxy URL applied to every scheme
    pub proxy: Option<String>,
    /// Raw `Cookie` header value
    pub cookies: Option<String>,
    /// Basic authentication credentials
    pub credentials: Option<Credentials>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            default_headers: HashMap::new(),
            user_agent: format!("wpjson-scraper/{}", env!("CARGO_PKG_VERSION")),
            proxy: None,
            cookies: None,
            credentials: None,
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }

    /// Build the client config from scraper settings
    pub fn from_scraper_config(config: &ScraperConfig) -> Self {
        let mut client_config = Self {
            timeout: config.timeout(),
            default_headers: config.headers.clone(),
            proxy: config.proxy.clone(),
            cookies: config.cookies.clone(),
            credentials: config.credentials.clone(),
            ..Self::default()
        };
        if let Some(agent) = &config.user_agent {
            client_config.user_agent.clone_from(agent);
        }
        client_config
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
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

    /// Route all requests through a proxy
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.config.proxy = Some(proxy.into());
        self
    }

    /// Send a raw cookie header with every request
    pub fn cookies(mut self, cookies: impl Into<String>) -> Self {
        self.config.cookies = Some(cookies.into());
        self
    }

    /// Use basic authentication
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.config.credentials = Some(credentials);
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// HTTP client for the remote API
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (key, value) in &config.default_headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| Error::config(format!("Invalid header name '{key}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::config(format!("Invalid value for header '{key}': {e}")))?;
            headers.insert(name, value);
        }
        if let Some(cookies) = &config.cookies {
            let value = HeaderValue::from_str(cookies)
                .map_err(|e| Error::config(format!("Invalid cookie string: {e}")))?;
            headers.insert(COOKIE, value);
        }

        let mut builder = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers);

        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| Error::config(format!("Invalid proxy '{proxy}': {e}")))?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;
        Ok(Self { client, config })
    }

    /// Issue one GET. Any status is returned as `Ok`.
    async fn send(&self, request: &ApiRequest) -> Result<Response> {
        let url = request.url.as_str();
        let mut req = self.client.get(url);

        if !request.query.is_empty() {
            req = req.query(&request.query);
        }

        if let Some(creds) = &self.config.credentials {
            req = req.basic_auth(&creds.username, Some(&creds.password));
        }

        match req.send().await {
            Ok(response) => {
                debug!("GET {} -> {}", response.url(), response.status().as_u16());
                Ok(response)
            }
            Err(e) if e.is_builder() => Err(Error::Http(e)),
            Err(e) => {
                let kind = classify_error(&e);
                debug!("GET {url} failed ({kind:?}): {e}");
                Err(Error::connection(kind, url))
            }
        }
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn issue(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let response = self.send(request).await?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(|e| {
            let kind = classify_error(&e);
            Error::connection(kind, request.url.as_str())
        })?;

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("timeout", &self.config.timeout)
            .field("proxy", &self.config.proxy)
            .field("has_cookies", &self.config.cookies.is_some())
            .field("has_credentials", &self.config.credentials.is_some())
            .finish_non_exhaustive()
    }
}

/// Work out what kind of connection failure a reqwest error represents
pub(crate) fn classify_error(err: &reqwest::Error) -> ConnectionFailure {
    if err.is_timeout() {
        return ConnectionFailure::Timeout;
    }

    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        if let Some(io) = cause.downcast_ref::<std::io::Error>() {
            match io.kind() {
                ErrorKind::ConnectionRefused => return ConnectionFailure::Refused,
                ErrorKind::ConnectionReset
                | ErrorKind::ConnectionAborted
                | ErrorKind::BrokenPipe
                | ErrorKind::UnexpectedEof => return ConnectionFailure::Reset,
                _ => {}
            }
        }

        let text = cause.to_string().to_lowercase();
        if text.contains("dns error")
            || text.contains("failed to lookup address")
            || text.contains("name or service not known")
        {
            return ConnectionFailure::CouldNotResolve;
        }
        if text.contains("connection refused") {
            return ConnectionFailure::Refused;
        }
        if text.contains("connection reset") || text.contains("connection closed before message") {
            return ConnectionFailure::Reset;
        }

        source = cause.source();
    }

    ConnectionFailure::Other
}

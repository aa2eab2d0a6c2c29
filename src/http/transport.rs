//! Transport abstraction
//!
//! The page fetcher only needs one capability from the network layer:
//! issue a GET and hand back status, headers and body untouched. Status
//! classification is left to the caller.

use crate::error::Result;
use async_trait::async_trait;
use reqwest::header::HeaderMap;

/// A GET request against the remote API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// Absolute URL without query string
    pub url: String,
    /// Query parameters, sent in insertion order
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    /// Create a request for a URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
        }
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// A raw response: status, headers and the undecoded body
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body as text
    pub body: String,
}

impl ApiResponse {
    /// Create a response with no headers
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Read a header as an unsigned integer
    pub fn header_usize(&self, name: &str) -> Option<usize> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    }
}

/// Issues requests to the remote API
///
/// Implementations must return `Error::Connection` (or `Error::Http`) for
/// transport failures and `Ok` for every response that arrived, whatever
/// its status.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET request
    async fn issue(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

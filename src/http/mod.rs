//! HTTP module
//!
//! Provides the transport seam used by the page fetcher and its reqwest
//! implementation.
//!
//! # Features
//!
//! - **Transport trait**: `issue(request) -> (status, headers, body)`
//! - **Session options**: proxy, cookie header and basic credentials
//! - **Error classification**: unresolvable host, refused, reset, timeout

mod client;
mod transport;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use transport::{ApiRequest, ApiResponse, Transport};

//! Error types for wpjson-scraper
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use std::fmt;
use thiserror::Error;

/// Kind of transport failure observed while talking to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionFailure {
    /// DNS lookup failed
    CouldNotResolve,
    /// The remote host refused the connection
    Refused,
    /// The connection was closed while the request was in flight
    Reset,
    /// The request did not complete in time
    Timeout,
    /// Any other connection-level failure
    Other,
}

impl fmt::Display for ConnectionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::CouldNotResolve => "Could not resolve host",
            Self::Refused => "Connection refused by",
            Self::Reset => "Connection reset by",
            Self::Timeout => "Connection timed out for",
            Self::Other => "Connection failed for",
        };
        f.write_str(text)
    }
}

/// The main error type for wpjson-scraper
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    /// Invalid settings
    #[error("Configuration error: {message}")]
    Config {
        /// What is wrong
        message: String,
    },

    /// A target that cannot be turned into a URL
    #[error("Invalid target '{target}': {message}")]
    InvalidTarget {
        /// The target as given
        target: String,
        /// Why it was rejected
        message: String,
    },

    /// Malformed config file
    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON that could not be read or written
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    /// reqwest failed before anything was sent
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// An error status the fetcher does not treat as end of data
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// Response status code
        status: u16,
        /// Response body
        body: String,
    },

    /// The target could not be reached
    #[error("{kind} {url}")]
    Connection {
        /// What went wrong
        kind: ConnectionFailure,
        /// The URL being requested
        url: String,
    },

    // ============================================================================
    // API Protocol Errors
    // ============================================================================
    /// The target does not serve the WordPress REST API
    #[error("No WordPress REST API (wp/v2) available at {url}")]
    ProtocolUnsupported {
        /// The URL of the first page requested
        url: String,
    },

    // ============================================================================
    // Output Errors
    // ============================================================================
    /// Building or writing a record batch failed
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Writing a Parquet file failed
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// An export could not be written
    #[error("Output error: {message}")]
    Output {
        /// What failed
        message: String,
    },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    /// Terminal or file I/O failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    /// Anything else
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid target error
    pub fn invalid_target(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTarget {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a connection error
    pub fn connection(kind: ConnectionFailure, url: impl Into<String>) -> Self {
        Self::Connection {
            kind,
            url: url.into(),
        }
    }

    /// Create a protocol unsupported error
    pub fn protocol_unsupported(url: impl Into<String>) -> Self {
        Self::ProtocolUnsupported { url: url.into() }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Whether this error means the target does not speak the expected API
    pub fn is_protocol_unsupported(&self) -> bool {
        matches!(self, Self::ProtocolUnsupported { .. })
    }

    /// Whether this error came from the transport rather than the API
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::HttpStatus { .. } | Self::Connection { .. }
        )
    }
}

/// Result type alias for wpjson-scraper
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::http_status(403, "Forbidden");
        assert_eq!(err.to_string(), "HTTP 403: Forbidden");

        let err = Error::connection(ConnectionFailure::Refused, "http://localhost:1/");
        assert_eq!(err.to_string(), "Connection refused by http://localhost:1/");

        let err = Error::protocol_unsupported("http://example.com/wp-json/");
        assert!(err.to_string().contains("wp/v2"));
    }

    #[test]
    fn test_classification() {
        assert!(Error::protocol_unsupported("x").is_protocol_unsupported());
        assert!(!Error::protocol_unsupported("x").is_transport());

        assert!(Error::http_status(500, "").is_transport());
        assert!(Error::connection(ConnectionFailure::Reset, "x").is_transport());
        assert!(!Error::config("x").is_transport());
        assert!(!Error::output("x").is_protocol_unsupported());
    }
}

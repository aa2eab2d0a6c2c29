//! Scraper configuration
//!
//! Settings are read from an optional YAML file and then overridden by
//! command-line flags. The target URL is normalized before use.

use crate::error::{Error, Result};
use crate::types::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default API path under the target site
pub const DEFAULT_API_PATH: &str = "wp-json/";

/// Basic authentication credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Login name
    pub username: String,
    /// Password, empty when not given
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    /// Parse a `user:password` string. The password may itself contain `:`.
    pub fn parse(value: &str) -> Self {
        match value.split_once(':') {
            Some((username, password)) => Self {
                username: username.to_string(),
                password: password.to_string(),
            },
            None => Self {
                username: value.to_string(),
                password: String::new(),
            },
        }
    }
}

/// Configuration for a scraping session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Base URL of the WordPress installation
    pub target: Option<String>,
    /// API path relative to the target
    pub api_path: String,
    /// Items requested per remote page
    pub page_size: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User agent string
    pub user_agent: Option<String>,
    /// Proxy URL for all requests
    pub proxy: Option<String>,
    /// Raw `Cookie` header value ("n1=v1; n2=v2")
    pub cookies: Option<String>,
    /// Basic authentication credentials
    pub credentials: Option<Credentials>,
    /// Extra headers sent with every request
    pub headers: HashMap<String, String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            target: None,
            api_path: DEFAULT_API_PATH.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: 30,
            user_agent: None,
            proxy: None,
            cookies: None,
            credentials: None,
            headers: HashMap::new(),
        }
    }
}

impl ScraperConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 || self.page_size > 100 {
            return Err(Error::config(format!(
                "page_size must be between 1 and 100, got {}",
                self.page_size
            )));
        }
        if let Some(target) = &self.target {
            normalize_target(target)?;
        }
        Ok(())
    }

    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The normalized target, or an error if none is configured
    pub fn normalized_target(&self) -> Result<String> {
        let target = self
            .target
            .as_deref()
            .ok_or_else(|| Error::config("No target specified (use --target or a config file)"))?;
        normalize_target(target)
    }
}

/// Normalize a target URL: default to `http://` and ensure a trailing slash
pub fn normalize_target(target: &str) -> Result<String> {
    let target = target.trim();
    if target.is_empty() {
        return Err(Error::invalid_target(target, "empty target"));
    }

    let mut normalized = if target.starts_with("http://") || target.starts_with("https://") {
        target.to_string()
    } else {
        format!("http://{target}")
    };
    if !normalized.ends_with('/') {
        normalized.push('/');
    }

    let url = Url::parse(&normalized).map_err(|e| Error::invalid_target(target, e.to_string()))?;
    if url.host_str().is_none() {
        return Err(Error::invalid_target(target, "missing host"));
    }
    Ok(normalized)
}

/// Join the normalized target and the API path into the API root URL
pub fn api_root(target: &str, api_path: &str) -> String {
    let api_path = api_path.trim_matches('/');
    if api_path.is_empty() {
        target.to_string()
    } else {
        format!("{}/{api_path}/", target.trim_end_matches('/'))
    }
}

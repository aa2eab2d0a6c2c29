//! Page fetcher implementation

use crate::error::{Error, Result};
use crate::http::{ApiRequest, ApiResponse, Transport};
use crate::types::{Item, JsonObject, JsonValue};
use tracing::{debug, warn};

/// Header carrying the total number of items in a collection
pub const TOTAL_HEADER: &str = "X-WP-Total";

/// Header carrying the total number of pages in a collection
pub const TOTAL_PAGES_HEADER: &str = "X-WP-TotalPages";

/// One page worth of items plus whatever totals the response advertised
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedPage {
    /// Items in remote order
    pub items: Vec<Item>,
    /// Total items in the collection, if read and present
    pub total_count: Option<usize>,
    /// Total pages in the collection, if read and present
    pub total_pages: Option<usize>,
}

impl FetchedPage {
    /// A page signalling that there is nothing more to fetch
    pub fn exhausted() -> Self {
        Self::default()
    }

    /// Whether this page ends the fetch sequence
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Parameters for a single page request
#[derive(Debug, Clone, Copy)]
pub struct PageQuery<'a> {
    /// Endpoint path relative to the API root
    pub endpoint: &'a str,
    /// 1-based page number
    pub page: usize,
    /// Explicit page size, sent as `per_page`
    pub per_page: Option<usize>,
    /// Keyword filter, sent as `search`
    pub search: Option<&'a str>,
    /// Read total count/pages headers from this response
    pub read_totals: bool,
}

impl<'a> PageQuery<'a> {
    /// Query for a page of an endpoint
    pub fn new(endpoint: &'a str, page: usize) -> Self {
        Self {
            endpoint,
            page,
            per_page: None,
            search: None,
            read_totals: false,
        }
    }
}

/// Fetches pages, single items and the API index from one target
pub struct PageFetcher<T: Transport> {
    transport: T,
    api_root: String,
}

impl<T: Transport> PageFetcher<T> {
    /// Create a fetcher for an API root such as `http://example.com/wp-json/`
    pub fn new(transport: T, api_root: impl Into<String>) -> Self {
        Self {
            transport,
            api_root: with_trailing_slash(api_root.into()),
        }
    }

    /// The API root URL
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// Replace the transport, keeping the API root
    pub fn set_transport(&mut self, transport: T) {
        self.transport = transport;
    }

    /// Point the fetcher at another API root
    pub fn set_api_root(&mut self, api_root: impl Into<String>) {
        self.api_root = with_trailing_slash(api_root.into());
    }

    /// Absolute URL of an endpoint
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_root, endpoint.trim_start_matches('/'))
    }

    /// Fetch one page of a collection
    pub async fn fetch_page(&self, query: &PageQuery<'_>) -> Result<FetchedPage> {
        let url = self.endpoint_url(query.endpoint);
        let mut request = ApiRequest::new(url.as_str()).query("page", query.page.to_string());
        if let Some(per_page) = query.per_page {
            request = request.query("per_page", per_page.to_string());
        }
        if let Some(search) = query.search {
            request = request.query("search", search);
        }

        debug!("Fetching page {} of {url}", query.page);
        let response = self.transport.issue(&request).await?;
        let first = query.page == 1;

        if matches!(response.status, 400 | 404) {
            if first {
                return Err(Error::protocol_unsupported(url));
            }
            debug!(
                "Page {} of {url} returned {}; no more pages",
                query.page, response.status
            );
            return Ok(FetchedPage::exhausted());
        }
        check_status(&response)?;

        let items = match serde_json::from_str::<JsonValue>(&response.body) {
            Ok(JsonValue::Array(items)) => items,
            Ok(_) | Err(_) if first => return Err(Error::protocol_unsupported(url)),
            Ok(_) | Err(_) => {
                warn!(
                    "Page {} of {url} is not a JSON array; treating it as the end of the data",
                    query.page
                );
                return Ok(FetchedPage::exhausted());
            }
        };

        let (total_count, total_pages) = if query.read_totals {
            (
                response.header_usize(TOTAL_HEADER),
                response.header_usize(TOTAL_PAGES_HEADER),
            )
        } else {
            (None, None)
        };

        debug!("Page {} of {url}: {} items", query.page, items.len());
        Ok(FetchedPage {
            items,
            total_count,
            total_pages,
        })
    }

    /// Fetch a single item by identifier. `None` when it does not exist.
    pub async fn fetch_one(&self, endpoint: &str, id: u64) -> Result<Option<Item>> {
        let url = format!("{}/{id}", self.endpoint_url(endpoint).trim_end_matches('/'));
        debug!("Fetching single item {url}");
        let response = self.transport.issue(&ApiRequest::new(url.as_str())).await?;

        if matches!(response.status, 400 | 404 | 410) {
            debug!("{url} not found ({})", response.status);
            return Ok(None);
        }
        check_status(&response)?;

        match serde_json::from_str::<JsonValue>(&response.body) {
            Ok(item @ JsonValue::Object(_)) => Ok(Some(item)),
            Ok(_) | Err(_) => {
                warn!("{url} did not return a JSON object; treating it as not found");
                Ok(None)
            }
        }
    }

    /// Fetch the API index document
    pub async fn fetch_root(&self) -> Result<JsonObject> {
        let response = self
            .transport
            .issue(&ApiRequest::new(self.api_root.as_str()))
            .await?;

        if response.status >= 400 {
            return Err(Error::protocol_unsupported(self.api_root.as_str()));
        }

        match serde_json::from_str::<JsonValue>(&response.body) {
            Ok(JsonValue::Object(index)) => Ok(index),
            Ok(_) | Err(_) => Err(Error::protocol_unsupported(self.api_root.as_str())),
        }
    }
}

fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

/// Turn any non-2xx status into an error
fn check_status(response: &ApiResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    let body: String = response.body.chars().take(200).collect();
    Err(Error::http_status(response.status, body))
}

//! Windowed pagination engine
//!
//! Serves `(start, num)` windows of remote collections from one sparse
//! store per collection type, fetching whole remote pages only when the
//! requested window is not fully materialized.
//!
//! # Overview
//!
//! The engine module provides:
//! - `Engine` - Owns the stores, comment linkage and site info of one target
//! - `Window` - A requested slice of a collection
//! - `ProgressReporter` - Display-only progress sink for long fetches
//!
//! Each page request is awaited before the next one is issued. A fetch
//! that fails part way merges nothing, so a store only ever changes after
//! a fetch sequence completed.

mod resolver;
mod search;
mod types;

pub use types::{
    CommentLinks, EngineStats, LinkedPost, NoProgress, ProgressReporter, SearchResults, SiteInfo,
    Window,
};

use crate::cache::SparseStore;
use crate::config::{api_root, ScraperConfig};
use crate::error::Result;
use crate::fetch::{PageFetcher, PageQuery};
use crate::http::{HttpClient, Transport};
use crate::types::{CollectionType, Item, DEFAULT_PAGE_SIZE};
use std::collections::HashMap;
use tracing::{debug, info};

/// Items collected by one fetch sequence
#[derive(Debug, Default)]
struct WindowFetch {
    /// The requested slice, in remote order
    items: Vec<Item>,
    /// Collection size to resize the store to; `None` leaves the store alone
    observed_total: Option<usize>,
}

/// Pagination engine bound to one target
pub struct Engine<T: Transport = HttpClient> {
    fetcher: PageFetcher<T>,
    page_size: usize,
    stores: HashMap<CollectionType, SparseStore>,
    links: Option<CommentLinks>,
    site_info: Option<SiteInfo>,
    progress: Box<dyn ProgressReporter>,
    stats: EngineStats,
}

impl<T: Transport> Engine<T> {
    /// Create an engine for an API root such as `http://example.com/wp-json/`
    pub fn new(transport: T, api_root: impl Into<String>) -> Self {
        Self {
            fetcher: PageFetcher::new(transport, api_root),
            page_size: DEFAULT_PAGE_SIZE,
            stores: HashMap::new(),
            links: None,
            site_info: None,
            progress: Box::new(NoProgress),
            stats: EngineStats::default(),
        }
    }

    /// Create an engine from the target, API path and page size of a config
    pub fn from_config(transport: T, config: &ScraperConfig) -> Result<Self> {
        let target = config.normalized_target()?;
        Ok(Self::new(transport, api_root(&target, &config.api_path))
            .with_page_size(config.page_size))
    }

    /// Set the number of items requested per remote page
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Set the progress reporter
    #[must_use]
    pub fn with_progress(mut self, progress: Box<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// The API root URL
    pub fn api_root(&self) -> &str {
        self.fetcher.api_root()
    }

    /// Items requested per remote page
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Request statistics
    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// The cache of a collection type, if anything was fetched yet
    pub fn store(&self, collection: &CollectionType) -> Option<&SparseStore> {
        self.stores.get(collection)
    }

    /// Comments whose post was not cached when linking happened
    pub fn orphans(&self) -> &[Item] {
        self.links
            .as_ref()
            .map(CommentLinks::orphans)
            .unwrap_or_default()
    }

    /// Point the engine at another API root, discarding every cache
    pub fn set_target(&mut self, api_root: impl Into<String>) {
        self.fetcher.set_api_root(api_root);
        self.stores.clear();
        self.links = None;
        self.site_info = None;
        info!("Target set to {}", self.fetcher.api_root());
    }

    /// Replace the transport (new session options), keeping the caches
    pub fn set_transport(&mut self, transport: T) {
        self.fetcher.set_transport(transport);
    }

    /// Drop the cache of a collection type
    pub fn invalidate(&mut self, collection: &CollectionType) {
        self.stores.remove(collection);
        if matches!(collection, CollectionType::Posts | CollectionType::Comments) {
            self.links = None;
        }
    }

    /// List a window of a collection.
    ///
    /// Served from the cache when every slot of the window is materialized
    /// and `force` is not set. Otherwise the pages covering the window are
    /// fetched and merged into the cache; with `force` the cache is replaced.
    pub async fn list(
        &mut self,
        collection: &CollectionType,
        window: Window,
        force: bool,
    ) -> Result<Vec<Item>> {
        if window.num == Some(0) {
            return Ok(Vec::new());
        }

        if !force {
            if let Some(items) = self
                .stores
                .get(collection)
                .and_then(|store| store.read(window.start, window.num))
            {
                debug!("Cache hit for {collection} {window:?}");
                self.stats.add_cache_hit();
                return Ok(items);
            }
        }

        let fetched = self.fetch_window(collection, window, None, true).await?;

        if let Some(total) = fetched.observed_total {
            if force {
                self.invalidate(collection);
            }
            let store = self.stores.entry(collection.clone()).or_default();
            store.merge(fetched.items.clone(), total, window.start);
            debug!(
                "{collection} cache: {} slots, {} unknown",
                store.len(),
                store.unknown_count()
            );
        }

        Ok(fetched.items)
    }

    /// List a window of posts, optionally with their comments.
    ///
    /// The first call asking for comments fetches every comment once and
    /// links it to a cached post by id. Comments matching no cached post
    /// end up in `orphans()`. Linking is redone only after the posts or
    /// comments cache was invalidated.
    pub async fn get_posts(
        &mut self,
        window: Window,
        force: bool,
        with_comments: bool,
    ) -> Result<Vec<LinkedPost>> {
        let posts = self.list(&CollectionType::Posts, window, force).await?;

        if with_comments && self.links.is_none() {
            let comments = self
                .list(&CollectionType::Comments, Window::all(), force)
                .await?;
            let cached_posts = self
                .stores
                .get(&CollectionType::Posts)
                .into_iter()
                .flat_map(|store| store.materialized());
            let links = CommentLinks::build(cached_posts, comments);
            info!(
                "Linked {} comments to posts, {} orphans",
                links.linked_count(),
                links.orphans().len()
            );
            self.links = Some(links);
        }

        let links = self.links.as_ref().filter(|_| with_comments);
        Ok(posts
            .into_iter()
            .map(|post| LinkedPost {
                comments: links
                    .map(|links| links.comments_for(&post).to_vec())
                    .unwrap_or_default(),
                post,
            })
            .collect())
    }

    /// General information about the target, from the API index
    pub async fn basic_info(&mut self, force: bool) -> Result<SiteInfo> {
        if !force {
            if let Some(info) = &self.site_info {
                return Ok(info.clone());
            }
        }

        self.stats.add_request();
        let index = self.fetcher.fetch_root().await?;
        let info = SiteInfo::from_index(index);
        debug!("API index lists namespaces {:?}", info.namespaces);
        self.site_info = Some(info.clone());
        Ok(info)
    }

    /// Run one fetch sequence for a window, reporting progress if asked
    async fn fetch_window(
        &mut self,
        collection: &CollectionType,
        window: Window,
        search: Option<&str>,
        report: bool,
    ) -> Result<WindowFetch> {
        let result = self.fetch_pages(collection, window, search, report).await;
        if report {
            self.progress.finish();
        }
        result
    }

    async fn fetch_pages(
        &mut self,
        collection: &CollectionType,
        window: Window,
        search: Option<&str>,
        report: bool,
    ) -> Result<WindowFetch> {
        let spec = collection.spec();
        let page_size = self.page_size;
        let start = window.start.unwrap_or(0);
        let first_page = start / page_size + 1;
        let page_base = start - start % page_size;
        let per_page =
            (!window.is_unbounded() || page_size != DEFAULT_PAGE_SIZE).then_some(page_size);

        let mut items: Vec<Item> = Vec::new();
        let mut offset = start % page_size;
        let mut raw_seen = 0;
        let mut header_total = None;
        let mut total_pages = None;
        let mut page = first_page;
        let mut pages_fetched = 0;

        let exhausted = loop {
            if window.num.is_some_and(|num| items.len() >= num) {
                break false;
            }
            if total_pages.is_some_and(|pages| page > pages) {
                break true;
            }

            let query = PageQuery {
                per_page,
                search,
                read_totals: page == first_page,
                ..PageQuery::new(&spec.endpoint, page)
            };
            let fetched = self.fetcher.fetch_page(&query).await?;
            self.stats.add_page();
            pages_fetched += 1;

            if page == first_page {
                header_total = fetched.total_count;
                total_pages = fetched.total_pages;

                if let Some(total) = header_total {
                    if start >= total {
                        debug!("{collection}: start {start} is past the end ({total} items)");
                        return Ok(WindowFetch {
                            items: Vec::new(),
                            observed_total: Some(total),
                        });
                    }
                }
                if report {
                    let available = header_total.map(|total| total - start);
                    let needed = match (window.num, available) {
                        (Some(num), Some(available)) => num.min(available),
                        (Some(num), None) => num,
                        (None, Some(available)) => available,
                        (None, None) => 0,
                    };
                    self.progress.begin(&spec.label, needed);
                }
            }

            if fetched.is_empty() {
                break true;
            }
            raw_seen += fetched.items.len();

            let wanted = window.num.map_or(usize::MAX, |num| num - items.len());
            items.extend(fetched.items.into_iter().skip(offset).take(wanted));
            offset = 0;
            if report {
                self.progress.advance(items.len());
            }
            page += 1;
        };

        let fetched_up_to = page_base + raw_seen;
        let observed_total = if exhausted {
            match (raw_seen, header_total) {
                (0, _) if page_base == 0 => Some(0),
                (0, total) => total.map(|total| total.min(page_base)),
                (_, Some(total)) => Some(total.min(fetched_up_to)),
                (_, None) => Some(fetched_up_to),
            }
        } else {
            let known = self.stores.get(collection).map_or(0, SparseStore::len);
            Some(header_total.unwrap_or_else(|| known.max(fetched_up_to)))
        };

        info!(
            "Fetched {} {} in {} pages (total {:?})",
            items.len(),
            spec.label,
            pages_fetched,
            observed_total
        );

        Ok(WindowFetch {
            items,
            observed_total,
        })
    }
}

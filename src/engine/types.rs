//! Engine types
//!
//! Windows, comment linkage, site information, progress reporting and
//! statistics for the pagination engine.

use crate::types::{item_id, CollectionType, Item, JsonObject, JsonValue};
use std::collections::BTreeMap;

/// Per-type search results
pub type SearchResults = BTreeMap<CollectionType, Vec<Item>>;

/// A contiguous slice of a collection: `[start, start + num)`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Window {
    /// First position; `None` means from the beginning
    pub start: Option<usize>,
    /// Number of items; `None` means to the end of the collection
    pub num: Option<usize>,
}

impl Window {
    /// The whole collection
    pub fn all() -> Self {
        Self::default()
    }

    /// A window from optional bounds
    pub fn new(start: Option<usize>, num: Option<usize>) -> Self {
        Self { start, num }
    }

    /// `num` items starting at `start`
    pub fn range(start: usize, num: usize) -> Self {
        Self::new(Some(start), Some(num))
    }

    /// The first `num` items
    pub fn first(num: usize) -> Self {
        Self::new(None, Some(num))
    }

    /// Whether this window asks for the whole collection
    pub fn is_unbounded(&self) -> bool {
        self.num.is_none()
    }
}

/// A post together with the comments linked to it
#[derive(Debug, Clone, PartialEq)]
pub struct LinkedPost {
    /// The post as returned by the API
    pub post: Item,
    /// Comments whose `post` field is this post's id, in remote order
    pub comments: Vec<Item>,
}

/// Comments matched to cached posts, plus those that matched none
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentLinks {
    by_post: Vec<(JsonValue, Vec<Item>)>,
    orphans: Vec<Item>,
}

impl CommentLinks {
    /// Match each comment's `post` field against the ids of `posts`
    pub fn build<'a>(posts: impl Iterator<Item = &'a Item>, comments: Vec<Item>) -> Self {
        let mut by_post: Vec<(JsonValue, Vec<Item>)> = posts
            .filter_map(|post| item_id(post).cloned())
            .map(|id| (id, Vec::new()))
            .collect();
        let mut orphans = Vec::new();

        for comment in comments {
            let position = comment
                .get("post")
                .and_then(|pid| by_post.iter().position(|(id, _)| id == pid));
            match position {
                Some(index) => by_post[index].1.push(comment),
                None => orphans.push(comment),
            }
        }

        Self { by_post, orphans }
    }

    /// Comments linked to a post
    pub fn comments_for(&self, post: &Item) -> &[Item] {
        item_id(post)
            .and_then(|id| self.by_post.iter().find(|(pid, _)| pid == id))
            .map(|(_, comments)| comments.as_slice())
            .unwrap_or_default()
    }

    /// Comments whose post is not cached
    pub fn orphans(&self) -> &[Item] {
        &self.orphans
    }

    /// Number of comments linked to some post
    pub fn linked_count(&self) -> usize {
        self.by_post.iter().map(|(_, c)| c.len()).sum()
    }
}

/// General information from the API index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteInfo {
    /// Site title
    pub name: Option<String>,
    /// Tagline
    pub description: Option<String>,
    /// Public address of the site
    pub home: Option<String>,
    /// Offset from GMT in hours, as sent
    pub gmt_offset: Option<String>,
    /// Timezone name, e.g. `Europe/Paris`
    pub timezone_string: Option<String>,
    /// API namespaces the site serves, e.g. `wp/v2`
    pub namespaces: Vec<String>,
    /// The full index document
    pub raw: JsonObject,
}

impl SiteInfo {
    /// Extract the interesting fields of the API index
    pub fn from_index(index: JsonObject) -> Self {
        let text = |key: &str| match index.get(key) {
            Some(JsonValue::String(s)) => Some(s.clone()),
            Some(JsonValue::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        let namespaces = index
            .get("namespaces")
            .and_then(JsonValue::as_array)
            .map(|ns| {
                ns.iter()
                    .filter_map(|n| n.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            name: text("name"),
            description: text("description"),
            home: text("home"),
            gmt_offset: text("gmt_offset"),
            timezone_string: text("timezone_string"),
            namespaces,
            raw: index,
        }
    }

    /// Whether the site exposes the `wp/v2` namespace
    pub fn has_v2(&self) -> bool {
        self.namespaces.iter().any(|ns| ns == "wp/v2")
    }

    /// Timezone as "Europe/Paris (GMT+1)"
    pub fn timezone(&self) -> Option<String> {
        let offset = self.gmt_offset.as_deref()?;
        let offset = if offset.starts_with('-') {
            offset.to_string()
        } else {
            format!("+{offset}")
        };
        let tz = self.timezone_string.as_deref().unwrap_or_default();
        Some(format!("{tz} (GMT{offset})").trim_start().to_string())
    }
}

/// Receives fetch progress. Display only.
pub trait ProgressReporter: Send {
    /// A fetch of `needed` items started
    fn begin(&mut self, label: &str, needed: usize);
    /// `done` of the needed items have been fetched so far
    fn advance(&mut self, done: usize);
    /// The fetch finished or failed
    fn finish(&mut self);
}

/// Progress reporter that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn begin(&mut self, _label: &str, _needed: usize) {}
    fn advance(&mut self, _done: usize) {}
    fn finish(&mut self) {}
}

/// Statistics for an engine instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Requests issued to the remote API
    pub requests: usize,
    /// Collection pages fetched
    pub pages: usize,
    /// Windows served entirely from cache
    pub cache_hits: usize,
}

impl EngineStats {
    /// Record a page request
    pub fn add_page(&mut self) {
        self.pages += 1;
        self.requests += 1;
    }

    /// Record a non-page request
    pub fn add_request(&mut self) {
        self.requests += 1;
    }

    /// Record a cache hit
    pub fn add_cache_hit(&mut self) {
        self.cache_hits += 1;
    }
}

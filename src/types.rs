//! Common types used throughout wpjson-scraper
//!
//! This module contains shared type aliases and the collection type table
//! that maps each remote resource kind to its endpoint and export layout.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// A record returned by the remote API. Only its `id` field is ever read.
pub type Item = JsonValue;

/// Items per page the WordPress REST API uses when `per_page` is absent
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Get the `id` field of an item, if it has one
pub fn item_id(item: &Item) -> Option<&JsonValue> {
    item.get("id")
}

/// Check whether an item's `id` equals the given identifier
pub fn item_has_id(item: &Item, id: u64) -> bool {
    item_id(item).and_then(JsonValue::as_u64) == Some(id)
}

// ============================================================================
// Collection Types
// ============================================================================

/// A kind of remote resource, each with its own endpoint and cache
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionType {
    /// `wp/v2/posts`
    Posts,
    /// `wp/v2/pages`
    Pages,
    /// `wp/v2/users`
    Users,
    /// `wp/v2/tags`
    Tags,
    /// `wp/v2/categories`
    Categories,
    /// `wp/v2/comments`
    Comments,
    /// `wp/v2/media`
    Media,
    /// An arbitrary route under the API root, e.g. `wp/v2/block-types`
    Namespace(String),
}

/// A column in a CSV/Parquet export: header name and JSON pointer into the item
pub type ExportColumn = (&'static str, &'static str);

/// Static description of a collection type
#[derive(Debug, Clone)]
pub struct CollectionSpec {
    /// Endpoint path relative to the API root
    pub endpoint: Cow<'static, str>,
    /// Human-readable label
    pub label: Cow<'static, str>,
    /// Whether the endpoint accepts a `search` parameter
    pub searchable: bool,
    /// Columns used when exporting to tabular formats (empty = infer)
    pub export_columns: &'static [ExportColumn],
}

const POST_COLUMNS: &[ExportColumn] = &[
    ("id", "/id"),
    ("date", "/date"),
    ("title", "/title/rendered"),
    ("link", "/link"),
    ("status", "/status"),
    ("author", "/author"),
];

const PAGE_COLUMNS: &[ExportColumn] = &[
    ("id", "/id"),
    ("date", "/date"),
    ("title", "/title/rendered"),
    ("link", "/link"),
    ("status", "/status"),
    ("author", "/author"),
    ("parent", "/parent"),
];

const USER_COLUMNS: &[ExportColumn] = &[
    ("id", "/id"),
    ("name", "/name"),
    ("slug", "/slug"),
    ("link", "/link"),
    ("description", "/description"),
];

const TERM_COLUMNS: &[ExportColumn] = &[
    ("id", "/id"),
    ("name", "/name"),
    ("slug", "/slug"),
    ("count", "/count"),
    ("link", "/link"),
    ("description", "/description"),
];

const CATEGORY_COLUMNS: &[ExportColumn] = &[
    ("id", "/id"),
    ("name", "/name"),
    ("slug", "/slug"),
    ("count", "/count"),
    ("parent", "/parent"),
    ("link", "/link"),
    ("description", "/description"),
];

const COMMENT_COLUMNS: &[ExportColumn] = &[
    ("id", "/id"),
    ("post", "/post"),
    ("author_name", "/author_name"),
    ("date", "/date"),
    ("link", "/link"),
    ("content", "/content/rendered"),
];

const MEDIA_COLUMNS: &[ExportColumn] = &[
    ("id", "/id"),
    ("date", "/date"),
    ("title", "/title/rendered"),
    ("media_type", "/media_type"),
    ("mime_type", "/mime_type"),
    ("source_url", "/source_url"),
];

impl CollectionType {
    /// All built-in collection types, in display order
    pub fn builtin() -> [CollectionType; 7] {
        [
            Self::Posts,
            Self::Pages,
            Self::Users,
            Self::Tags,
            Self::Categories,
            Self::Comments,
            Self::Media,
        ]
    }

    /// Built-in collection types whose endpoint supports keyword search
    pub fn searchable() -> Vec<CollectionType> {
        Self::builtin()
            .into_iter()
            .filter(|c| c.spec().searchable)
            .collect()
    }

    /// Create a namespace collection for an arbitrary route
    pub fn namespace(route: impl AsRef<str>) -> Self {
        Self::Namespace(route.as_ref().trim_matches('/').to_string())
    }

    /// Look up the endpoint/label/export layout for this type
    pub fn spec(&self) -> CollectionSpec {
        let (endpoint, label, columns): (&'static str, &'static str, &'static [ExportColumn]) =
            match self {
                Self::Posts => ("wp/v2/posts", "posts", POST_COLUMNS),
                Self::Pages => ("wp/v2/pages", "pages", PAGE_COLUMNS),
                Self::Users => ("wp/v2/users", "users", USER_COLUMNS),
                Self::Tags => ("wp/v2/tags", "tags", TERM_COLUMNS),
                Self::Categories => ("wp/v2/categories", "categories", CATEGORY_COLUMNS),
                Self::Comments => ("wp/v2/comments", "comments", COMMENT_COLUMNS),
                Self::Media => ("wp/v2/media", "media", MEDIA_COLUMNS),
                Self::Namespace(route) => {
                    return CollectionSpec {
                        endpoint: Cow::Owned(route.clone()),
                        label: Cow::Owned(format!("namespace {route}")),
                        searchable: false,
                        export_columns: &[],
                    }
                }
            };

        CollectionSpec {
            endpoint: Cow::Borrowed(endpoint),
            label: Cow::Borrowed(label),
            searchable: true,
            export_columns: columns,
        }
    }
}

impl fmt::Display for CollectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec().label)
    }
}

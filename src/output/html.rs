//! One HTML page per post
//!
//! Author, category and tag ids are named from whatever users, categories
//! and tags are cached when the export runs. Nothing is fetched here.

use crate::cache::SparseStore;
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::http::Transport;
use crate::types::{item_id, CollectionType, Item, JsonValue};
use chrono::NaiveDateTime;
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fs;
use std::path::Path;
use tracing::debug;

const UNKNOWN: &str = "Unknown";

/// Cached collections used to name the ids a post refers to
#[derive(Debug, Clone, Copy, Default)]
pub struct References<'a> {
    /// Cached users, naming the author
    pub users: Option<&'a SparseStore>,
    /// Cached categories
    pub categories: Option<&'a SparseStore>,
    /// Cached tags
    pub tags: Option<&'a SparseStore>,
}

impl<'a> References<'a> {
    /// The users, categories and tags cached by an engine
    pub fn from_engine<T: Transport>(engine: &'a Engine<T>) -> Self {
        Self {
            users: engine.store(&CollectionType::Users),
            categories: engine.store(&CollectionType::Categories),
            tags: engine.store(&CollectionType::Tags),
        }
    }
}

/// Write every post to `<folder>/<slug>.html` (or `<id>.html` without a
/// usable slug), creating the folder. Returns the number of files written.
pub fn export_posts_html(
    posts: &[Item],
    folder: impl AsRef<Path>,
    refs: &References<'_>,
) -> Result<usize> {
    let folder = folder.as_ref();
    fs::create_dir_all(folder).map_err(|e| {
        Error::output(format!(
            "Failed to create folder '{}': {e}",
            folder.display()
        ))
    })?;

    for post in posts {
        let path = folder.join(file_name(post));
        fs::write(&path, render_post(post, refs)).map_err(|e| {
            Error::output(format!("Failed to create file '{}': {e}", path.display()))
        })?;
        debug!("Wrote {}", path.display());
    }
    Ok(posts.len())
}

/// File name of a post page
pub(crate) fn file_name(post: &Item) -> String {
    let slug = post
        .get("slug")
        .and_then(JsonValue::as_str)
        .filter(|slug| !slug.is_empty() && !slug.starts_with('.') && !slug.contains(['/', '\\']));
    match slug {
        Some(slug) => format!("{slug}.html"),
        None => format!("{}.html", id_text(post)),
    }
}

/// The full page of one post
pub(crate) fn render_post(post: &Item, refs: &References<'_>) -> String {
    let title = rendered(post, "title");
    let link = post
        .get("link")
        .and_then(JsonValue::as_str)
        .map_or_else(|| UNKNOWN.to_string(), |link| encode_double_quoted_attribute(link).into_owned());

    format!(
        r#"<!DOCTYPE html>
<html>
    <head>
        <title>{title}</title>
    </head>
    <body>
        <div>
            <h1>Metadata</h1>
            <ul>
                <li><strong>Date (GMT):</strong> {date}</li>
                <li><strong>Date modified (GMT):</strong> {modified}</li>
                <li><strong>Status:</strong> {status}</li>
                <li><strong>Type:</strong> {post_type}</li>
                <li><strong>Link:</strong> <a href="{link}">{link}</a></li>
                <li><strong>Author:</strong> {author}</li>
                <li><strong>Comment status:</strong> {comments}</li>
                <li>
                    <strong>Categories:</strong>
                    <ul>
                        {categories}
                    </ul>
                </li>
                <li>
                    <strong>Tags:</strong>
                    <ul>
                        {tags}
                    </ul>
                </li>
            </ul>
        </div>
        <div>
            <h1>Excerpt</h1>
            {excerpt}
        </div>
        <div>
            <h1>{title}</h1>
            {content}
        </div>
    </body>
</html>
"#,
        date = gmt_date(post, "date_gmt"),
        modified = gmt_date(post, "modified_gmt"),
        status = plain_field(post, "status"),
        post_type = plain_field(post, "type"),
        author = author(post, refs.users),
        comments = plain_field(post, "comment_status"),
        categories = term_list(post, "categories", refs.categories),
        tags = term_list(post, "tags", refs.tags),
        excerpt = rendered(post, "excerpt"),
        content = rendered(post, "content"),
    )
}

/// Already rendered HTML such as `title.rendered`, inserted as is
fn rendered(post: &Item, field: &str) -> String {
    post.get(field)
        .and_then(|value| value.get("rendered"))
        .and_then(JsonValue::as_str)
        .unwrap_or(UNKNOWN)
        .to_string()
}

fn plain_field(post: &Item, field: &str) -> String {
    post.get(field)
        .and_then(JsonValue::as_str)
        .map_or_else(|| UNKNOWN.to_string(), |text| encode_text(text).into_owned())
}

fn gmt_date(post: &Item, field: &str) -> String {
    post.get(field)
        .and_then(JsonValue::as_str)
        .and_then(|raw| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").ok())
        .map_or_else(
            || UNKNOWN.to_string(),
            |date| date.format("%d/%m/%Y %H:%M:%S").to_string(),
        )
}

fn id_text(item: &Item) -> String {
    match item_id(item) {
        Some(JsonValue::String(id)) => id.clone(),
        Some(JsonValue::Null) | None => "unknown".to_string(),
        Some(id) => id.to_string(),
    }
}

fn author(post: &Item, users: Option<&SparseStore>) -> String {
    match post.get("author") {
        Some(id @ JsonValue::Number(_)) => reference(id, users, true),
        _ => UNKNOWN.to_string(),
    }
}

fn term_list(post: &Item, field: &str, terms: Option<&SparseStore>) -> String {
    match post.get(field).and_then(JsonValue::as_array) {
        Some(ids) => ids
            .iter()
            .map(|id| format!("<li>{}</li>", reference(id, terms, false)))
            .collect::<Vec<_>>()
            .join("\n                        "),
        None => format!("<li>{UNKNOWN}</li>"),
    }
}

/// `id: name (slug) - <a href="link">link</a>`, as far as the cache knows
fn reference(id: &JsonValue, cache: Option<&SparseStore>, with_slug: bool) -> String {
    let mut out = id.to_string();
    let Some(item) = id
        .as_u64()
        .and_then(|id| cache.and_then(|store| store.find_by_id(id)))
    else {
        return out;
    };

    let text = |field: &str| item.get(field).and_then(JsonValue::as_str);
    out.push(':');
    if let Some(name) = text("name") {
        out.push(' ');
        out.push_str(&encode_text(name));
    }
    if let Some(slug) = text("slug").filter(|_| with_slug) {
        out.push_str(&format!(" ({})", encode_text(slug)));
    }
    if let Some(link) = text("link") {
        let link = encode_double_quoted_attribute(link);
        out.push_str(&format!(r#" - <a href="{link}">{link}</a>"#));
    }
    out
}

//! Console rendering of items, posts and site information

use crate::engine::{LinkedPost, SearchResults, SiteInfo};
use crate::types::{CollectionType, Item, JsonValue};
use chrono::NaiveDateTime;
use html_escape::decode_html_entities;
use std::fmt::Write;

const EXCERPT_CHARS: usize = 80;

/// Render a list of items of one collection type
pub fn render_items(collection: &CollectionType, items: &[Item]) -> String {
    let mut out = String::new();
    for item in items {
        render_item(&mut out, collection, item);
    }
    out
}

/// Render posts, each followed by its linked comments
pub fn render_posts(posts: &[LinkedPost]) -> String {
    let mut out = String::new();
    for linked in posts {
        render_item(&mut out, &CollectionType::Posts, &linked.post);
        for comment in &linked.comments {
            let _ = writeln!(
                out,
                "    {} by {}: {}",
                date(comment),
                unescape(&text(comment, "/author_name")),
                excerpt(&text(comment, "/content/rendered"))
            );
        }
    }
    out
}

/// Render comments whose post is not cached
pub fn render_orphans(orphans: &[Item]) -> String {
    if orphans.is_empty() {
        return String::new();
    }
    let mut out = format!("{} comments on posts not listed:\n", orphans.len());
    for comment in orphans {
        let _ = writeln!(
            out,
            "  post {} - {} by {}: {}",
            text(comment, "/post"),
            date(comment),
            unescape(&text(comment, "/author_name")),
            excerpt(&text(comment, "/content/rendered"))
        );
    }
    out
}

/// Render search results grouped by type
pub fn render_search(results: &SearchResults) -> String {
    let mut out = String::new();
    for (collection, items) in results {
        let _ = writeln!(out, "{} {collection} found", items.len());
        out.push_str(&render_items(collection, items));
    }
    out
}

/// Render the site information block
pub fn render_site_info(info: &SiteInfo) -> String {
    let mut out = String::new();
    let fields = [
        ("Site name", info.name.as_deref().map(unescape)),
        ("Description", info.description.as_deref().map(unescape)),
        ("Address", info.home.as_deref().map(unescape)),
        ("Timezone", info.timezone()),
    ];
    for (label, value) in fields {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            let _ = writeln!(out, "{label}: {value}");
        }
    }
    if !info.namespaces.is_empty() {
        let _ = writeln!(out, "Namespaces (API provided by addons):");
        for namespace in &info.namespaces {
            let _ = match namespace_tip(namespace) {
                Some(tip) => writeln!(out, "    {namespace} - {tip}"),
                None => writeln!(out, "    {namespace}"),
            };
        }
    }
    out
}

fn namespace_tip(namespace: &str) -> Option<&'static str> {
    match namespace {
        "oembed/1.0" => Some("Allows embedded representation of a URL"),
        "wp/v2" => Some("The API integrated by default with WordPress 4.7"),
        _ => None,
    }
}

fn render_item(out: &mut String, collection: &CollectionType, item: &Item) {
    let id = text(item, "/id");
    let _ = match collection {
        CollectionType::Posts | CollectionType::Pages => writeln!(
            out,
            "{id}: {} - {} - {}",
            plain(&text(item, "/title/rendered")),
            date(item),
            text(item, "/link")
        ),
        CollectionType::Users => writeln!(
            out,
            "{id}: {} ({}) - {}",
            unescape(&text(item, "/name")),
            text(item, "/slug"),
            text(item, "/link")
        ),
        CollectionType::Tags | CollectionType::Categories => writeln!(
            out,
            "{id}: {} ({} posts) - {}",
            unescape(&text(item, "/name")),
            text(item, "/count"),
            text(item, "/link")
        ),
        CollectionType::Comments => writeln!(
            out,
            "{id}: post {} - {} by {}: {}",
            text(item, "/post"),
            date(item),
            unescape(&text(item, "/author_name")),
            excerpt(&text(item, "/content/rendered"))
        ),
        CollectionType::Media => writeln!(
            out,
            "{id}: {} [{}] - {}",
            plain(&text(item, "/title/rendered")),
            text(item, "/mime_type"),
            text(item, "/source_url")
        ),
        CollectionType::Namespace(_) => writeln!(
            out,
            "{}",
            serde_json::to_string_pretty(item).unwrap_or_default()
        ),
    };
}

/// Text at a JSON pointer; empty when absent or null
fn text(item: &Item, pointer: &str) -> String {
    match item.pointer(pointer) {
        None | Some(JsonValue::Null) => String::new(),
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// The `date` field as "2024-03-01 10:00", or as sent if not a WordPress date
fn date(item: &Item) -> String {
    let raw = text(item, "/date");
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S")
        .map(|date| date.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or(raw)
}

/// Drop HTML tags, keeping the text between them
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Decode HTML entities such as `&#8217;` and `&amp;`
fn unescape(text: &str) -> String {
    decode_html_entities(text).into_owned()
}

/// Text content of rendered HTML
fn plain(html: &str) -> String {
    unescape(&strip_tags(html))
}

/// First line of the text content, shortened
fn excerpt(html: &str) -> String {
    let content = plain(html);
    let line = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if line.chars().count() > EXCERPT_CHARS {
        let short: String = line.chars().take(EXCERPT_CHARS).collect();
        format!("{short}...")
    } else {
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_render_posts_with_comments() {
        let posts = vec![LinkedPost {
            post: json!({
                "id": 1,
                "date": "2024-03-01T10:00:00",
                "title": {"rendered": "Hello <em>world</em>"},
                "link": "http://example.com/hello/"
            }),
            comments: vec![json!({
                "id": 9,
                "post": 1,
                "date": "2024-03-02T08:00:00",
                "author_name": "Ann",
                "content": {"rendered": "<p>Nice\npost</p>\n"}
            })],
        }];

        assert_eq!(
            render_posts(&posts),
            "1: Hello world - 2024-03-01 10:00 - http://example.com/hello/\n    \
             2024-03-02 08:00 by Ann: Nice post\n"
        );
    }

    #[test]
    fn test_date_falls_back_to_raw_text() {
        assert_eq!(date(&json!({"date": "yesterday"})), "yesterday");
        assert_eq!(date(&json!({})), "");
    }

    #[test]
    fn test_render_terms() {
        let items = vec![json!({"id": 3, "name": "News", "count": 12, "link": "http://x/news/"})];
        assert_eq!(
            render_items(&CollectionType::Categories, &items),
            "3: News (12 posts) - http://x/news/\n"
        );
    }

    #[test]
    fn test_render_orphans() {
        assert_eq!(render_orphans(&[]), "");
        let rendered = render_orphans(&[json!({"id": 2, "post": 99, "author_name": "Bob"})]);
        assert!(rendered.starts_with("1 comments on posts not listed:"));
        assert!(rendered.contains("post 99"));
    }

    #[test]
    fn test_render_site_info_skips_missing_fields() {
        let info = SiteInfo {
            name: Some("My Blog".into()),
            description: Some(String::new()),
            namespaces: vec!["wp/v2".into()],
            ..SiteInfo::default()
        };
        assert_eq!(
            render_site_info(&info),
            "Site name: My Blog\nNamespaces (API provided by addons):\n    \
             wp/v2 - The API integrated by default with WordPress 4.7\n"
        );
    }

    #[test]
    fn test_site_info_entities_are_decoded() {
        let info = SiteInfo {
            name: Some("Ann&#8217;s &amp; Bob&#039;s".into()),
            description: Some("Tips &lt;daily&gt;".into()),
            namespaces: vec!["oembed/1.0".into(), "acme/v1".into()],
            ..SiteInfo::default()
        };
        let rendered = render_site_info(&info);
        assert!(rendered.contains("Site name: Ann\u{2019}s & Bob's\n"));
        assert!(rendered.contains("Description: Tips <daily>\n"));
        assert!(rendered.contains("    oembed/1.0 - Allows embedded representation of a URL\n"));
        assert!(rendered.contains("    acme/v1\n"));
    }

    #[test]
    fn test_titles_and_names_are_decoded() {
        let posts = vec![json!({"id": 4, "title": {"rendered": "Rock &amp; <b>roll</b>"}})];
        assert!(render_items(&CollectionType::Posts, &posts).starts_with("4: Rock & roll - "));

        let users = vec![json!({"id": 2, "name": "Jos&eacute;", "slug": "jose"})];
        assert!(render_items(&CollectionType::Users, &users).starts_with("2: José (jose)"));
    }

    #[test]
    fn test_excerpt_is_shortened() {
        let long = "word ".repeat(40);
        let short = excerpt(&long);
        assert!(short.ends_with("..."));
        assert_eq!(short.chars().count(), EXCERPT_CHARS + 3);
    }
}

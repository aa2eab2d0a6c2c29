//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: YAML config → engine → HTTP requests →
//! cached windows → JSON/CSV/Parquet export

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::fs;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wpjson_scraper::error::ConnectionFailure;
use wpjson_scraper::fetch::{TOTAL_HEADER, TOTAL_PAGES_HEADER};
use wpjson_scraper::output::{export_items, ExportFormat, References};
use wpjson_scraper::{
    CollectionType, Engine, Error, HttpClient, HttpClientConfig, ScraperConfig, Window,
};

fn post(id: u64) -> Value {
    json!({
        "id": id,
        "date": format!("2024-01-{:02}T12:00:00", id % 28 + 1),
        "title": {"rendered": format!("Post {id}")},
        "link": format!("http://blog.example/post-{id}/"),
        "status": "publish",
        "author": 1
    })
}

fn posts_page(ids: std::ops::Range<u64>, total: u64) -> ResponseTemplate {
    let pages = total.div_ceil(10);
    ResponseTemplate::new(200)
        .insert_header(TOTAL_HEADER, total.to_string().as_str())
        .insert_header(TOTAL_PAGES_HEADER, pages.to_string().as_str())
        .set_body_json(ids.map(post).collect::<Vec<_>>())
}

/// Mount a blog with 25 posts, 3 comments, one user and an API index
async fn mount_blog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/wp-json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Example Blog",
            "description": "Notes",
            "home": "http://blog.example",
            "gmt_offset": "1",
            "timezone_string": "Europe/Paris",
            "namespaces": ["oembed/1.0", "wp/v2"]
        })))
        .mount(server)
        .await;

    for (page, ids) in [(1, 0..10), (2, 10..20), (3, 20..25)] {
        Mock::given(method("GET"))
            .and(path("/wp-json/wp/v2/posts"))
            .and(query_param("page", page.to_string().as_str()))
            .respond_with(posts_page(ids, 25))
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/comments"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(TOTAL_HEADER, "3")
                .insert_header(TOTAL_PAGES_HEADER, "1")
                .set_body_json(json!([
                    {"id": 100, "post": 3, "author_name": "Ann", "content": {"rendered": "<p>First</p>"}},
                    {"id": 101, "post": 3, "author_name": "Bob", "content": {"rendered": "<p>Second</p>"}},
                    {"id": 102, "post": 24, "author_name": "Cy", "content": {"rendered": "<p>Late</p>"}}
                ])),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "name": "admin", "slug": "admin"
        })))
        .mount(server)
        .await;
}

fn engine_for(server: &MockServer) -> Engine {
    let config = ScraperConfig::from_yaml_str(&format!("target: {}\n", server.uri())).unwrap();
    let client = HttpClient::with_config(HttpClientConfig::from_scraper_config(&config)).unwrap();
    Engine::from_config(client, &config).unwrap()
}

// ============================================================================
// End-to-End Tests
// ============================================================================

#[tokio::test]
async fn test_blog_walkthrough() {
    let server = MockServer::start().await;
    mount_blog(&server).await;
    let mut engine = engine_for(&server);

    let info = engine.basic_info(false).await.unwrap();
    assert_eq!(info.name.as_deref(), Some("Example Blog"));
    assert_eq!(info.timezone().as_deref(), Some("Europe/Paris (GMT+1)"));
    assert!(info.has_v2());

    // First page of posts with their comments; post 24 is not cached yet
    let posts = engine.get_posts(Window::first(10), false, true).await.unwrap();
    assert_eq!(posts.len(), 10);
    assert_eq!(posts[3].post["id"], 3);
    assert_eq!(posts[3].comments.len(), 2);
    assert_eq!(engine.orphans().len(), 1);
    assert_eq!(engine.orphans()[0]["post"], 24);

    // The tail comes from page 3 only
    let requests_before = engine.stats().pages;
    let tail = engine
        .list(&CollectionType::Posts, Window::range(20, 5), false)
        .await
        .unwrap();
    assert_eq!(tail, (20..25).map(post).collect::<Vec<_>>());
    assert_eq!(engine.stats().pages, requests_before + 1);

    // Single lookups are not positioned in the cache
    let user = engine.get_by_id(&CollectionType::Users, 1, true).await.unwrap();
    assert_eq!(user[0]["name"], "admin");
    assert!(engine.store(&CollectionType::Users).is_none());

    let store = engine.store(&CollectionType::Posts).unwrap();
    assert_eq!(store.len(), 25);
    assert_eq!(store.unknown_count(), 10);
}

#[tokio::test]
async fn test_session_options_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blog/api/wp/v2/tags"))
        .and(header("Authorization", "Basic YWRtaW46c2VjcmV0"))
        .and(header("Cookie", "wordpress_logged_in=abc"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "20"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(TOTAL_HEADER, "1")
                .insert_header(TOTAL_PAGES_HEADER, "1")
                .set_body_json(json!([{"id": 7, "name": "rust", "count": 3}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let yaml = format!(
        r"
target: {}/blog
api_path: /api/
page_size: 20
cookies: wordpress_logged_in=abc
credentials:
  username: admin
  password: secret
",
        server.uri()
    );
    let config = ScraperConfig::from_yaml_str(&yaml).unwrap();
    let client = HttpClient::with_config(HttpClientConfig::from_scraper_config(&config)).unwrap();
    let mut engine = Engine::from_config(client, &config).unwrap();

    assert_eq!(engine.api_root(), format!("{}/blog/api/", server.uri()));
    let tags = engine
        .list(&CollectionType::Tags, Window::first(5), false)
        .await
        .unwrap();
    assert_eq!(tags.len(), 1);
}

#[tokio::test]
async fn test_listing_exports_to_every_format() {
    let server = MockServer::start().await;
    mount_blog(&server).await;
    let mut engine = engine_for(&server);
    let dir = tempfile::tempdir().unwrap();

    let posts = engine
        .list(&CollectionType::Posts, Window::range(10, 10), false)
        .await
        .unwrap();

    for format in [ExportFormat::Json, ExportFormat::Csv, ExportFormat::Parquet] {
        let file = dir.path().join(format!("posts.{format}"));
        let rows = export_items(
            &CollectionType::Posts,
            &posts,
            format,
            &file,
            &References::from_engine(&engine),
        )
        .unwrap();
        assert_eq!(rows, 10);
        assert!(fs::metadata(&file).unwrap().len() > 0);
    }

    let csv = fs::read_to_string(dir.path().join("posts.csv")).unwrap();
    assert!(csv.starts_with("id,date,title,link,status,author\n10,"));
}

#[tokio::test]
async fn test_search_spans_types_without_caching() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/posts"))
        .and(query_param("search", "release"))
        .respond_with(posts_page(5..7, 2))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/pages"))
        .and(query_param("search", "release"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let mut engine = engine_for(&server);
    let results = engine
        .search(
            &[CollectionType::Posts, CollectionType::Pages],
            "release",
            Window::all(),
        )
        .await
        .unwrap();

    assert_eq!(results[&CollectionType::Posts].len(), 2);
    assert!(results[&CollectionType::Pages].is_empty());
    assert!(engine.store(&CollectionType::Posts).is_none());
}

#[tokio::test]
async fn test_html_export_names_cached_authors_and_categories() {
    let server = MockServer::start().await;
    mount_blog(&server).await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(TOTAL_HEADER, "1")
                .insert_header(TOTAL_PAGES_HEADER, "1")
                .set_body_json(json!([{"id": 1, "name": "Site Admin", "slug": "admin"}])),
        )
        .expect(1)
        .mount(&server)
        .await;
    let mut engine = engine_for(&server);
    let dir = tempfile::tempdir().unwrap();

    engine
        .list(&CollectionType::Users, Window::all(), false)
        .await
        .unwrap();
    let posts = engine
        .list(&CollectionType::Posts, Window::first(2), false)
        .await
        .unwrap();
    let rows = export_items(
        &CollectionType::Posts,
        &posts,
        ExportFormat::Html,
        dir.path().join("html"),
        &References::from_engine(&engine),
    )
    .unwrap();

    assert_eq!(rows, 2);
    let page = fs::read_to_string(dir.path().join("html").join("1.html")).unwrap();
    assert!(page.contains("<strong>Author:</strong> 1: Site Admin (admin)"));
    assert!(page.contains("<title>Post 1</title>"));
}

// ============================================================================
// Failure Tests
// ============================================================================

#[tokio::test]
async fn test_site_without_rest_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<html>Not Found</html>"))
        .mount(&server)
        .await;

    let mut engine = engine_for(&server);

    let err = engine.basic_info(false).await.unwrap_err();
    assert!(err.is_protocol_unsupported());

    let err = engine
        .list(&CollectionType::Posts, Window::all(), false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ProtocolUnsupported { .. }));
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = ScraperConfig::from_yaml_str(&format!("target: 127.0.0.1:{port}\n")).unwrap();
    let client = HttpClient::with_config(HttpClientConfig::from_scraper_config(&config)).unwrap();
    let mut engine = Engine::from_config(client, &config).unwrap();

    let err = engine
        .list(&CollectionType::Posts, Window::all(), false)
        .await
        .unwrap_err();

    assert!(err.is_transport());
    assert!(matches!(
        err,
        Error::Connection {
            kind: ConnectionFailure::Refused,
            ..
        }
    ));
    assert!(err.to_string().starts_with("Connection refused by"));
    assert!(engine.store(&CollectionType::Posts).is_none());
}

#[tokio::test]
async fn test_changing_target_discards_cache() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    mount_blog(&first).await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/posts"))
        .respond_with(posts_page(100..103, 3))
        .expect(1)
        .mount(&second)
        .await;

    let mut engine = engine_for(&first);
    engine
        .list(&CollectionType::Posts, Window::all(), false)
        .await
        .unwrap();

    engine.set_target(format!("{}/wp-json/", second.uri()));
    let posts = engine
        .list(&CollectionType::Posts, Window::all(), false)
        .await
        .unwrap();

    assert_eq!(posts, (100..103).map(post).collect::<Vec<_>>());
    assert_eq!(engine.store(&CollectionType::Posts).unwrap().len(), 3);
}

//! Tests for the page fetcher

use super::*;
use crate::error::Error;
use crate::http::{HttpClient, HttpClientConfig};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(server: &MockServer) -> PageFetcher<HttpClient> {
    let client = HttpClient::with_config(HttpClientConfig::default()).unwrap();
    PageFetcher::new(client, format!("{}/wp-json", server.uri()))
}

fn posts(ids: std::ops::Range<u64>) -> serde_json::Value {
    json!(ids.map(|id| json!({"id": id})).collect::<Vec<_>>())
}

#[test]
fn test_fetched_page_exhausted() {
    let page = FetchedPage::exhausted();
    assert!(page.is_empty());
    assert!(page.total_count.is_none());
    assert!(page.total_pages.is_none());
}

#[test]
fn test_endpoint_url() {
    let client = HttpClient::with_config(HttpClientConfig::default()).unwrap();
    let mut fetcher = PageFetcher::new(client, "http://example.com/wp-json");
    assert_eq!(fetcher.api_root(), "http://example.com/wp-json/");
    assert_eq!(
        fetcher.endpoint_url("/wp/v2/posts"),
        "http://example.com/wp-json/wp/v2/posts"
    );

    fetcher.set_api_root("http://other.org/api/");
    assert_eq!(
        fetcher.endpoint_url("wp/v2/users"),
        "http://other.org/api/wp/v2/users"
    );
}

#[tokio::test]
async fn test_fetch_page_reads_totals() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/posts"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "10"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(TOTAL_HEADER, "25")
                .insert_header(TOTAL_PAGES_HEADER, "3")
                .set_body_json(posts(0..10)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let query = PageQuery {
        per_page: Some(10),
        read_totals: true,
        ..PageQuery::new("wp/v2/posts", 1)
    };
    let page = fetcher(&server).fetch_page(&query).await.unwrap();

    assert_eq!(page.items.len(), 10);
    assert_eq!(page.items[0]["id"], 0);
    assert_eq!(page.total_count, Some(25));
    assert_eq!(page.total_pages, Some(3));
}

#[tokio::test]
async fn test_fetch_page_ignores_totals_when_not_asked() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/posts"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(TOTAL_HEADER, "25")
                .set_body_json(posts(10..20)),
        )
        .mount(&server)
        .await;

    let page = fetcher(&server)
        .fetch_page(&PageQuery::new("wp/v2/posts", 2))
        .await
        .unwrap();

    assert_eq!(page.items.len(), 10);
    assert!(page.total_count.is_none());
}

#[tokio::test]
async fn test_fetch_page_sends_search() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/pages"))
        .and(query_param("search", "about us"))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts(0..2)))
        .expect(1)
        .mount(&server)
        .await;

    let query = PageQuery {
        search: Some("about us"),
        ..PageQuery::new("wp/v2/pages", 1)
    };
    let page = fetcher(&server).fetch_page(&query).await.unwrap();
    assert_eq!(page.items.len(), 2);
}

#[tokio::test]
async fn test_bad_request_on_first_page_is_protocol_unsupported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let err = fetcher(&server)
        .fetch_page(&PageQuery::new("wp/v2/posts", 1))
        .await
        .unwrap_err();
    assert!(err.is_protocol_unsupported());
}

#[tokio::test]
async fn test_bad_request_after_first_page_ends_data() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "rest_post_invalid_page_number"
        })))
        .mount(&server)
        .await;

    let page = fetcher(&server)
        .fetch_page(&PageQuery::new("wp/v2/posts", 4))
        .await
        .unwrap();
    assert!(page.is_empty());
}

#[tokio::test]
async fn test_malformed_body_on_first_page_is_protocol_unsupported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = fetcher(&server)
        .fetch_page(&PageQuery::new("wp/v2/posts", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ProtocolUnsupported { .. }));
}

#[tokio::test]
async fn test_malformed_body_after_first_page_ends_data() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"truncated\": "))
        .mount(&server)
        .await;

    let page = fetcher(&server)
        .fetch_page(&PageQuery::new("wp/v2/posts", 3))
        .await
        .unwrap();
    assert!(page.is_empty());
}

#[tokio::test]
async fn test_server_error_propagates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;

    let err = fetcher(&server)
        .fetch_page(&PageQuery::new("wp/v2/posts", 2))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 503, .. }));
}

#[tokio::test]
async fn test_fetch_one_found_and_missing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/users/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 42, "name": "admin"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/users/7"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "rest_user_invalid_id"
        })))
        .mount(&server)
        .await;

    let fetcher = fetcher(&server);
    let found = fetcher.fetch_one("wp/v2/users", 42).await.unwrap();
    assert_eq!(found.unwrap()["name"], "admin");

    let missing = fetcher.fetch_one("wp/v2/users", 7).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_fetch_root() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wp-json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "My Blog",
            "namespaces": ["oembed/1.0", "wp/v2"]
        })))
        .mount(&server)
        .await;

    let index = fetcher(&server).fetch_root().await.unwrap();
    assert_eq!(index["name"], "My Blog");
}

#[tokio::test]
async fn test_fetch_root_missing_api() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = fetcher(&server).fetch_root().await.unwrap_err();
    assert!(err.is_protocol_unsupported());
}

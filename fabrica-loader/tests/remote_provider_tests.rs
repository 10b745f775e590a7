use fabrica_loader::{RemoteProvider, RetryConfig, SourceProvider};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_retry() -> RetryConfig {
    RetryConfig {
        max_attempts: 3,
        base_delay: Duration::from_millis(1),
    }
}

#[tokio::test]
async fn lists_sources_from_structure_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/structure"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"path": "blog/article", "content": "{}"},
            {"path": "shop/product", "content": "{\"name\":\"Product\"}"},
        ])))
        .mount(&server)
        .await;

    let provider = RemoteProvider::new(server.uri(), fast_retry());
    let sources = provider.list_sources().await.unwrap();
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0].path.as_str(), "blog/article");
}

#[tokio::test]
async fn invalid_remote_paths_are_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/structure"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"path": "", "content": "{}"},
            {"path": "ok/source", "content": "{}"},
        ])))
        .mount(&server)
        .await;

    let provider = RemoteProvider::new(server.uri(), fast_retry());
    let sources = provider.list_sources().await.unwrap();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].path.as_str(), "ok/source");
}

#[tokio::test]
async fn retries_transient_failures_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/structure"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/structure"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"path": "a/x", "content": "{}"},
        ])))
        .mount(&server)
        .await;

    let provider = RemoteProvider::new(server.uri(), fast_retry());
    let sources = provider.list_sources().await.unwrap();
    assert_eq!(sources.len(), 1);
}

#[tokio::test]
async fn exhausted_retries_surface_terminal_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/structure"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let provider = RemoteProvider::new(server.uri(), fast_retry());
    assert!(provider.list_sources().await.is_err());
}

#[tokio::test]
async fn fetch_source_maps_404_to_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/structure/article"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            {"path": "blog/article", "content": "{}"}
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/structure/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let provider = RemoteProvider::new(server.uri(), fast_retry());
    assert!(provider.fetch_source("article").await.unwrap().is_some());
    assert!(provider.fetch_source("ghost").await.unwrap().is_none());
}

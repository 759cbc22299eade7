use std::time::Duration;

use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shop_api_client::legacy::LegacyRestClient;
use shop_api_client::rate_limit::{RateLimitConfig, RateLimiter, WindowRule};
use shop_api_client::ShopApiError;

fn limited_config(capacity: u32) -> RateLimitConfig {
    RateLimitConfig::default()
        .with_rules(vec![WindowRule::new(60, capacity)])
        .with_wait(Duration::ZERO, Duration::from_millis(10))
}

fn build_client(server: &MockServer, config: RateLimitConfig) -> LegacyRestClient {
    LegacyRestClient::builder()
        .base_url(server.uri())
        .rate_limit_config(config)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_get_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"products":[]}"#))
        .mount(&server)
        .await;

    let client = build_client(&server, RateLimitConfig::default());
    let body = client.get("/products").await.unwrap();

    assert_eq!(body, r#"{"products":[]}"#);
    assert_eq!(client.rate_limiter().windows().counts(), vec![1, 1, 1]);
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(header("content-type", "application/json"))
        .and(body_string_contains("\"sku\":\"A-1\""))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server, RateLimitConfig::default());
    let body = client.post("/orders", r#"{"sku":"A-1"}"#).await.unwrap();

    assert_eq!(body, "created");
}

#[tokio::test]
async fn test_requests_beyond_quota_never_reach_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customers"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(3)
        .mount(&server)
        .await;

    let client = build_client(&server, limited_config(3));
    for _ in 0..3 {
        client.get("/customers").await.unwrap();
    }

    let err = client.get("/customers").await.unwrap_err();
    assert!(err.is_rate_limit(), "unexpected error: {err:?}");
    assert_eq!(client.rate_limiter().windows().counts(), vec![3]);
}

#[tokio::test]
async fn test_clients_sharing_limiter_share_quota() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(2)
        .mount(&server)
        .await;

    let limiter = RateLimiter::new(limited_config(2)).unwrap();
    let first = LegacyRestClient::builder()
        .base_url(server.uri())
        .rate_limiter(limiter.clone())
        .build()
        .unwrap();
    let second = first.clone();

    first.get("/items").await.unwrap();
    second.get("/items").await.unwrap();

    let err = second.get("/items").await.unwrap_err();
    assert!(matches!(err, ShopApiError::RateLimitExceeded { .. }));
}

#[tokio::test]
async fn test_http_error_is_not_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = build_client(&server, RateLimitConfig::default());
    match client.get("/broken").await {
        Err(ShopApiError::Status { status, body }) => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_waits_for_quota_then_sends() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stock"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(2)
        .mount(&server)
        .await;

    let config = RateLimitConfig::default()
        .with_rules(vec![WindowRule {
            interval: Duration::from_millis(200),
            capacity: 1,
        }])
        .with_wait(Duration::from_secs(5), Duration::from_millis(20));
    let built = std::time::Instant::now();
    let client = build_client(&server, config);

    client.get("/stock").await.unwrap();
    client.get("/stock").await.unwrap();
    assert!(built.elapsed() >= Duration::from_millis(200));
}

#[tokio::test]
async fn test_timeout_reports_measured_wait() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/carts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let config = RateLimitConfig::default()
        .with_rules(vec![WindowRule::new(60, 1)])
        .with_wait(Duration::from_millis(300), Duration::from_millis(50));
    let client = build_client(&server, config);
    client.get("/carts").await.unwrap();

    let start = std::time::Instant::now();
    match client.get("/carts").await {
        Err(ShopApiError::RateLimitExceeded { waited }) => {
            assert!(waited >= Duration::from_millis(300));
            assert!(waited <= start.elapsed());
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

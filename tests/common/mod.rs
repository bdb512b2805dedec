// Shared test helpers — not all items used by every test binary.
#![allow(unused)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kik_bot::{Bot, BotConfig};

pub const BOT_USERNAME: &str = "testbot";
pub const BOT_API_KEY: &str = "2042cd8e-638c-4183-aef4-d4bef6f01981";

/// A config pointed at a mock API server, with signature checking off.
pub fn test_config(api_base_url: &str) -> BotConfig {
    let mut config = BotConfig::new(BOT_USERNAME, BOT_API_KEY);
    config.skip_signature_check = true;
    config.api_base_url = api_base_url.to_string();
    config
}

/// A mock API accepting delivery and broadcast calls.
pub async fn delivery_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/message"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/broadcast"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    server
}

/// POST a raw JSON body to the bot's incoming path and return the status.
pub async fn post_incoming(bot: &Arc<Bot>, body: &str) -> StatusCode {
    let req = Request::builder()
        .method("POST")
        .uri(bot.config().incoming_path.as_str())
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    bot.incoming().oneshot(req).await.unwrap().status()
}

/// Wait until the mock server has seen `expected` requests, returning
/// their JSON bodies in arrival order.
pub async fn received_bodies(server: &MockServer, expected: usize) -> Vec<serde_json::Value> {
    for _ in 0..400 {
        let requests = server.received_requests().await.unwrap_or_default();
        if requests.len() >= expected {
            return requests
                .iter()
                .map(|r| serde_json::from_slice(&r.body).unwrap())
                .collect();
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("expected {expected} delivery request(s)");
}

/// Assert that no delivery request arrives within a short grace period.
pub async fn assert_no_deliveries(server: &MockServer) {
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(
        server.received_requests().await.unwrap_or_default().is_empty(),
        "expected no delivery requests"
    );
}

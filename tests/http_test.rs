//! HTTP surface tests through the full middleware stack.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use betswirl_tools::http::{HttpServer, X_REQUEST_ID};
use betswirl_tools::lifecycle::build_app;

mod common;
use common::MockWallet;

fn router(wallet: Arc<MockWallet>) -> Router {
    let config = common::test_config();
    let app = build_app(&config, wallet).unwrap();
    HttpServer::new(&config.server, app.state).router()
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post(path: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(router(Arc::new(MockWallet::casino(1))), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["chainId"], 137);
    assert_eq!(body["tools"], 5);
}

#[tokio::test]
async fn test_list_tools() {
    let request = Request::builder().uri("/tools").body(Body::empty()).unwrap();
    let (status, body) = send(router(Arc::new(MockWallet::casino(1))), request).await;

    assert_eq!(status, StatusCode::OK);
    let tools = body.as_array().unwrap();
    assert_eq!(tools.len(), 5);
    assert_eq!(tools[0]["name"], "betswirl.coinToss");
    assert!(tools[0]["parameters"]["properties"]["face"].is_object());
}

#[tokio::test]
async fn test_call_tool() {
    let wallet = Arc::new(MockWallet::casino(9));
    let (status, body) = send(
        router(wallet.clone()),
        post("/tools/betswirl.coinToss", r#"{"face":"HEADS","betAmount":"0.1"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tool"], "betswirl.coinToss");
    assert_eq!(body["result"]["game"], "coinToss");
    assert_eq!(wallet.sent().len(), 1);
}

#[tokio::test]
async fn test_empty_body_means_no_arguments() {
    let (status, body) = send(
        router(Arc::new(MockWallet::casino(1))),
        post("/tools/betswirl.getBetTokens", ""),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"][0]["symbol"], "POL");
}

#[tokio::test]
async fn test_error_statuses() {
    let wallet = Arc::new(MockWallet::casino(1));

    let (status, body) = send(router(wallet.clone()), post("/tools/betswirl.slots", "{}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["kind"], "not_found");

    let (status, _) = send(router(wallet.clone()), post("/tools/betswirl.dice", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        router(wallet.clone()),
        post("/tools/betswirl.roulette", r#"{"numbers":[1],"betAmount":"1"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["error"]["message"],
        "roulette isn't available on the chain id 137"
    );

    wallet.fail_sends("connection refused");
    let (status, body) = send(
        router(wallet),
        post("/tools/betswirl.coinToss", r#"{"face":"TAILS","betAmount":"1"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["kind"], "upstream_error");
}

#[tokio::test]
async fn test_request_id_propagated() {
    let router = router(Arc::new(MockWallet::casino(1)));

    let response = router
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key(X_REQUEST_ID));

    let response = router
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(X_REQUEST_ID, "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()[X_REQUEST_ID], "req-123");
}

#[tokio::test]
async fn test_body_limit() {
    let mut config = common::test_config();
    config.server.max_body_bytes = 16;
    let app = build_app(&config, Arc::new(MockWallet::casino(1))).unwrap();
    let router = HttpServer::new(&config.server, app.state).router();

    let big = format!(r#"{{"face":"HEADS","betAmount":"{}"}}"#, "1".repeat(64));
    let request = Request::builder()
        .method("POST")
        .uri("/tools/betswirl.coinToss")
        .header("content-type", "application/json")
        .header("content-length", big.len())
        .body(Body::from(big))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

//! Integration tests for oagg-svc API endpoints
//!
//! Tests cover:
//! - Health endpoint
//! - Enriched order endpoint (success, degraded, 404, 502, 400)

mod helpers;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use helpers::*;
use oagg_svc::{build_router, AppState};
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot` method

fn setup_app(fixture: &Fixture) -> axum::Router {
    build_router(AppState::new(fixture.aggregator()))
}

fn test_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

#[tokio::test]
async fn test_health_endpoint() {
    let fixture = Fixture::default();
    let app = setup_app(&fixture);

    let response = app.oneshot(test_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "oagg-svc");
    assert!(body["version"].is_string());
    assert!(body["uptime_seconds"].is_number());
    assert_eq!(fixture.orders.calls(), 0, "Health must not call upstreams");
}

#[tokio::test]
async fn test_enriched_order_json_shape() {
    let fixture = Fixture::default();
    let app = setup_app(&fixture);

    let uri = format!("/sellers/{}/order", SELLER_ID);
    let response = app.oneshot(test_request(&uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["id"], ORDER_ID);
    assert_eq!(body["offer_id"], OFFER_ID);
    assert_eq!(body["offer_condition"], "AS_NEW");
    assert_eq!(body["product_id"], PRODUCT_ID);
    assert_eq!(body["product_title"], TITLE);
    assert_eq!(body["images"][0]["title"], TITLE);
    assert_eq!(body["images"][0]["format"], "GIF");
    assert_eq!(body["status"]["offer"], "fetched");
}

#[tokio::test]
async fn test_degraded_order_is_still_ok() {
    let fixture = Fixture {
        offers: Scripted::new(Reply::Fail("down")),
        products: Scripted::new(Reply::Null),
        images: Scripted::new(Reply::Fail("down")),
        ..Default::default()
    };
    let app = setup_app(&fixture);

    let response = app.oneshot(test_request("/sellers/1/order")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["id"], ORDER_ID);
    assert_eq!(body["offer_id"], -1);
    assert_eq!(body["offer_condition"], "UNKNOWN");
    assert_eq!(body["product_id"], -1);
    assert!(body["product_title"].is_null());
    assert_eq!(body["images"].as_array().unwrap().len(), 1);
    assert_eq!(body["images"][0]["title"], "Default Image");
    assert_eq!(body["images"][0]["size"], 123);
    assert_eq!(body["status"]["images"], "defaulted");
}

#[tokio::test]
async fn test_missing_order_is_404() {
    let fixture = Fixture {
        orders: Scripted::new(Reply::Null),
        ..Default::default()
    };
    let app = setup_app(&fixture);

    let response = app.oneshot(test_request("/sellers/1/order")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "ORDER_NOT_FOUND");
}

#[tokio::test]
async fn test_order_service_failure_is_502() {
    let fixture = Fixture {
        orders: Scripted::new(Reply::Fail("Order service failed")),
        ..Default::default()
    };
    let app = setup_app(&fixture);

    let response = app.oneshot(test_request("/sellers/1/order")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "ORDER_LOOKUP_FAILED");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Order service failed"));
}

#[tokio::test]
async fn test_invalid_seller_id_is_400() {
    let fixture = Fixture::default();
    let app = setup_app(&fixture);

    let response = app.oneshot(test_request("/sellers/abc/order")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert_eq!(fixture.orders.calls(), 0);
}

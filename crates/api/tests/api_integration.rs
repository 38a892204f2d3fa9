//! Integration tests for the API server.

use std::sync::Arc;
use std::sync::OnceLock;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use cart_store::InMemoryCartStore;
use chrono::Utc;
use common::CartId;
use metrics_exporter_prometheus::PrometheusHandle;
use payments::{
    CHECKOUT_COMPLETED, InMemoryPaymentClient, RecordingFulfillment, SIGNATURE_HEADER,
    sign_payload,
};
use tower::ServiceExt;

use api::config::Config;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> axum::Router {
    let (app, _) = setup_with_hook();
    app
}

fn setup_with_hook() -> (axum::Router, RecordingFulfillment) {
    let store = InMemoryCartStore::new();
    let hook = RecordingFulfillment::new();
    let state = api::create_state(
        store,
        Arc::new(InMemoryPaymentClient::new()),
        Arc::new(hook.clone()),
        &Config::default(),
    );
    let app = api::create_app(state, get_metrics_handle());
    (app, hook)
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn add_item(app: &axum::Router, cart_id: Option<&str>, quantity: i64) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(post_json(
            "/cart/items",
            serde_json::json!({
                "cart_id": cart_id,
                "id": "sku1",
                "name": "Widget",
                "price": 500,
                "quantity": quantity,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await
}

#[tokio::test]
async fn test_health_check() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_create_cart_and_fetch_it() {
    let app = setup();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/cart")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["total_items"], 0);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/cart/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = json_body(response).await;
    assert_eq!(fetched["id"], id.as_str());
}

#[tokio::test]
async fn test_add_item_to_fresh_cart() {
    let app = setup();

    let cart = add_item(&app, None, 1).await;

    assert_eq!(cart["total_items"], 1);
    assert_eq!(cart["sub_total"]["amount"], 500);
    assert_eq!(cart["sub_total"]["formatted"], "\u{20ac}5.00");
    assert_eq!(cart["items"][0]["id"], "sku1");
    assert_eq!(cart["items"][0]["line_total"]["amount"], 500);
}

#[tokio::test]
async fn test_increase_decrease_and_remove() {
    let app = setup();

    let cart = add_item(&app, None, 2).await;
    let id = cart["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/cart/{id}/items/sku1/increase"),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cart = json_body(response).await;
    assert_eq!(cart["total_items"], 3);

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/cart/{id}/items/sku1/decrease"),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    let cart = json_body(response).await;
    assert_eq!(cart["total_items"], 2);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/cart/{id}/items/sku1"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cart = json_body(response).await;
    assert_eq!(cart["total_items"], 0);
    assert!(cart["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_decrease_to_zero_deletes_item() {
    let app = setup();

    let cart = add_item(&app, None, 1).await;
    let id = cart["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/cart/{id}/items/sku1/decrease"),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cart = json_body(response).await;
    assert_eq!(cart["total_items"], 0);

    // The item is gone now, so a further decrease is a 404.
    let response = app
        .oneshot(post_json(
            &format!("/cart/{id}/items/sku1/decrease"),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_remove_missing_item_is_not_found() {
    let app = setup();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/cart")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let id = json_body(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/cart/{id}/items/sku1"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_cart_id_is_bad_request() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/cart/not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_checkout_with_items_creates_session() {
    let app = setup();

    let cart = add_item(&app, None, 2).await;
    let id = cart["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(post_json("/checkout", serde_json::json!({ "cart_id": id })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let session = json_body(response).await;
    assert!(session["id"].as_str().unwrap().starts_with("cs_test_"));
    assert!(session["url"].as_str().unwrap().starts_with("https://"));
}

#[tokio::test]
async fn test_checkout_empty_cart_is_rejected() {
    let app = setup();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/cart")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let id = json_body(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(post_json("/checkout", serde_json::json!({ "cart_id": id })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn test_checkout_unknown_cart_is_not_found() {
    let app = setup();

    let response = app
        .oneshot(post_json(
            "/checkout",
            serde_json::json!({ "cart_id": CartId::new().to_string() }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

fn completed_event(session_id: &str, cart_id: CartId) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "id": "evt_0001",
        "type": CHECKOUT_COMPLETED,
        "data": {
            "object": {
                "id": session_id,
                "metadata": { "cartId": cart_id.to_string() }
            }
        }
    }))
    .unwrap()
}

fn webhook_request(payload: &[u8], signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/webhook");
    if let Some(signature) = signature {
        builder = builder.header(SIGNATURE_HEADER, signature);
    }
    builder.body(Body::from(payload.to_vec())).unwrap()
}

#[tokio::test]
async fn test_webhook_rejects_bad_signature_without_dispatch() {
    let (app, hook) = setup_with_hook();
    let payload = completed_event("cs_test_0001", CartId::new());
    let header = sign_payload(&payload, "whsec_wrong", Utc::now());

    let response = app
        .oneshot(webhook_request(&payload, Some(&header)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(hook.fulfilled().is_empty());
}

#[tokio::test]
async fn test_webhook_missing_signature_is_rejected() {
    let (app, hook) = setup_with_hook();
    let payload = completed_event("cs_test_0001", CartId::new());

    let response = app.oneshot(webhook_request(&payload, None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(hook.fulfilled().is_empty());
}

#[tokio::test]
async fn test_webhook_dispatches_checkout_completion() {
    let (app, hook) = setup_with_hook();
    let cart_id = CartId::new();
    let payload = completed_event("cs_test_0001", cart_id);
    let header = sign_payload(&payload, &Config::default().webhook_secret, Utc::now());

    let response = app
        .oneshot(webhook_request(&payload, Some(&header)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        hook.fulfilled(),
        vec![(Some(cart_id), "cs_test_0001".to_string())]
    );
}

#[tokio::test]
async fn test_webhook_retry_has_single_effect() {
    let (app, hook) = setup_with_hook();
    let payload = completed_event("cs_test_0001", CartId::new());
    let header = sign_payload(&payload, &Config::default().webhook_secret, Utc::now());

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(webhook_request(&payload, Some(&header)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(hook.fulfilled().len(), 1);
}

#[tokio::test]
async fn test_webhook_ignores_unknown_event_types() {
    let (app, hook) = setup_with_hook();
    let payload = serde_json::to_vec(&serde_json::json!({
        "id": "evt_0002",
        "type": "invoice.paid",
        "data": { "object": { "id": "in_0001" } }
    }))
    .unwrap();
    let header = sign_payload(&payload, &Config::default().webhook_secret, Utc::now());

    let response = app
        .oneshot(webhook_request(&payload, Some(&header)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(hook.fulfilled().is_empty());
}

//! HTTP API server for the cart and checkout system.
//!
//! Exposes cart mutations, checkout session creation and the payment
//! processor's webhook endpoint, with structured logging (tracing) and
//! Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post};
use cart_store::CartStore;
use domain::CartService;
use metrics_exporter_prometheus::PrometheusHandle;
use payments::{
    CheckoutConfig, CheckoutService, FulfillmentHook, InMemoryPaymentClient, LoggingFulfillment,
    PaymentClient, WebhookDispatcher,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use routes::cart::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: CartStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/cart", post(routes::cart::create::<S>))
        .route("/cart/{id}", get(routes::cart::get::<S>))
        .route("/cart/items", post(routes::cart::add_item::<S>))
        .route(
            "/cart/{id}/items/{item_id}",
            delete(routes::cart::remove_item::<S>),
        )
        .route(
            "/cart/{id}/items/{item_id}/increase",
            post(routes::cart::increase_item::<S>),
        )
        .route(
            "/cart/{id}/items/{item_id}/decrease",
            post(routes::cart::decrease_item::<S>),
        )
        .route("/checkout", post(routes::checkout::create::<S>))
        .route("/webhook", post(routes::webhook::receive::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state with explicitly injected collaborators.
pub fn create_state<S: CartStore + Clone + 'static>(
    store: S,
    payment_client: Arc<dyn PaymentClient>,
    fulfillment: Arc<dyn FulfillmentHook>,
    config: &Config,
) -> Arc<AppState<S>> {
    let carts = CartService::new(store.clone(), config.currency);
    let checkout = CheckoutService::new(
        store,
        payment_client,
        CheckoutConfig {
            success_url: config.success_url.clone(),
            cancel_url: config.cancel_url.clone(),
            currency: config.currency,
        },
    );
    let webhooks = WebhookDispatcher::new(config.webhook_secret.clone(), fulfillment);

    Arc::new(AppState {
        carts,
        checkout,
        webhooks,
    })
}

/// Creates the default application state with the in-memory payment
/// client and a logging fulfillment stub.
pub fn create_default_state<S: CartStore + Clone + 'static>(
    store: S,
    config: &Config,
) -> Arc<AppState<S>> {
    create_state(
        store,
        Arc::new(InMemoryPaymentClient::new()),
        Arc::new(LoggingFulfillment),
        config,
    )
}

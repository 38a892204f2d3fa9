//! Checkout session endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use cart_store::CartStore;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::cart::{AppState, parse_cart_id};

#[derive(Deserialize)]
pub struct CreateCheckoutRequest {
    pub cart_id: String,
}

#[derive(Serialize)]
pub struct CheckoutSessionResponse {
    pub id: String,
    pub url: String,
}

/// POST /checkout — create a payment session for a cart.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: CartStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateCheckoutRequest>,
) -> Result<(axum::http::StatusCode, Json<CheckoutSessionResponse>), ApiError> {
    let cart_id = parse_cart_id(&req.cart_id)?;
    let session = state.checkout.create_checkout_session(cart_id).await?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(CheckoutSessionResponse {
            id: session.id,
            url: session.url,
        }),
    ))
}

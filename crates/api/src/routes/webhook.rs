//! Payment processor webhook endpoint.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use cart_store::CartStore;
use payments::SIGNATURE_HEADER;
use serde::Serialize;

use crate::error::ApiError;
use crate::routes::cart::AppState;

#[derive(Serialize)]
pub struct WebhookResponse {
    pub received: bool,
}

/// POST /webhook — receive a processor event.
///
/// Responds 200 on every accepted delivery, handled or ignored, because
/// the processor retries on non-2xx and retries must not amplify into
/// duplicate fulfillment work. Only signature failure is a 400.
#[tracing::instrument(skip(state, headers, body))]
pub async fn receive<S: CartStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    state.webhooks.handle(&body, signature).await?;

    Ok(Json(WebhookResponse { received: true }))
}

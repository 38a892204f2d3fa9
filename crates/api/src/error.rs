//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::CartError;
use payments::{CheckoutError, VerificationError};

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Cart domain error.
    Cart(CartError),
    /// Checkout orchestration error.
    Checkout(CheckoutError),
    /// Webhook signature rejection.
    Verification(VerificationError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Cart(err) => cart_error_to_response(err),
            ApiError::Checkout(err) => checkout_error_to_response(err),
            ApiError::Verification(err) => (StatusCode::BAD_REQUEST, err.to_string()),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn cart_error_to_response(err: CartError) -> (StatusCode, String) {
    match &err {
        CartError::CartNotFound(_) | CartError::ItemNotFound { .. } => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        CartError::InvalidQuantity { .. } | CartError::InvalidPrice { .. } => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        CartError::Store(_) => {
            tracing::error!(error = %err, "store failure");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

fn checkout_error_to_response(err: CheckoutError) -> (StatusCode, String) {
    match &err {
        CheckoutError::InvalidCart(_) => (StatusCode::NOT_FOUND, err.to_string()),
        CheckoutError::EmptyCart(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        CheckoutError::Payment(_) | CheckoutError::Store(_) => {
            tracing::error!(error = %err, "checkout failure");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        ApiError::Cart(err)
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        ApiError::Checkout(err)
    }
}

impl From<VerificationError> for ApiError {
    fn from(err: VerificationError) -> Self {
        ApiError::Verification(err)
    }
}

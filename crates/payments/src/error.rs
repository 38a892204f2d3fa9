//! Checkout and webhook error types.

use cart_store::StoreError;
use common::CartId;
use thiserror::Error;

/// Errors returned by a payment processor client.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The processor rejected the session request.
    #[error("Payment session rejected: {0}")]
    Rejected(String),

    /// The processor could not be reached.
    #[error("Payment processor transport error: {0}")]
    Transport(String),
}

/// Errors that can occur while creating a checkout session.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout was requested against a nonexistent cart.
    #[error("Invalid cart: {0}")]
    InvalidCart(CartId),

    /// Checkout was requested against a cart with no items.
    #[error("Cart is empty: {0}")]
    EmptyCart(CartId),

    /// A payment client error.
    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    /// A cart store error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors that reject a webhook delivery outright.
///
/// All of these are terminal for the delivery: the caller cannot retry
/// without producing a new signature.
#[derive(Debug, Error)]
pub enum VerificationError {
    /// No signature header was supplied.
    #[error("Missing webhook signature")]
    MissingSignature,

    /// The signature header could not be parsed.
    #[error("Malformed signature header: {0}")]
    MalformedHeader(String),

    /// The signature did not match the payload.
    #[error("Webhook signature mismatch")]
    SignatureMismatch,

    /// The signed timestamp is outside the allowed replay window.
    #[error("Webhook timestamp outside tolerance ({age_secs}s old)")]
    TimestampOutOfTolerance { age_secs: i64 },

    /// The payload was not a valid event.
    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

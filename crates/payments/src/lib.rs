//! Checkout orchestration and payment-processor webhook handling.
//!
//! The [`CheckoutService`] builds a payment session from cart contents
//! after validating its preconditions. The [`WebhookDispatcher`]
//! authenticates inbound processor events and hands `checkout
//! completed` events to a [`FulfillmentHook`]; everything else is
//! acknowledged without action so processor retries are never amplified
//! into duplicate work.

pub mod checkout;
pub mod client;
pub mod error;
pub mod signature;
pub mod webhook;

pub use checkout::{CheckoutConfig, CheckoutService, CheckoutSession};
pub use client::{InMemoryPaymentClient, PaymentClient, SessionLineItem, SessionRequest};
pub use error::{CheckoutError, PaymentError, VerificationError};
pub use signature::{SIGNATURE_HEADER, sign_payload, verify_signature};
pub use webhook::{
    CHECKOUT_COMPLETED, FulfillmentHook, LoggingFulfillment, RecordingFulfillment, WebhookAck,
    WebhookDispatcher, WebhookEvent, verify_and_parse,
};

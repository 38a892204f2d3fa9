//! Webhook verification and event dispatch.
//!
//! A delivery starts unverified (raw payload plus signature header).
//! Verification either rejects it outright (no dispatch, surfaced as a
//! 400-class failure) or yields a [`WebhookEvent`] whose declared type
//! is matched: a checkout-completed event triggers the fulfillment
//! hook, every other type is acknowledged without action so new
//! processor event types never break the endpoint.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use common::CartId;
use serde::Deserialize;

use crate::error::VerificationError;
use crate::signature::verify_signature;

/// Event type emitted when a hosted checkout session completes.
pub const CHECKOUT_COMPLETED: &str = "checkout.session.completed";

/// A verified payment-processor event.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl WebhookEvent {
    /// Returns the session ID carried by the event, if any.
    pub fn session_id(&self) -> Option<&str> {
        self.data["object"]["id"].as_str()
    }

    /// Returns the cart ID from the session's correlation metadata, if
    /// present and well-formed.
    pub fn cart_id(&self) -> Option<CartId> {
        self.data["object"]["metadata"]["cartId"]
            .as_str()
            .and_then(|s| CartId::parse_str(s).ok())
    }
}

/// Authenticates a raw delivery and parses it into an event.
///
/// A missing header, a bad signature and a stale timestamp are all
/// terminal rejections; no event is ever produced from an unverified
/// payload.
pub fn verify_and_parse(
    payload: &[u8],
    signature_header: Option<&str>,
    secret: &str,
    tolerance: Duration,
) -> Result<WebhookEvent, VerificationError> {
    let header = signature_header.ok_or(VerificationError::MissingSignature)?;
    verify_signature(payload, header, secret, tolerance, Utc::now())?;
    Ok(serde_json::from_slice(payload)?)
}

/// The post-payment side-effect trigger, external to this core.
///
/// Delivery is at-least-once: the processor retries on non-2xx
/// responses, so implementations must tolerate duplicate invocation per
/// session ID and keep the observable effect at-most-once.
#[async_trait]
pub trait FulfillmentHook: Send + Sync {
    /// Called when a checkout session has completed. Fire-and-forget
    /// from the core's perspective.
    async fn on_checkout_completed(&self, cart_id: Option<CartId>, session_id: &str);
}

/// Outcome of an accepted webhook delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookAck {
    /// A checkout-completed event was dispatched to the hook.
    Fulfilled,
    /// The event type is not handled; acknowledged without action.
    Ignored,
}

/// Verifies inbound deliveries and dispatches fulfillment actions.
pub struct WebhookDispatcher {
    secret: String,
    tolerance: Duration,
    hook: Arc<dyn FulfillmentHook>,
}

impl WebhookDispatcher {
    /// Creates a dispatcher with the default 5 minute replay window.
    pub fn new(secret: impl Into<String>, hook: Arc<dyn FulfillmentHook>) -> Self {
        Self {
            secret: secret.into(),
            tolerance: Duration::minutes(5),
            hook,
        }
    }

    /// Overrides the replay tolerance window.
    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Handles one raw delivery.
    ///
    /// Returns an acknowledgment for every verified delivery, handled
    /// or not; only verification failure is an error.
    #[tracing::instrument(skip(self, payload, signature_header))]
    pub async fn handle(
        &self,
        payload: &[u8],
        signature_header: Option<&str>,
    ) -> Result<WebhookAck, VerificationError> {
        let event = verify_and_parse(payload, signature_header, &self.secret, self.tolerance)
            .inspect_err(|err| {
                metrics::counter!("webhook_rejected").increment(1);
                tracing::warn!(error = %err, "rejected webhook delivery");
            })?;

        metrics::counter!("webhook_events_received").increment(1);

        if event.event_type != CHECKOUT_COMPLETED {
            tracing::debug!(event_type = %event.event_type, "ignoring unhandled event type");
            return Ok(WebhookAck::Ignored);
        }

        let session_id = event.session_id().unwrap_or(event.id.as_str());
        let cart_id = event.cart_id();
        tracing::info!(%session_id, ?cart_id, "dispatching checkout completion");
        self.hook.on_checkout_completed(cart_id, session_id).await;
        metrics::counter!("fulfillments_dispatched").increment(1);

        Ok(WebhookAck::Fulfilled)
    }
}

/// Fulfillment hook that only logs, for runs without a real fulfillment
/// backend.
#[derive(Debug, Clone, Default)]
pub struct LoggingFulfillment;

#[async_trait]
impl FulfillmentHook for LoggingFulfillment {
    async fn on_checkout_completed(&self, cart_id: Option<CartId>, session_id: &str) {
        tracing::info!(?cart_id, %session_id, "checkout completed; fulfillment stubbed");
    }
}

#[derive(Debug, Default)]
struct RecordingState {
    seen_sessions: HashSet<String>,
    fulfilled: Vec<(Option<CartId>, String)>,
}

/// Fulfillment hook for tests: records effects and deduplicates by
/// session ID, so a redelivered event produces at most one effect.
#[derive(Debug, Clone, Default)]
pub struct RecordingFulfillment {
    state: Arc<RwLock<RecordingState>>,
}

impl RecordingFulfillment {
    /// Creates a new recording hook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded fulfillment effects, one per session.
    pub fn fulfilled(&self) -> Vec<(Option<CartId>, String)> {
        self.state.read().unwrap().fulfilled.clone()
    }
}

#[async_trait]
impl FulfillmentHook for RecordingFulfillment {
    async fn on_checkout_completed(&self, cart_id: Option<CartId>, session_id: &str) {
        let mut state = self.state.write().unwrap();
        if state.seen_sessions.insert(session_id.to_string()) {
            state.fulfilled.push((cart_id, session_id.to_string()));
        }
    }
}

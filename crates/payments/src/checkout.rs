//! Checkout orchestration: builds a payment session from cart contents.

use std::collections::HashMap;
use std::sync::Arc;

use cart_store::CartStore;
use common::{CartId, Currency};
use serde::{Deserialize, Serialize};

use crate::client::{PaymentClient, SessionLineItem, SessionRequest};
use crate::error::CheckoutError;

/// An ephemeral handle to a processor-hosted checkout session.
///
/// Not persisted by this core; the payment processor owns its
/// lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

/// Static configuration for checkout session creation.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Redirect target after payment. May carry the processor's
    /// `{CHECKOUT_SESSION_ID}` placeholder verbatim.
    pub success_url: String,
    /// Redirect target when the customer abandons the session.
    pub cancel_url: String,
    pub currency: Currency,
}

/// Orchestrates checkout session creation.
///
/// Reads the cart through the store, validates preconditions, and calls
/// the payment client. Never mutates cart state: fulfillment happens
/// later via the webhook path.
pub struct CheckoutService<S: CartStore> {
    store: S,
    client: Arc<dyn PaymentClient>,
    config: CheckoutConfig,
}

impl<S: CartStore> CheckoutService<S> {
    /// Creates a new checkout service.
    pub fn new(store: S, client: Arc<dyn PaymentClient>, config: CheckoutConfig) -> Self {
        Self {
            store,
            client,
            config,
        }
    }

    /// Creates a payment session for the given cart.
    ///
    /// Preconditions, checked in order: the cart must exist
    /// (`InvalidCart`) and must contain at least one item (`EmptyCart`).
    /// The session is tagged with the cart ID as correlation metadata
    /// and the processor's `{id, url}` is returned verbatim.
    #[tracing::instrument(skip(self))]
    pub async fn create_checkout_session(
        &self,
        cart_id: CartId,
    ) -> Result<CheckoutSession, CheckoutError> {
        if self.store.get(cart_id).await?.is_none() {
            return Err(CheckoutError::InvalidCart(cart_id));
        }

        let items = self.store.list_items(cart_id).await?;
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart(cart_id));
        }

        let line_items = items
            .into_iter()
            .map(|item| SessionLineItem {
                name: item.name,
                description: item.description,
                image: item.image,
                unit_amount: item.price,
                currency: self.config.currency,
                quantity: item.quantity,
            })
            .collect();

        let mut metadata = HashMap::new();
        metadata.insert("cartId".to_string(), cart_id.to_string());

        let session = self
            .client
            .create_session(SessionRequest {
                line_items,
                success_url: self.config.success_url.clone(),
                cancel_url: self.config.cancel_url.clone(),
                metadata,
            })
            .await?;

        metrics::counter!("checkout_sessions_created").increment(1);
        tracing::info!(%cart_id, session_id = %session.id, "created checkout session");

        Ok(session)
    }
}

//! Payment processor client trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::Currency;
use serde::{Deserialize, Serialize};

use crate::checkout::CheckoutSession;
use crate::error::PaymentError;

/// One price line of a session request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLineItem {
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    /// Unit amount in minor currency units.
    pub unit_amount: i64,
    pub currency: Currency,
    pub quantity: i64,
}

/// A request for a new hosted checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequest {
    pub line_items: Vec<SessionLineItem>,
    pub success_url: String,
    pub cancel_url: String,
    /// Correlation metadata echoed back in webhook events.
    pub metadata: HashMap<String, String>,
}

/// Trait for payment processor session creation.
///
/// The processor is an external-service boundary: the core treats it as
/// a black box that issues an opaque session ID and a redirect URL.
#[async_trait]
pub trait PaymentClient: Send + Sync {
    /// Creates a hosted checkout session.
    async fn create_session(&self, request: SessionRequest)
    -> Result<CheckoutSession, PaymentError>;
}

#[derive(Debug, Default)]
struct InMemoryPaymentState {
    requests: Vec<SessionRequest>,
    next_id: u32,
    fail_on_create: bool,
}

/// In-memory payment client for testing and local runs.
///
/// Issues sequential `cs_test_NNNN` session IDs and records every
/// request it receives.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentClient {
    state: Arc<RwLock<InMemoryPaymentState>>,
}

impl InMemoryPaymentClient {
    /// Creates a new in-memory payment client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the client to fail on the next create call.
    pub fn set_fail_on_create(&self, fail: bool) {
        self.state.write().unwrap().fail_on_create = fail;
    }

    /// Returns the number of sessions created.
    pub fn session_count(&self) -> usize {
        self.state.read().unwrap().requests.len()
    }

    /// Returns the most recent session request, if any.
    pub fn last_request(&self) -> Option<SessionRequest> {
        self.state.read().unwrap().requests.last().cloned()
    }
}

#[async_trait]
impl PaymentClient for InMemoryPaymentClient {
    async fn create_session(
        &self,
        request: SessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_create {
            return Err(PaymentError::Rejected("Session declined".to_string()));
        }

        state.next_id += 1;
        let id = format!("cs_test_{:04}", state.next_id);
        let url = format!("https://checkout.example.com/pay/{id}");
        state.requests.push(request);

        Ok(CheckoutSession { id, url })
    }
}

//! Domain error types.

use cart_store::StoreError;
use common::{CartId, ItemId};
use thiserror::Error;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The cart does not exist.
    #[error("Cart not found: {0}")]
    CartNotFound(CartId),

    /// The item does not exist in the given cart.
    #[error("Item {item_id} not found in cart {cart_id}")]
    ItemNotFound { cart_id: CartId, item_id: ItemId },

    /// A quantity must be at least 1.
    #[error("Invalid quantity: {given} (must be at least 1)")]
    InvalidQuantity { given: i64 },

    /// A unit price must be non-negative.
    #[error("Invalid price: {given} (must be non-negative)")]
    InvalidPrice { given: i64 },

    /// An error occurred in the cart store.
    #[error("Store error: {0}")]
    Store(StoreError),
}

// Promote the store's not-found cases to their typed domain
// counterparts so callers can match on them directly.
impl From<StoreError> for CartError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::CartNotFound(cart_id) => CartError::CartNotFound(cart_id),
            StoreError::ItemNotFound { cart_id, item_id } => {
                CartError::ItemNotFound { cart_id, item_id }
            }
            other => CartError::Store(other),
        }
    }
}

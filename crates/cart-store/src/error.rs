use common::{CartId, ItemId};
use thiserror::Error;

/// Errors that can occur when interacting with the cart store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The cart does not exist.
    #[error("Cart not found: {0}")]
    CartNotFound(CartId),

    /// The item does not exist in the given cart.
    #[error("Item {item_id} not found in cart {cart_id}")]
    ItemNotFound { cart_id: CartId, item_id: ItemId },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for cart store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

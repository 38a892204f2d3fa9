//! Persistence layer for carts and their line items.
//!
//! The [`CartStore`] trait is the sole writer of persisted cart state.
//! All item mutations are atomic per `(cart_id, item_id)` pair so that
//! concurrent increments are never lost and quantities never go negative
//! without detection.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod record;
pub mod store;

pub use common::{CartId, ItemId};
pub use error::{Result, StoreError};
pub use memory::InMemoryCartStore;
pub use postgres::PostgresCartStore;
pub use record::{CartRecord, ItemRecord, NewItem};
pub use store::CartStore;

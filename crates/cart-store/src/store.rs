use async_trait::async_trait;
use common::{CartId, ItemId};

use crate::{CartRecord, ItemRecord, NewItem, Result};

/// Core trait for cart persistence implementations.
///
/// The store is the only component permitted to mutate persisted cart
/// state. All implementations must be thread-safe (`Send + Sync`) and
/// must make item mutations atomic with respect to concurrent mutations
/// of the same `(cart_id, item_id)` pair: two concurrent increments are
/// both reflected, never lost.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Creates a new empty cart with a fresh server-generated ID.
    async fn create(&self) -> Result<CartRecord>;

    /// Retrieves a cart by ID.
    ///
    /// Returns `None` if the cart does not exist.
    async fn get(&self, cart_id: CartId) -> Result<Option<CartRecord>>;

    /// Inserts an item or increments its quantity.
    ///
    /// If no item with `(item.id, cart_id)` exists it is inserted with
    /// quantity `quantity`; otherwise the existing row's quantity is
    /// atomically incremented by `quantity` and all other fields are
    /// left unchanged.
    ///
    /// Fails with `CartNotFound` if the cart does not exist.
    async fn upsert_item(
        &self,
        cart_id: CartId,
        item: NewItem,
        quantity: i64,
    ) -> Result<ItemRecord>;

    /// Deletes an item unconditionally.
    ///
    /// Fails with `ItemNotFound` if the item does not exist.
    /// Returns the owning cart ID.
    async fn delete_item(&self, cart_id: CartId, item_id: &ItemId) -> Result<CartId>;

    /// Deletes an item if it exists.
    ///
    /// Returns whether a row was deleted. Deleting an already-deleted
    /// item is a no-op, which closes the race where two concurrent
    /// decrements both observe a non-positive quantity and both issue
    /// deletes.
    async fn delete_item_if_exists(&self, cart_id: CartId, item_id: &ItemId) -> Result<bool>;

    /// Atomically adjusts an item's quantity by `delta`.
    ///
    /// Returns the owning cart ID and the authoritative post-adjustment
    /// quantity, read atomically with the adjustment itself.
    ///
    /// Fails with `ItemNotFound` if the item does not exist.
    async fn adjust_item_quantity(
        &self,
        cart_id: CartId,
        item_id: &ItemId,
        delta: i64,
    ) -> Result<(CartId, i64)>;

    /// Lists a cart's items in insertion order.
    ///
    /// Returns an empty list for an existing cart with no items and for
    /// a nonexistent cart alike; existence is checked via [`Self::get`].
    async fn list_items(&self, cart_id: CartId) -> Result<Vec<ItemRecord>>;
}

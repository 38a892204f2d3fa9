use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{CartId, CartRecord, CartStore, ItemId, ItemRecord, NewItem, Result, StoreError};

#[derive(Debug, Clone)]
struct CartEntry {
    record: CartRecord,
    /// Items in insertion order.
    items: Vec<ItemRecord>,
}

/// In-memory cart store implementation for testing and local runs.
///
/// Provides the same interface and atomicity guarantees as the
/// PostgreSQL implementation: every mutation holds the single write
/// lock for its whole critical section, so concurrent increments on the
/// same item are serialized and none are lost.
#[derive(Clone, Default)]
pub struct InMemoryCartStore {
    carts: Arc<RwLock<HashMap<CartId, CartEntry>>>,
}

impl InMemoryCartStore {
    /// Creates a new empty in-memory cart store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of carts stored.
    pub async fn cart_count(&self) -> usize {
        self.carts.read().await.len()
    }

    /// Clears all carts and items.
    pub async fn clear(&self) {
        self.carts.write().await.clear();
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn create(&self) -> Result<CartRecord> {
        let record = CartRecord::new();
        let mut carts = self.carts.write().await;
        carts.insert(
            record.id,
            CartEntry {
                record: record.clone(),
                items: Vec::new(),
            },
        );
        Ok(record)
    }

    async fn get(&self, cart_id: CartId) -> Result<Option<CartRecord>> {
        let carts = self.carts.read().await;
        Ok(carts.get(&cart_id).map(|entry| entry.record.clone()))
    }

    async fn upsert_item(
        &self,
        cart_id: CartId,
        item: NewItem,
        quantity: i64,
    ) -> Result<ItemRecord> {
        let mut carts = self.carts.write().await;
        let entry = carts
            .get_mut(&cart_id)
            .ok_or(StoreError::CartNotFound(cart_id))?;

        if let Some(existing) = entry.items.iter_mut().find(|i| i.id == item.id) {
            existing.quantity += quantity;
            return Ok(existing.clone());
        }

        let record = ItemRecord {
            id: item.id,
            cart_id,
            name: item.name,
            description: item.description,
            image: item.image,
            price: item.price,
            quantity,
        };
        entry.items.push(record.clone());
        Ok(record)
    }

    async fn delete_item(&self, cart_id: CartId, item_id: &ItemId) -> Result<CartId> {
        if self.delete_item_if_exists(cart_id, item_id).await? {
            Ok(cart_id)
        } else {
            Err(StoreError::ItemNotFound {
                cart_id,
                item_id: item_id.clone(),
            })
        }
    }

    async fn delete_item_if_exists(&self, cart_id: CartId, item_id: &ItemId) -> Result<bool> {
        let mut carts = self.carts.write().await;
        let Some(entry) = carts.get_mut(&cart_id) else {
            return Ok(false);
        };

        let before = entry.items.len();
        entry.items.retain(|i| &i.id != item_id);
        Ok(entry.items.len() < before)
    }

    async fn adjust_item_quantity(
        &self,
        cart_id: CartId,
        item_id: &ItemId,
        delta: i64,
    ) -> Result<(CartId, i64)> {
        let mut carts = self.carts.write().await;
        let item = carts
            .get_mut(&cart_id)
            .and_then(|entry| entry.items.iter_mut().find(|i| &i.id == item_id))
            .ok_or_else(|| StoreError::ItemNotFound {
                cart_id,
                item_id: item_id.clone(),
            })?;

        item.quantity += delta;
        Ok((cart_id, item.quantity))
    }

    async fn list_items(&self, cart_id: CartId) -> Result<Vec<ItemRecord>> {
        let carts = self.carts.read().await;
        Ok(carts
            .get(&cart_id)
            .map(|entry| entry.items.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(id: &str, price: i64) -> NewItem {
        NewItem::new(id, "Widget", price)
    }

    #[tokio::test]
    async fn create_and_get_cart() {
        let store = InMemoryCartStore::new();

        let record = store.create().await.unwrap();
        let fetched = store.get(record.id).await.unwrap();
        assert_eq!(fetched, Some(record));

        let missing = store.get(CartId::new()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn upsert_inserts_then_increments() {
        let store = InMemoryCartStore::new();
        let cart = store.create().await.unwrap();

        let inserted = store
            .upsert_item(cart.id, widget("sku1", 500), 1)
            .await
            .unwrap();
        assert_eq!(inserted.quantity, 1);

        // Second upsert with different fields only bumps the quantity.
        let other = NewItem::new("sku1", "Renamed", 999).description("changed");
        let updated = store.upsert_item(cart.id, other, 2).await.unwrap();
        assert_eq!(updated.quantity, 3);
        assert_eq!(updated.name, "Widget");
        assert_eq!(updated.price, 500);
        assert!(updated.description.is_none());
    }

    #[tokio::test]
    async fn upsert_into_missing_cart_fails() {
        let store = InMemoryCartStore::new();

        let result = store
            .upsert_item(CartId::new(), widget("sku1", 500), 1)
            .await;
        assert!(matches!(result, Err(StoreError::CartNotFound(_))));
    }

    #[tokio::test]
    async fn delete_item_errors_when_absent() {
        let store = InMemoryCartStore::new();
        let cart = store.create().await.unwrap();

        let result = store.delete_item(cart.id, &ItemId::new("sku1")).await;
        assert!(matches!(result, Err(StoreError::ItemNotFound { .. })));
    }

    #[tokio::test]
    async fn delete_item_if_exists_is_idempotent() {
        let store = InMemoryCartStore::new();
        let cart = store.create().await.unwrap();
        store
            .upsert_item(cart.id, widget("sku1", 500), 1)
            .await
            .unwrap();

        let item_id = ItemId::new("sku1");
        assert!(store.delete_item_if_exists(cart.id, &item_id).await.unwrap());
        assert!(!store.delete_item_if_exists(cart.id, &item_id).await.unwrap());
    }

    #[tokio::test]
    async fn adjust_returns_post_adjustment_quantity() {
        let store = InMemoryCartStore::new();
        let cart = store.create().await.unwrap();
        store
            .upsert_item(cart.id, widget("sku1", 500), 3)
            .await
            .unwrap();

        let item_id = ItemId::new("sku1");
        let (_, qty) = store
            .adjust_item_quantity(cart.id, &item_id, -1)
            .await
            .unwrap();
        assert_eq!(qty, 2);

        let (_, qty) = store
            .adjust_item_quantity(cart.id, &item_id, 5)
            .await
            .unwrap();
        assert_eq!(qty, 7);
    }

    #[tokio::test]
    async fn adjust_missing_item_fails() {
        let store = InMemoryCartStore::new();
        let cart = store.create().await.unwrap();

        let result = store
            .adjust_item_quantity(cart.id, &ItemId::new("sku1"), 1)
            .await;
        assert!(matches!(result, Err(StoreError::ItemNotFound { .. })));
    }

    #[tokio::test]
    async fn list_items_preserves_insertion_order() {
        let store = InMemoryCartStore::new();
        let cart = store.create().await.unwrap();

        for sku in ["sku3", "sku1", "sku2"] {
            store
                .upsert_item(cart.id, widget(sku, 100), 1)
                .await
                .unwrap();
        }

        let items = store.list_items(cart.id).await.unwrap();
        let ids: Vec<_> = items.iter().map(|i| i.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["sku3", "sku1", "sku2"]);
    }

    #[tokio::test]
    async fn concurrent_increments_are_not_lost() {
        let store = InMemoryCartStore::new();
        let cart = store.create().await.unwrap();
        store
            .upsert_item(cart.id, widget("sku1", 500), 1)
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..25 {
            let store = store.clone();
            let cart_id = cart.id;
            handles.push(tokio::spawn(async move {
                store
                    .adjust_item_quantity(cart_id, &ItemId::new("sku1"), 1)
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let items = store.list_items(cart.id).await.unwrap();
        assert_eq!(items[0].quantity, 26);
    }
}

//! Persisted row shapes for carts and items.

use chrono::{DateTime, Utc};
use common::{CartId, ItemId};
use serde::{Deserialize, Serialize};

/// A persisted cart row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartRecord {
    pub id: CartId,
    pub created_at: DateTime<Utc>,
}

impl CartRecord {
    /// Creates a fresh cart record with a new server-generated ID.
    pub fn new() -> Self {
        Self {
            id: CartId::new(),
            created_at: Utc::now(),
        }
    }
}

impl Default for CartRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// A persisted line item row.
///
/// Identity is the `(id, cart_id)` pair. `quantity` is at least 1 while
/// the row exists; a quantity that would drop to zero or below deletes
/// the row instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: ItemId,
    pub cart_id: CartId,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    /// Unit price in minor currency units.
    pub price: i64,
    pub quantity: i64,
}

/// Field values for inserting a new item.
///
/// On an upsert that hits an existing row only the quantity is touched;
/// these fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub id: ItemId,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: i64,
}

impl NewItem {
    /// Creates a new item description with no optional fields set.
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, price: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            image: None,
            price,
        }
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the image reference.
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

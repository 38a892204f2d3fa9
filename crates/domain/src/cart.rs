//! The cart aggregate view with derived totals.

use cart_store::ItemRecord;
use common::{CartId, Currency, ItemId, Money};
use serde::{Deserialize, Serialize};

/// One line within a cart, keyed by `(item id, cart id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ItemId,
    pub cart_id: CartId,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    /// Price per unit.
    pub unit_price: Money,
    pub quantity: i64,
}

impl CartItem {
    pub(crate) fn from_record(record: ItemRecord, currency: Currency) -> Self {
        Self {
            id: record.id,
            cart_id: record.cart_id,
            name: record.name,
            description: record.description,
            image: record.image,
            unit_price: Money::from_minor(record.price, currency),
            quantity: record.quantity,
        }
    }

    /// Returns the price for one unit of this item.
    pub fn unit_total(&self) -> Money {
        self.unit_price
    }

    /// Returns the total price for this line (unit price times quantity).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// The aggregate root representing one customer's in-progress selection.
///
/// A cart with zero items is valid. Totals are derived from the items,
/// never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    id: CartId,
    items: Vec<CartItem>,
    currency: Currency,
}

impl Cart {
    pub(crate) fn new(id: CartId, items: Vec<CartItem>, currency: Currency) -> Self {
        Self {
            id,
            items,
            currency,
        }
    }

    /// Returns the cart's identity.
    pub fn id(&self) -> CartId {
        self.id
    }

    /// Returns the cart's items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Returns true if the cart has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the sum of all item quantities.
    pub fn total_items(&self) -> i64 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Returns the sum of unit price times quantity across all items,
    /// in the cart's settlement currency.
    pub fn sub_total(&self) -> Money {
        self.items
            .iter()
            .fold(Money::zero(self.currency), |acc, item| {
                acc + item.line_total()
            })
    }
}

//! Cart service providing the business operations on carts.

use cart_store::{CartStore, NewItem};
use common::{CartId, Currency, ItemId};

use crate::cart::{Cart, CartItem};
use crate::error::CartError;

/// Input for adding an item to a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    pub id: ItemId,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    /// Unit price in minor currency units.
    pub price: i64,
    /// Defaults to 1 when not given.
    pub quantity: Option<i64>,
}

impl NewCartItem {
    /// Creates an input with no optional fields set.
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, price: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            image: None,
            price,
            quantity: None,
        }
    }

    /// Sets the quantity.
    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
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

/// Service for managing carts.
///
/// Each operation is a short-lived unit of work against the injected
/// store and returns the refreshed cart aggregate with computed totals.
pub struct CartService<S: CartStore> {
    store: S,
    currency: Currency,
}

impl<S: CartStore> CartService<S> {
    /// Creates a new cart service over the given store, settling in the
    /// given currency.
    pub fn new(store: S, currency: Currency) -> Self {
        Self { store, currency }
    }

    /// Returns the system settlement currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Finds an existing cart or creates a new one.
    ///
    /// This is the single entry point for obtaining a usable cart
    /// reference: a `None` or unknown ID yields a fresh empty cart.
    /// Idempotent for existing IDs.
    #[tracing::instrument(skip(self))]
    pub async fn find_or_create_cart(&self, cart_id: Option<CartId>) -> Result<Cart, CartError> {
        if let Some(id) = cart_id
            && let Some(record) = self.store.get(id).await?
        {
            return self.load_cart(record.id).await;
        }

        let record = self.store.create().await?;
        tracing::debug!(cart_id = %record.id, "created cart");
        Ok(Cart::new(record.id, Vec::new(), self.currency))
    }

    /// Loads a cart by ID, returning `None` if it does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn get_cart(&self, cart_id: CartId) -> Result<Option<Cart>, CartError> {
        match self.store.get(cart_id).await? {
            Some(record) => Ok(Some(self.load_cart(record.id).await?)),
            None => Ok(None),
        }
    }

    /// Adds an item to a cart, creating the cart first if needed.
    ///
    /// If the item already exists its quantity is incremented by the
    /// given amount; otherwise it is inserted. Returns the refreshed
    /// cart.
    #[tracing::instrument(skip(self, item), fields(item_id = %item.id))]
    pub async fn add_item(
        &self,
        cart_id: Option<CartId>,
        item: NewCartItem,
    ) -> Result<Cart, CartError> {
        let quantity = item.quantity.unwrap_or(1);
        if quantity < 1 {
            return Err(CartError::InvalidQuantity { given: quantity });
        }
        if item.price < 0 {
            return Err(CartError::InvalidPrice { given: item.price });
        }

        let cart = self.find_or_create_cart(cart_id).await?;

        let mut new_item = NewItem::new(item.id, item.name, item.price);
        new_item.description = item.description;
        new_item.image = item.image;

        self.store.upsert_item(cart.id(), new_item, quantity).await?;
        self.load_cart(cart.id()).await
    }

    /// Removes an item unconditionally.
    ///
    /// Fails with `ItemNotFound` if the item does not exist. Returns the
    /// refreshed parent cart.
    #[tracing::instrument(skip(self))]
    pub async fn remove_item(&self, cart_id: CartId, item_id: &ItemId) -> Result<Cart, CartError> {
        let owner = self.store.delete_item(cart_id, item_id).await?;
        self.load_cart(owner).await
    }

    /// Increments an item's quantity by exactly 1.
    ///
    /// Fails with `ItemNotFound` if the item does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn increase_item(
        &self,
        cart_id: CartId,
        item_id: &ItemId,
    ) -> Result<Cart, CartError> {
        let (owner, _) = self.store.adjust_item_quantity(cart_id, item_id, 1).await?;
        self.load_cart(owner).await
    }

    /// Decrements an item's quantity by exactly 1.
    ///
    /// If the post-decrement quantity is zero or below, the item is
    /// deleted instead of being persisted with a non-positive quantity.
    /// The check uses the quantity returned atomically by the store's
    /// decrement, and the delete tolerates a concurrent delete having
    /// already removed the row.
    #[tracing::instrument(skip(self))]
    pub async fn decrease_item(
        &self,
        cart_id: CartId,
        item_id: &ItemId,
    ) -> Result<Cart, CartError> {
        let (owner, quantity) = self
            .store
            .adjust_item_quantity(cart_id, item_id, -1)
            .await?;

        if quantity <= 0 {
            self.store.delete_item_if_exists(owner, item_id).await?;
        }

        self.load_cart(owner).await
    }

    async fn load_cart(&self, cart_id: CartId) -> Result<Cart, CartError> {
        let records = self.store.list_items(cart_id).await?;
        let items = records
            .into_iter()
            .map(|record| CartItem::from_record(record, self.currency))
            .collect();
        Ok(Cart::new(cart_id, items, self.currency))
    }
}

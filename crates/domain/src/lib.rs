//! Cart domain layer.
//!
//! This crate provides the business operations on carts:
//! - find-or-create as the single entry point for obtaining a cart
//! - add/remove/increase/decrease item mutations
//! - derived totals (`total_items`, `sub_total`, line totals)
//!
//! The domain service never caches entities across calls; each
//! operation re-reads what it needs through the [`cart_store::CartStore`]
//! it was constructed with.

pub mod cart;
pub mod error;
pub mod service;

pub use cart::{Cart, CartItem};
pub use common::{CartId, Currency, ItemId, Money};
pub use error::CartError;
pub use service::{CartService, NewCartItem};

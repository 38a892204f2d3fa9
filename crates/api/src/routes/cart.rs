//! Cart query and mutation endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use cart_store::CartStore;
use common::{CartId, ItemId, Money};
use domain::{Cart, CartService, NewCartItem};
use payments::{CheckoutService, WebhookDispatcher};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: CartStore> {
    pub carts: CartService<S>,
    pub checkout: CheckoutService<S>,
    pub webhooks: WebhookDispatcher,
}

// -- Request types --

#[derive(Deserialize)]
pub struct AddItemRequest {
    /// Omitted to start a fresh cart.
    pub cart_id: Option<String>,
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: i64,
    pub quantity: Option<i64>,
}

// -- Response types --

#[derive(Serialize)]
pub struct MoneyResponse {
    pub amount: i64,
    pub formatted: String,
}

impl From<Money> for MoneyResponse {
    fn from(money: Money) -> Self {
        Self {
            amount: money.amount(),
            formatted: money.formatted(),
        }
    }
}

#[derive(Serialize)]
pub struct CartItemResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub quantity: i64,
    pub unit_total: MoneyResponse,
    pub line_total: MoneyResponse,
}

#[derive(Serialize)]
pub struct CartResponse {
    pub id: String,
    pub items: Vec<CartItemResponse>,
    pub total_items: i64,
    pub sub_total: MoneyResponse,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        let total_items = cart.total_items();
        let sub_total = cart.sub_total().into();
        let items = cart
            .items()
            .iter()
            .map(|item| CartItemResponse {
                id: item.id.to_string(),
                name: item.name.clone(),
                description: item.description.clone(),
                image: item.image.clone(),
                quantity: item.quantity,
                unit_total: item.unit_total().into(),
                line_total: item.line_total().into(),
            })
            .collect();

        Self {
            id: cart.id().to_string(),
            items,
            total_items,
            sub_total,
        }
    }
}

// -- Handlers --

/// POST /cart — create a fresh empty cart.
#[tracing::instrument(skip(state))]
pub async fn create<S: CartStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<(axum::http::StatusCode, Json<CartResponse>), ApiError> {
    let cart = state.carts.find_or_create_cart(None).await?;
    Ok((axum::http::StatusCode::CREATED, Json(cart.into())))
}

/// GET /cart/:id — load a cart, creating one if the ID is unknown.
#[tracing::instrument(skip(state))]
pub async fn get<S: CartStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    let cart_id = parse_cart_id(&id)?;
    let cart = state.carts.find_or_create_cart(Some(cart_id)).await?;
    Ok(Json(cart.into()))
}

/// POST /cart/items — add an item, starting a new cart if none given.
#[tracing::instrument(skip(state, req))]
pub async fn add_item<S: CartStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    let cart_id = req.cart_id.as_deref().map(parse_cart_id).transpose()?;

    let mut item = NewCartItem::new(req.id, req.name, req.price);
    item.description = req.description;
    item.image = req.image;
    item.quantity = req.quantity;

    let cart = state.carts.add_item(cart_id, item).await?;
    Ok(Json(cart.into()))
}

/// DELETE /cart/:id/items/:item_id — remove an item unconditionally.
#[tracing::instrument(skip(state))]
pub async fn remove_item<S: CartStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path((id, item_id)): Path<(String, String)>,
) -> Result<Json<CartResponse>, ApiError> {
    let cart_id = parse_cart_id(&id)?;
    let cart = state
        .carts
        .remove_item(cart_id, &ItemId::new(item_id))
        .await?;
    Ok(Json(cart.into()))
}

/// POST /cart/:id/items/:item_id/increase — bump quantity by one.
#[tracing::instrument(skip(state))]
pub async fn increase_item<S: CartStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path((id, item_id)): Path<(String, String)>,
) -> Result<Json<CartResponse>, ApiError> {
    let cart_id = parse_cart_id(&id)?;
    let cart = state
        .carts
        .increase_item(cart_id, &ItemId::new(item_id))
        .await?;
    Ok(Json(cart.into()))
}

/// POST /cart/:id/items/:item_id/decrease — drop quantity by one,
/// deleting the item when it reaches zero.
#[tracing::instrument(skip(state))]
pub async fn decrease_item<S: CartStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path((id, item_id)): Path<(String, String)>,
) -> Result<Json<CartResponse>, ApiError> {
    let cart_id = parse_cart_id(&id)?;
    let cart = state
        .carts
        .decrease_item(cart_id, &ItemId::new(item_id))
        .await?;
    Ok(Json(cart.into()))
}

pub(crate) fn parse_cart_id(id: &str) -> Result<CartId, ApiError> {
    CartId::parse_str(id).map_err(|e| ApiError::BadRequest(format!("Invalid cart ID: {e}")))
}

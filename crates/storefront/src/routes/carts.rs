//! Cart route handlers: JSON CRUD over carts and their items.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use mercado_core::{CartId, ProductId};

use crate::db::CartRepository;
use crate::error::{AppError, Result};
use crate::models::cart::Cart;
use crate::state::AppState;

/// Payload for setting an item's quantity.
#[derive(Debug, Deserialize)]
pub struct QuantityPayload {
    pub quantity: i32,
}

/// Create a new empty cart.
pub async fn create(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let cart = CartRepository::new(state.pool()).create().await?;

    Ok((StatusCode::CREATED, Json(cart)))
}

/// Get a cart with its items.
pub async fn show(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Cart>> {
    let cart = CartRepository::new(state.pool())
        .get(CartId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("cart {id}")))?;

    Ok(Json(cart))
}

/// Delete a cart.
pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> Result<StatusCode> {
    let deleted = CartRepository::new(state.pool())
        .delete(CartId::new(id))
        .await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("cart {id}")))
    }
}

/// Add one unit of a product to a cart, incrementing if already present.
pub async fn add_product(
    State(state): State<AppState>,
    Path((id, pid)): Path<(i32, i32)>,
) -> Result<StatusCode> {
    CartRepository::new(state.pool())
        .add_item(CartId::new(id), ProductId::new(pid), 1)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Set the quantity of a product already in a cart.
pub async fn set_quantity(
    State(state): State<AppState>,
    Path((id, pid)): Path<(i32, i32)>,
    Json(payload): Json<QuantityPayload>,
) -> Result<StatusCode> {
    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be positive".to_string(),
        ));
    }

    CartRepository::new(state.pool())
        .set_quantity(CartId::new(id), ProductId::new(pid), payload.quantity)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Remove a product from a cart.
pub async fn remove_product(
    State(state): State<AppState>,
    Path((id, pid)): Path<(i32, i32)>,
) -> Result<StatusCode> {
    let removed = CartRepository::new(state.pool())
        .remove_item(CartId::new(id), ProductId::new(pid))
        .await?;

    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("product {pid} in cart {id}")))
    }
}

//! Cart API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{CartItem, CartItemCreate};
use crate::db::repository::CartRepository;
use crate::utils::{AppError, AppResult};

/// Add one line to the buyer's cart (price snapshot taken by the caller)
pub async fn add_item(
    State(state): State<ServerState>,
    Json(payload): Json<CartItemCreate>,
) -> AppResult<Json<CartItem>> {
    if payload.quantity <= 0 {
        return Err(AppError::validation(format!(
            "quantity must be positive, got {}",
            payload.quantity
        )));
    }
    if !payload.unit_price.is_finite() || payload.unit_price < 0.0 {
        return Err(AppError::validation(format!(
            "unit_price must be a non-negative number, got {}",
            payload.unit_price
        )));
    }

    let repo = CartRepository::new(state.db.clone());
    let item = repo
        .add(payload)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(item))
}

/// List the buyer's cart
pub async fn list(
    State(state): State<ServerState>,
    Path(buyer_id): Path<String>,
) -> AppResult<Json<Vec<CartItem>>> {
    let repo = CartRepository::new(state.db.clone());
    let items = repo
        .list_by_buyer(&buyer_id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(items))
}

/// Remove one cart line
pub async fn remove_item(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let repo = CartRepository::new(state.db.clone());
    let removed = repo
        .remove(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    if !removed {
        return Err(AppError::not_found(format!("Cart item {} not found", id)));
    }
    Ok(Json(serde_json::json!({ "removed": true })))
}

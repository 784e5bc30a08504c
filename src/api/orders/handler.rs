//! Orders API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{
    DeliveryStatusHistory, DeliveryTracking, Order, OrderDetail, PaymentMethodType,
};
use crate::db::repository::{DeliveryRepository, OrderRepository};
use crate::orders::CheckoutInfo;
use crate::utils::{AppError, AppResult};

/// Checkout payload: resolved delivery target + payment selection.
/// Caller identity is explicit, no ambient session.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub buyer_id: String,
    pub delivery_address: String,
    #[serde(default)]
    pub delivery_latitude: Option<f64>,
    #[serde(default)]
    pub delivery_longitude: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    pub payment_method: PaymentMethodType,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order_ids: Vec<String>,
}

/// Place the buyer's cart as one order per seller
pub async fn checkout(
    State(state): State<ServerState>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<CheckoutResponse>> {
    if payload.delivery_address.trim().is_empty() {
        return Err(AppError::validation("Delivery address is required"));
    }

    let info = CheckoutInfo {
        delivery_address: payload.delivery_address,
        delivery_latitude: payload.delivery_latitude,
        delivery_longitude: payload.delivery_longitude,
        notes: payload.notes,
        payment_method: payload.payment_method,
    };

    let order_ids = state
        .placement_service()
        .checkout(&payload.buyer_id, &info)
        .await?;

    Ok(Json(CheckoutResponse { order_ids }))
}

/// Query params for listing orders. Exactly one side must be given
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub buyer_id: Option<String>,
    pub seller_id: Option<String>,
}

/// List orders for a buyer or a seller
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = match (&query.buyer_id, &query.seller_id) {
        (Some(buyer_id), None) => repo.find_by_buyer(buyer_id).await,
        (None, Some(seller_id)) => repo.find_by_seller(seller_id).await,
        _ => {
            return Err(AppError::validation(
                "Exactly one of buyer_id or seller_id is required",
            ));
        }
    }
    .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(orders))
}

/// Seller decision payload (explicit caller identity)
#[derive(Debug, Deserialize)]
pub struct SellerDecision {
    pub seller_id: String,
}

/// Confirm a pending customer order; the delivery engine picks it up
pub async fn confirm(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<SellerDecision>,
) -> AppResult<Json<serde_json::Value>> {
    state
        .fulfillment_service()
        .confirm(&id, &payload.seller_id)
        .await?;
    Ok(Json(serde_json::json!({ "order_id": id, "status": "confirmed" })))
}

/// Cancel a pending customer order (status change, never a delete)
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<SellerDecision>,
) -> AppResult<Json<serde_json::Value>> {
    state
        .fulfillment_service()
        .cancel(&id, &payload.seller_id)
        .await?;
    Ok(Json(serde_json::json!({ "order_id": id, "status": "cancelled" })))
}

#[derive(Debug, Serialize)]
pub struct TrackingResponse {
    #[serde(flatten)]
    pub tracking: DeliveryTracking,
    /// Timeline, oldest first
    pub history: Vec<DeliveryStatusHistory>,
}

/// Tracking record + timeline for an order
pub async fn get_tracking(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<TrackingResponse>> {
    let repo = DeliveryRepository::new(state.db.clone());
    let tracking = repo
        .find_by_order(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("No tracking for order {}", id)))?;
    let history = repo
        .history(&tracking.tracking_id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(TrackingResponse { tracking, history }))
}

/// Get order with line items
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OrderDetail>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;
    let items = repo
        .find_items(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(OrderDetail { order, items }))
}

//! B2B API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::Order;
use crate::orders::{B2bOrderRequest, StockCheck};
use crate::utils::AppResult;

/// Create a retailer→wholesaler stock request
pub async fn create_request(
    State(state): State<ServerState>,
    Json(payload): Json<B2bOrderRequest>,
) -> AppResult<Json<Order>> {
    let order = state.approval_service().create_request(payload).await?;
    Ok(Json(order))
}

/// Re-check stock availability for every line item
pub async fn stock_check(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<StockCheck>> {
    let check = state.approval_service().check_stock(&id).await?;
    Ok(Json(check))
}

#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    pub wholesaler_id: String,
}

#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    pub order_id: String,
    pub status: &'static str,
}

/// Approve a pending request: deduct wholesaler stock, provision retailer stock
pub async fn approve(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ApproveRequest>,
) -> AppResult<Json<DecisionResponse>> {
    state
        .approval_service()
        .approve(&id, &payload.wholesaler_id)
        .await?;
    Ok(Json(DecisionResponse {
        order_id: id,
        status: "confirmed",
    }))
}

#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub wholesaler_id: String,
    pub reason: String,
}

/// Reject a pending request with a mandatory reason
pub async fn reject(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<RejectRequest>,
) -> AppResult<Json<DecisionResponse>> {
    state
        .approval_service()
        .reject(&id, &payload.wholesaler_id, &payload.reason)
        .await?;
    Ok(Json(DecisionResponse {
        order_id: id,
        status: "cancelled",
    }))
}

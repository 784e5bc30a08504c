//! Delivery API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::delivery::DeliveryRunReport;
use crate::utils::AppResult;

/// Manually trigger one progression run (same engine the scheduler calls)
pub async fn run_progression(
    State(state): State<ServerState>,
) -> AppResult<Json<DeliveryRunReport>> {
    let report = state.delivery_engine().run_once().await;
    Ok(Json(report))
}

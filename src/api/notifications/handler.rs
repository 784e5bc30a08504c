//! Notifications API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::Notification;
use crate::db::repository::NotificationRepository;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub user_id: String,
}

/// List a user's notifications, newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Notification>>> {
    let repo = NotificationRepository::new(state.db.clone());
    let rows = repo
        .list_by_user(&query.user_id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(rows))
}

/// Mark one notification read
pub async fn mark_read(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let repo = NotificationRepository::new(state.db.clone());
    let updated = repo
        .mark_read(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    if !updated {
        return Err(AppError::not_found(format!(
            "Notification {} not found",
            id
        )));
    }
    Ok(Json(serde_json::json!({ "read": true })))
}

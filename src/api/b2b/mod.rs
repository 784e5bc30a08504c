//! B2B API Module
//!
//! Retailer→wholesaler requests and the wholesaler's approve/reject decisions.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// B2B router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/b2b", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/requests", post(handler::create_request))
        .route("/orders/{id}/stock-check", get(handler::stock_check))
        .route("/orders/{id}/approve", post(handler::approve))
        .route("/orders/{id}/reject", post(handler::reject))
}

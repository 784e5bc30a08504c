//! Delivery API Module
//!
//! Manual progression trigger (the recurring scheduler hits the same engine).

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

/// Delivery router
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/delivery/run", post(handler::run_progression))
}

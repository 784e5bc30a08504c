//! Cart API Module

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;

/// Cart router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/items", post(handler::add_item))
        .route("/items/{id}", delete(handler::remove_item))
        .route("/{buyer_id}", get(handler::list))
}

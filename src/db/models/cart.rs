//! Cart Item Model
//!
//! Server-side cart rows. Each line is a price snapshot; checkout freezes the
//! snapshot into order items and drains the cart only on total success.

use serde::{Deserialize, Serialize};

/// One line in a buyer's cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub cart_item_id: String,
    pub buyer_id: String,
    pub seller_id: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    /// Price snapshot taken when the item was added
    pub unit_price: f64,
    pub created_at: i64,
}

/// Create payload for adding a cart line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemCreate {
    pub buyer_id: String,
    pub seller_id: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
}

//! Order Model
//!
//! 订单主表 + 订单行。订单行在创建后不可变，数量变更需要新订单。

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Order (主表)
// =============================================================================

/// Order kind: who is buying from whom. Immutable after creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    CustomerToRetailer,
    RetailerToWholesaler,
}

/// Order status enum
///
/// 与 [`super::DeliveryStatus`] 是两个独立的状态机：订单状态粗粒度，
/// 配送状态细粒度，二者通过配送引擎在 `delivered` 处汇合。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    /// Human-readable business number (unique), e.g. `ORD1720000000000A1B2C`
    pub order_number: String,
    pub buyer_id: String,
    pub seller_id: String,
    pub kind: OrderKind,
    pub status: OrderStatus,
    /// Sum of line item subtotals, 2 decimal places
    pub total_amount: f64,
    pub delivery_address: String,
    pub delivery_latitude: Option<f64>,
    pub delivery_longitude: Option<f64>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

// =============================================================================
// Order Item
// =============================================================================

/// One product line within an order. Created atomically with the order,
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub item_id: String,
    pub order_id: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    /// Unit price frozen at order time; catalog changes do not touch it
    pub unit_price: f64,
    /// quantity × unit_price, 2 decimal places
    pub subtotal: f64,
}

/// Order detail for API responses (order + its line items)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

//! Per-seller Product Stock Models
//!
//! 批发商/零售商各自的价格与库存。审批引擎在批准时扣减批发商库存并
//! upsert 零售商库存，二者以 (seller, product) 复合唯一索引约束。

use serde::{Deserialize, Serialize};

/// Wholesaler's stock entry for one product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WholesalerProduct {
    pub wholesaler_id: String,
    pub product_id: String,
    pub product_name: String,
    /// Wholesale unit price
    pub price: f64,
    pub stock_quantity: i64,
    pub is_available: bool,
    /// B2B requests below this quantity are rejected up front
    pub minimum_order_quantity: i64,
    pub updated_at: i64,
}

/// Retailer's stock entry for one product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetailerProduct {
    pub retailer_id: String,
    pub product_id: String,
    pub product_name: String,
    /// Retail unit price (declared by the retailer at request time)
    pub price: f64,
    pub stock_quantity: i64,
    pub is_available: bool,
    pub updated_at: i64,
}

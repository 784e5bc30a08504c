//! Delivery Tracking Models
//!
//! 配送状态机与订单状态机相互独立（见 [`super::order::OrderStatus`]）。
//! `current_status` 沿固定序列单调推进，`cancelled` 为唯一的出界终态。

use serde::{Deserialize, Serialize};
use std::fmt;

/// Delivery status: the fixed progression sequence plus terminal `cancelled`.
///
/// Transitions are owned by the delivery engine; `cancelled` is set elsewhere
/// (order cancellation) and is never advanced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Pending,
    Confirmed,
    Packed,
    PickedUp,
    InTransit,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl DeliveryStatus {
    /// Next status in the fixed progression. `None` for both terminal states.
    pub fn next(self) -> Option<DeliveryStatus> {
        match self {
            DeliveryStatus::Pending => Some(DeliveryStatus::Confirmed),
            DeliveryStatus::Confirmed => Some(DeliveryStatus::Packed),
            DeliveryStatus::Packed => Some(DeliveryStatus::PickedUp),
            DeliveryStatus::PickedUp => Some(DeliveryStatus::InTransit),
            DeliveryStatus::InTransit => Some(DeliveryStatus::OutForDelivery),
            DeliveryStatus::OutForDelivery => Some(DeliveryStatus::Delivered),
            DeliveryStatus::Delivered => None,
            DeliveryStatus::Cancelled => None,
        }
    }

    /// 是否终态（不再被配送引擎处理）
    pub fn is_terminal(self) -> bool {
        matches!(self, DeliveryStatus::Delivered | DeliveryStatus::Cancelled)
    }

    /// Wire value, matching the serde representation
    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::Confirmed => "confirmed",
            DeliveryStatus::Packed => "packed",
            DeliveryStatus::PickedUp => "picked_up",
            DeliveryStatus::InTransit => "in_transit",
            DeliveryStatus::OutForDelivery => "out_for_delivery",
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One-to-one shipment record for a confirmed order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryTracking {
    pub tracking_id: String,
    /// UNIQUE, one tracking per order
    pub order_id: String,
    /// Business number (unique), e.g. `TRK1720000000000A1B2C3`
    pub tracking_number: String,
    pub current_status: DeliveryStatus,
    pub delivery_partner_name: String,
    pub delivery_partner_phone: String,
    pub estimated_delivery_time: i64,
    /// Set only on reaching `delivered`
    pub actual_delivery_time: Option<i64>,
    pub current_latitude: Option<f64>,
    pub current_longitude: Option<f64>,
    pub delivery_notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Append-only log of tracking status transitions.
///
/// 用于计算 "当前状态已停留多久"（推进计时）和渲染时间线。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryStatusHistory {
    pub history_id: String,
    pub tracking_id: String,
    pub status: DeliveryStatus,
    pub timestamp: i64,
    pub location: Option<String>,
    pub notes: Option<String>,
}

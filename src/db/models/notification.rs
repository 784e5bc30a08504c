//! Notification Model
//!
//! User-facing event records. Inserted by the engines as side effects,
//! consumed by UI polling; only the read flag is ever mutated.

use serde::{Deserialize, Serialize};

/// Notification type: closed enum, one value per user-visible event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    OrderPlaced,
    PaymentSuccess,
    PaymentFailed,
    OrderConfirmed,
    OrderPacked,
    OrderShipped,
    OutForDelivery,
    Delivered,
    OrderCancelled,
}

/// Notification entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub notification_id: String,
    /// Recipient
    pub user_id: String,
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    pub related_order_id: Option<String>,
    pub related_transaction_id: Option<String>,
    pub created_at: i64,
}

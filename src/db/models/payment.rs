//! Payment Transaction Model
//!
//! 一条记录对应一次扣款尝试。创建时 `processing`，由支付服务更新一次到终态，
//! 此后不可变。

use serde::{Deserialize, Serialize};

/// Payment method selected at checkout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodType {
    Card,
    Upi,
    Netbanking,
    Cod,
}

/// Payment transaction status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Refunded,
}

/// One attempted charge against one order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentTransaction {
    pub txn_id: String,
    /// Business transaction id (unique), e.g. `TXN1720000000000A1B2C3D4E`
    pub transaction_id: String,
    pub order_id: String,
    pub payer_id: String,
    pub amount: f64,
    pub method: PaymentMethodType,
    pub status: PaymentStatus,
    /// Opaque gateway payload, stored as-is
    pub gateway_response: Option<serde_json::Value>,
    pub failure_reason: Option<String>,
    pub completed_at: Option<i64>,
    pub created_at: i64,
}

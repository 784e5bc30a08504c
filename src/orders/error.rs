//! Order domain errors
//!
//! Every caller-facing variant carries a human-readable reason; the API layer
//! surfaces these messages verbatim.

use thiserror::Error;

use crate::db::models::OrderStatus;
use crate::db::repository::RepoError;
use crate::utils::AppError;

/// Errors raised by the placement, payment and approval engines
#[derive(Debug, Error)]
pub enum OrderError {
    /// Caller input malformed or out of policy, rejected before any write
    #[error("{0}")]
    Validation(String),

    /// Simulated gateway declined the charge (after the compensating delete)
    #[error("Payment declined: {0}")]
    PaymentDeclined(String),

    /// Approval-time stock check failed for one product
    #[error("Insufficient stock for {product}: have {have}, need {need}")]
    InsufficientStock {
        product: String,
        have: i64,
        need: i64,
    },

    /// Approve/reject attempted on an order that is no longer pending
    #[error("Order {order_id} is {status}, expected pending")]
    InvalidTransition {
        order_id: String,
        status: OrderStatus,
    },

    /// Rejection requires a non-empty reason
    #[error("Rejection reason is required")]
    MissingReason,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<RepoError> for OrderError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => OrderError::NotFound(msg),
            other => OrderError::Storage(other.to_string()),
        }
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match &err {
            OrderError::Validation(_) | OrderError::MissingReason => {
                AppError::validation(err.to_string())
            }
            OrderError::PaymentDeclined(_) | OrderError::InsufficientStock { .. } => {
                AppError::business_rule(err.to_string())
            }
            OrderError::InvalidTransition { .. } => AppError::conflict(err.to_string()),
            OrderError::NotFound(_) => AppError::not_found(err.to_string()),
            OrderError::Storage(_) => AppError::database(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message_is_verbatim() {
        let err = OrderError::InsufficientStock {
            product: "Basmati Rice".to_string(),
            have: 3,
            need: 10,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Basmati Rice: have 3, need 10"
        );
    }
}

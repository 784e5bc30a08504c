//! Payment Service
//!
//! Executes one mock charge for an order: inserts the transaction at
//! `processing`, asks the gateway, then writes exactly one terminal update and
//! one notification, regardless of outcome.

use std::sync::Arc;

use surrealdb::engine::local::Db;
use surrealdb::Surreal;
use uuid::Uuid;

use crate::db::models::{
    Notification, NotificationType, PaymentMethodType, PaymentStatus, PaymentTransaction,
};
use crate::db::repository::{NotificationRepository, OrderRepository, PaymentRepository};
use crate::orders::error::OrderError;
use crate::orders::numbers;
use crate::payment::gateway::PaymentGateway;
use crate::utils::time::now_millis;

const DECLINE_REASON: &str = "Payment declined by gateway";

#[derive(Clone)]
pub struct PaymentService {
    gateway: Arc<dyn PaymentGateway>,
    orders: OrderRepository,
    payments: PaymentRepository,
    notifications: NotificationRepository,
}

impl PaymentService {
    pub fn new(db: Surreal<Db>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            gateway,
            orders: OrderRepository::new(db.clone()),
            payments: PaymentRepository::new(db.clone()),
            notifications: NotificationRepository::new(db),
        }
    }

    /// Charge `amount` against `order_id` on behalf of `payer_id`.
    ///
    /// Returns the business transaction id on success; fails with
    /// [`OrderError::PaymentDeclined`] after recording the failed transaction.
    pub async fn charge(
        &self,
        order_id: &str,
        payer_id: &str,
        amount: f64,
        method: PaymentMethodType,
    ) -> Result<String, OrderError> {
        if !(amount > 0.0) {
            return Err(OrderError::Validation(format!(
                "Charge amount must be positive, got {}",
                amount
            )));
        }
        if self.orders.find_by_id(order_id).await?.is_none() {
            return Err(OrderError::NotFound(format!("Order {} not found", order_id)));
        }

        let transaction_id = numbers::transaction_id();
        let txn = PaymentTransaction {
            txn_id: Uuid::new_v4().to_string(),
            transaction_id: transaction_id.clone(),
            order_id: order_id.to_string(),
            payer_id: payer_id.to_string(),
            amount,
            method,
            status: PaymentStatus::Processing,
            gateway_response: None,
            failure_reason: None,
            completed_at: None,
            created_at: now_millis(),
        };
        self.payments.create(txn).await?;

        let outcome = self.gateway.charge(amount, method).await;

        if outcome.approved {
            self.payments
                .mark_completed(
                    &transaction_id,
                    serde_json::json!({
                        "status": "success",
                        "message": outcome.message,
                    }),
                    now_millis(),
                )
                .await?;

            self.notify(
                payer_id,
                NotificationType::PaymentSuccess,
                "Payment Successful",
                format!(
                    "Your payment of ₹{:.2} has been processed successfully.",
                    amount
                ),
                order_id,
                &transaction_id,
            )
            .await;

            tracing::info!(order_id, transaction_id = %transaction_id, amount, "Payment completed");
            Ok(transaction_id)
        } else {
            self.payments
                .mark_failed(
                    &transaction_id,
                    serde_json::json!({
                        "status": "failed",
                        "message": outcome.message,
                    }),
                    DECLINE_REASON.to_string(),
                )
                .await?;

            self.notify(
                payer_id,
                NotificationType::PaymentFailed,
                "Payment Failed",
                format!(
                    "Your payment of ₹{:.2} could not be processed. Please try again.",
                    amount
                ),
                order_id,
                &transaction_id,
            )
            .await;

            tracing::warn!(order_id, transaction_id = %transaction_id, amount, "Payment declined");
            Err(OrderError::PaymentDeclined(DECLINE_REASON.to_string()))
        }
    }

    /// 通知写入失败不反转支付结果，只记日志
    async fn notify(
        &self,
        user_id: &str,
        kind: NotificationType,
        title: &str,
        message: String,
        order_id: &str,
        transaction_id: &str,
    ) {
        let notification = Notification {
            notification_id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            kind,
            title: title.to_string(),
            message,
            read: false,
            related_order_id: Some(order_id.to_string()),
            related_transaction_id: Some(transaction_id.to_string()),
            created_at: now_millis(),
        };
        if let Err(e) = self.notifications.insert(notification).await {
            tracing::error!(user_id, error = %e, "Failed to create payment notification");
        }
    }
}

//! Payment Transaction Repository
//!
//! transaction_id UNIQUE 索引。记录创建于 `processing`，
//! 由支付服务更新一次到终态，此后不可变。

use surrealdb::engine::local::Db;
use surrealdb::Surreal;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::PaymentTransaction;

const TABLE: &str = "payment_transaction";

#[derive(Clone)]
pub struct PaymentRepository {
    base: BaseRepository,
}

impl PaymentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, txn: PaymentTransaction) -> RepoResult<PaymentTransaction> {
        let created: Option<PaymentTransaction> = self
            .base
            .db()
            .create((TABLE, txn.txn_id.clone()))
            .content(txn)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create payment transaction".into()))
    }

    /// Terminal update: completed, with the gateway payload and completion time
    pub async fn mark_completed(
        &self,
        transaction_id: &str,
        gateway_response: serde_json::Value,
        completed_at: i64,
    ) -> RepoResult<()> {
        self.base
            .db()
            .query(
                "UPDATE payment_transaction SET status = 'completed', \
                 gateway_response = $payload, completed_at = $completed_at \
                 WHERE transaction_id = $transaction_id",
            )
            .bind(("transaction_id", transaction_id.to_string()))
            .bind(("payload", gateway_response))
            .bind(("completed_at", completed_at))
            .await?;
        Ok(())
    }

    /// Terminal update: failed, with the decline payload and reason
    pub async fn mark_failed(
        &self,
        transaction_id: &str,
        gateway_response: serde_json::Value,
        failure_reason: String,
    ) -> RepoResult<()> {
        self.base
            .db()
            .query(
                "UPDATE payment_transaction SET status = 'failed', \
                 gateway_response = $payload, failure_reason = $reason \
                 WHERE transaction_id = $transaction_id",
            )
            .bind(("transaction_id", transaction_id.to_string()))
            .bind(("payload", gateway_response))
            .bind(("reason", failure_reason))
            .await?;
        Ok(())
    }

    /// 按订单查询扣款记录
    pub async fn find_by_order(&self, order_id: &str) -> RepoResult<Vec<PaymentTransaction>> {
        let txns: Vec<PaymentTransaction> = self
            .base
            .db()
            .query(
                "SELECT * FROM payment_transaction WHERE order_id = $order_id \
                 ORDER BY created_at ASC",
            )
            .bind(("order_id", order_id.to_string()))
            .await?
            .take(0)?;
        Ok(txns)
    }
}

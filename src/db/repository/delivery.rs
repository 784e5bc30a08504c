//! Delivery Tracking Repository
//!
//! delivery_tracking.order_id UNIQUE 索引保证一单一跟踪；
//! 重叠的 provisioning 把第二次插入当作无害冲突吞掉。

use surrealdb::engine::local::Db;
use surrealdb::Surreal;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{DeliveryStatus, DeliveryStatusHistory, DeliveryTracking};
use crate::utils::time::now_millis;

const TABLE: &str = "delivery_tracking";
const HISTORY_TABLE: &str = "delivery_status_history";

#[derive(Clone)]
pub struct DeliveryRepository {
    base: BaseRepository,
}

impl DeliveryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Insert a tracking record. Returns `false` when a record for the same
    /// order already exists (unique index conflict from overlapping provisioning).
    pub async fn insert_tracking(&self, tracking: DeliveryTracking) -> RepoResult<bool> {
        let tracking_number = tracking.tracking_number.clone();
        let result: Result<Option<DeliveryTracking>, surrealdb::Error> = self
            .base
            .db()
            .create((TABLE, tracking.tracking_id.clone()))
            .content(tracking)
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) => {
                let msg = e.to_string();
                if RepoError::is_duplicate_message(&msg) {
                    // 幂等：另一次 provisioning 先到
                    tracing::debug!(
                        tracking_number = %tracking_number,
                        "Tracking already exists, skipping"
                    );
                    Ok(false)
                } else {
                    Err(RepoError::Database(msg))
                }
            }
        }
    }

    pub async fn find_by_order(&self, order_id: &str) -> RepoResult<Option<DeliveryTracking>> {
        let rows: Vec<DeliveryTracking> = self
            .base
            .db()
            .query("SELECT * FROM delivery_tracking WHERE order_id = $order_id LIMIT 1")
            .bind(("order_id", order_id.to_string()))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next())
    }

    /// All trackings still in flight (neither delivered nor cancelled)
    pub async fn find_active(&self) -> RepoResult<Vec<DeliveryTracking>> {
        let rows: Vec<DeliveryTracking> = self
            .base
            .db()
            .query(
                "SELECT * FROM delivery_tracking \
                 WHERE current_status != 'delivered' AND current_status != 'cancelled' \
                 ORDER BY created_at ASC",
            )
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// Conditional advance guarded on the current status. Returns `false` if the
    /// record already moved on (overlapping invocation won).
    pub async fn advance(
        &self,
        tracking_id: &str,
        from: DeliveryStatus,
        to: DeliveryStatus,
        actual_delivery_time: Option<i64>,
    ) -> RepoResult<bool> {
        let updated: Vec<DeliveryTracking> = self
            .base
            .db()
            .query(
                "UPDATE delivery_tracking SET current_status = $to, \
                 actual_delivery_time = $actual, updated_at = $now \
                 WHERE tracking_id = $tracking_id AND current_status = $from RETURN AFTER",
            )
            .bind(("tracking_id", tracking_id.to_string()))
            .bind(("from", from))
            .bind(("to", to))
            .bind(("actual", actual_delivery_time))
            .bind(("now", now_millis()))
            .await?
            .take(0)?;
        Ok(!updated.is_empty())
    }

    /// Append one history row (never mutated or deleted)
    pub async fn append_history(&self, entry: DeliveryStatusHistory) -> RepoResult<()> {
        let _: Option<DeliveryStatusHistory> = self
            .base
            .db()
            .create((HISTORY_TABLE, entry.history_id.clone()))
            .content(entry)
            .await?;
        Ok(())
    }

    /// Most recent history row for the given status: "when did the tracking
    /// enter its current status". `None` means the status was never logged
    /// (the very first status; caller falls back to the tracking's created_at).
    pub async fn latest_history_for(
        &self,
        tracking_id: &str,
        status: DeliveryStatus,
    ) -> RepoResult<Option<DeliveryStatusHistory>> {
        let rows: Vec<DeliveryStatusHistory> = self
            .base
            .db()
            .query(
                "SELECT * FROM delivery_status_history \
                 WHERE tracking_id = $tracking_id AND status = $status \
                 ORDER BY timestamp DESC LIMIT 1",
            )
            .bind(("tracking_id", tracking_id.to_string()))
            .bind(("status", status))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Full timeline, oldest first
    pub async fn history(&self, tracking_id: &str) -> RepoResult<Vec<DeliveryStatusHistory>> {
        let rows: Vec<DeliveryStatusHistory> = self
            .base
            .db()
            .query(
                "SELECT * FROM delivery_status_history \
                 WHERE tracking_id = $tracking_id ORDER BY timestamp ASC",
            )
            .bind(("tracking_id", tracking_id.to_string()))
            .await?
            .take(0)?;
        Ok(rows)
    }
}

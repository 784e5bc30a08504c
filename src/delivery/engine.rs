//! Delivery Progression Engine
//!
//! 无状态、幂等的批处理。每次调用两趟：
//!
//! 1. **Provisioning**：为每个已确认但无跟踪记录的订单建立配送跟踪
//! 2. **Progression**：对每条在途记录，驻留时间达标则推进一格（最多一格）
//!
//! 单条记录失败只记日志并跳过，批次永不中断。

use std::time::Duration;

use serde::Serialize;
use surrealdb::engine::local::Db;
use surrealdb::Surreal;
use uuid::Uuid;

use crate::db::models::{
    DeliveryStatus, DeliveryStatusHistory, DeliveryTracking, Notification, NotificationType,
    Order, OrderStatus,
};
use crate::db::repository::{DeliveryRepository, NotificationRepository, OrderRepository};
use crate::delivery::progression;
use crate::orders::error::OrderError;
use crate::orders::numbers;
use crate::utils::time::now_millis;

/// Simulated delivery partner assigned to every shipment
const PARTNER_NAME: &str = "Express Delivery";
const PARTNER_PHONE: &str = "+91-9876543210";

/// Engine calibration
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// One dwell unit. Demo: 60 s ("minutes"); production: 3600 s.
    pub dwell_unit: Duration,
    /// Estimated-delivery horizon stamped at provisioning time
    pub horizon: Duration,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            dwell_unit: Duration::from_secs(60),
            horizon: Duration::from_secs(24 * 3600),
        }
    }
}

/// Outcome of one engine invocation
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct DeliveryRunReport {
    pub provisioned: usize,
    pub advanced: usize,
    pub failed: usize,
}

impl DeliveryRunReport {
    pub fn is_quiet(&self) -> bool {
        self.provisioned == 0 && self.advanced == 0 && self.failed == 0
    }
}

#[derive(Clone)]
pub struct DeliveryEngine {
    orders: OrderRepository,
    delivery: DeliveryRepository,
    notifications: NotificationRepository,
    config: DeliveryConfig,
}

impl DeliveryEngine {
    pub fn new(db: Surreal<Db>, config: DeliveryConfig) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            delivery: DeliveryRepository::new(db.clone()),
            notifications: NotificationRepository::new(db),
            config,
        }
    }

    /// One idempotent invocation: provisioning pass then progression pass.
    /// Safe to call on a fixed interval or over HTTP at any frequency.
    pub async fn run_once(&self) -> DeliveryRunReport {
        let mut report = DeliveryRunReport::default();
        self.provision_pass(&mut report).await;
        self.progression_pass(&mut report).await;
        report
    }

    // ========================================================================
    // Provisioning pass
    // ========================================================================

    async fn provision_pass(&self, report: &mut DeliveryRunReport) {
        let confirmed = match self.orders.find_by_status(OrderStatus::Confirmed).await {
            Ok(orders) => orders,
            Err(e) => {
                tracing::error!(error = %e, "Provisioning pass: failed to list confirmed orders");
                report.failed += 1;
                return;
            }
        };

        for order in confirmed {
            match self.provision_order(&order).await {
                Ok(true) => report.provisioned += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(
                        order_number = %order.order_number,
                        error = %e,
                        "Failed to provision tracking, skipping"
                    );
                    report.failed += 1;
                }
            }
        }
    }

    /// Create the tracking record for one confirmed order. Returns `false`
    /// when a record already exists (previous run, or a concurrent one).
    async fn provision_order(&self, order: &Order) -> Result<bool, OrderError> {
        if self.delivery.find_by_order(&order.order_id).await?.is_some() {
            return Ok(false);
        }

        let now = now_millis();
        let tracking = DeliveryTracking {
            tracking_id: Uuid::new_v4().to_string(),
            order_id: order.order_id.clone(),
            tracking_number: numbers::tracking_number(),
            current_status: DeliveryStatus::Pending,
            delivery_partner_name: PARTNER_NAME.to_string(),
            delivery_partner_phone: PARTNER_PHONE.to_string(),
            estimated_delivery_time: now + self.config.horizon.as_millis() as i64,
            actual_delivery_time: None,
            current_latitude: order.delivery_latitude,
            current_longitude: order.delivery_longitude,
            delivery_notes: None,
            created_at: now,
            updated_at: now,
        };
        let tracking_number = tracking.tracking_number.clone();

        // Unique index on order_id: a concurrent provisioning loses quietly
        if !self.delivery.insert_tracking(tracking).await? {
            return Ok(false);
        }

        self.notify(
            &order.buyer_id,
            NotificationType::OrderConfirmed,
            "Order Confirmed",
            format!(
                "Your order #{} has been confirmed and tracking has started.",
                order.order_number
            ),
            &order.order_id,
        )
        .await;

        tracing::info!(
            tracking_number = %tracking_number,
            order_number = %order.order_number,
            "Created delivery tracking"
        );
        Ok(true)
    }

    // ========================================================================
    // Progression pass
    // ========================================================================

    async fn progression_pass(&self, report: &mut DeliveryRunReport) {
        let active = match self.delivery.find_active().await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!(error = %e, "Progression pass: failed to list active deliveries");
                report.failed += 1;
                return;
            }
        };

        for tracking in active {
            match self.progress_tracking(&tracking).await {
                Ok(true) => report.advanced += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(
                        tracking_number = %tracking.tracking_number,
                        error = %e,
                        "Failed to advance delivery, skipping"
                    );
                    report.failed += 1;
                }
            }
        }
    }

    /// Advance one tracking by at most one status. Returns whether it moved.
    async fn progress_tracking(&self, tracking: &DeliveryTracking) -> Result<bool, OrderError> {
        let current = tracking.current_status;
        let Some(next) = current.next() else {
            return Ok(false);
        };
        let Some(required_ms) = progression::dwell_millis(current, self.config.dwell_unit) else {
            return Ok(false);
        };

        // 当前状态进入时刻：最近一条同状态 history，否则回退到创建时间
        let entered_at = self
            .delivery
            .latest_history_for(&tracking.tracking_id, current)
            .await?
            .map(|h| h.timestamp)
            .unwrap_or(tracking.created_at);

        let now = now_millis();
        if now - entered_at < required_ms {
            return Ok(false);
        }

        let actual_delivery = (next == DeliveryStatus::Delivered).then_some(now);
        // Guarded on the current status: an overlapping run advances at most once
        if !self
            .delivery
            .advance(&tracking.tracking_id, current, next, actual_delivery)
            .await?
        {
            tracing::debug!(
                tracking_number = %tracking.tracking_number,
                "Tracking already advanced by a concurrent run"
            );
            return Ok(false);
        }

        self.delivery
            .append_history(DeliveryStatusHistory {
                history_id: Uuid::new_v4().to_string(),
                tracking_id: tracking.tracking_id.clone(),
                status: next,
                timestamp: now,
                location: None,
                notes: None,
            })
            .await?;

        let order = self
            .orders
            .find_by_id(&tracking.order_id)
            .await?
            .ok_or_else(|| {
                OrderError::NotFound(format!("Order {} not found", tracking.order_id))
            })?;

        if next == DeliveryStatus::Delivered {
            self.orders
                .set_status(&order.order_id, OrderStatus::Delivered)
                .await?;
        }

        if let Some((kind, text)) = progression::notification_for(next) {
            self.notify(
                &order.buyer_id,
                kind,
                text,
                format!("Order #{} - {}", order.order_number, text),
                &order.order_id,
            )
            .await;
        }

        tracing::info!(
            tracking_number = %tracking.tracking_number,
            from = %current,
            to = %next,
            "Delivery advanced"
        );
        Ok(true)
    }

    async fn notify(
        &self,
        user_id: &str,
        kind: NotificationType,
        title: &str,
        message: String,
        order_id: &str,
    ) {
        let notification = Notification {
            notification_id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            kind,
            title: title.to_string(),
            message,
            read: false,
            related_order_id: Some(order_id.to_string()),
            related_transaction_id: None,
            created_at: now_millis(),
        };
        if let Err(e) = self.notifications.insert(notification).await {
            tracing::error!(user_id, error = %e, "Failed to create delivery notification");
        }
    }
}

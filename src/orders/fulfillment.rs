//! Seller fulfillment decisions for customer orders
//!
//! 零售商对 `customer_to_retailer` 待处理订单的确认/取消。确认后的订单
//! 由配送引擎接手（provisioning + progression）。B2B 订单走审批引擎。

use surrealdb::engine::local::Db;
use surrealdb::Surreal;

use crate::db::models::{Order, OrderKind, OrderStatus};
use crate::db::repository::OrderRepository;
use crate::orders::error::OrderError;

#[derive(Clone)]
pub struct FulfillmentService {
    orders: OrderRepository,
}

impl FulfillmentService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            orders: OrderRepository::new(db),
        }
    }

    /// Confirm a pending customer order and hand it to the delivery engine
    pub async fn confirm(&self, order_id: &str, seller_id: &str) -> Result<(), OrderError> {
        let order = self.load_customer_order(order_id, seller_id).await?;
        self.decide(&order, OrderStatus::Confirmed).await
    }

    /// Cancel a pending customer order. Cancellation is a status, not a delete.
    pub async fn cancel(&self, order_id: &str, seller_id: &str) -> Result<(), OrderError> {
        let order = self.load_customer_order(order_id, seller_id).await?;
        self.decide(&order, OrderStatus::Cancelled).await
    }

    async fn decide(&self, order: &Order, to: OrderStatus) -> Result<(), OrderError> {
        if order.status != OrderStatus::Pending {
            return Err(OrderError::InvalidTransition {
                order_id: order.order_id.clone(),
                status: order.status,
            });
        }
        if !self
            .orders
            .transition(&order.order_id, OrderStatus::Pending, to)
            .await?
        {
            // 并发决策抢先，重读拿到当前状态
            let status = self
                .orders
                .find_by_id(&order.order_id)
                .await?
                .map(|o| o.status)
                .ok_or_else(|| {
                    OrderError::NotFound(format!("Order {} not found", order.order_id))
                })?;
            return Err(OrderError::InvalidTransition {
                order_id: order.order_id.clone(),
                status,
            });
        }

        tracing::info!(order_number = %order.order_number, to = %to, "Customer order decided");
        Ok(())
    }

    async fn load_customer_order(
        &self,
        order_id: &str,
        seller_id: &str,
    ) -> Result<Order, OrderError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("Order {} not found", order_id)))?;
        if order.seller_id != seller_id {
            return Err(OrderError::NotFound(format!("Order {} not found", order_id)));
        }
        if order.kind != OrderKind::CustomerToRetailer {
            return Err(OrderError::Validation(format!(
                "Order {} is not a customer order; use the approval flow",
                order.order_number
            )));
        }
        Ok(order)
    }
}

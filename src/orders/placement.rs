//! Order Placement Engine
//!
//! 多卖家购物车拆单：每个卖家一张订单，逐单 插入订单 → 插入行 → 扣款，
//! 扣款失败则补偿删除该单并中止整个下单流程。
//!
//! Cross-seller atomicity is deliberately NOT provided: a failure on partition
//! N leaves partitions 1..N-1 committed and the cart undrained. The cart is
//! emptied only when every partition succeeds.

use std::collections::BTreeMap;

use surrealdb::engine::local::Db;
use surrealdb::Surreal;
use uuid::Uuid;

use crate::db::models::{
    CartItem, Notification, NotificationType, Order, OrderItem, OrderKind, OrderStatus,
    PaymentMethodType,
};
use crate::db::repository::{CartRepository, NotificationRepository, OrderRepository};
use crate::orders::error::OrderError;
use crate::orders::{money, numbers};
use crate::payment::PaymentService;
use crate::utils::time::now_millis;

/// Resolved checkout data: delivery target and payment selection
#[derive(Debug, Clone)]
pub struct CheckoutInfo {
    pub delivery_address: String,
    pub delivery_latitude: Option<f64>,
    pub delivery_longitude: Option<f64>,
    pub notes: Option<String>,
    pub payment_method: PaymentMethodType,
}

#[derive(Clone)]
pub struct OrderPlacementService {
    orders: OrderRepository,
    cart: CartRepository,
    notifications: NotificationRepository,
    payments: PaymentService,
}

impl OrderPlacementService {
    pub fn new(db: Surreal<Db>, payments: PaymentService) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            cart: CartRepository::new(db.clone()),
            notifications: NotificationRepository::new(db),
            payments,
        }
    }

    /// Load the buyer's cart and place it. HTTP checkout entry point.
    pub async fn checkout(
        &self,
        buyer_id: &str,
        info: &CheckoutInfo,
    ) -> Result<Vec<String>, OrderError> {
        let items = self.cart.list_by_buyer(buyer_id).await?;
        self.place_order(buyer_id, items, info).await
    }

    /// Place a multi-seller cart: one order per distinct seller.
    ///
    /// Returns the created order ids. On a payment decline the failing
    /// sub-order is compensated away, remaining partitions are not attempted,
    /// and the cart is left untouched.
    pub async fn place_order(
        &self,
        buyer_id: &str,
        items: Vec<CartItem>,
        info: &CheckoutInfo,
    ) -> Result<Vec<String>, OrderError> {
        if items.is_empty() {
            return Err(OrderError::Validation("Cart is empty".to_string()));
        }
        for item in &items {
            money::validate_cart_item(item)?;
        }

        // Partition by seller. BTreeMap 保证分区处理顺序确定。
        let mut partitions: BTreeMap<String, Vec<CartItem>> = BTreeMap::new();
        for item in items {
            partitions.entry(item.seller_id.clone()).or_default().push(item);
        }

        let mut order_ids = Vec::with_capacity(partitions.len());

        for (seller_id, partition) in partitions {
            let order_id = self
                .place_partition(buyer_id, &seller_id, &partition, info)
                .await?;
            order_ids.push(order_id);
        }

        // Cart drains only after every partition succeeded
        self.cart.clear_buyer(buyer_id).await?;

        tracing::info!(
            buyer_id,
            orders = order_ids.len(),
            "Order placement completed"
        );
        Ok(order_ids)
    }

    /// One seller partition: insert order → insert items → charge → notify.
    async fn place_partition(
        &self,
        buyer_id: &str,
        seller_id: &str,
        partition: &[CartItem],
        info: &CheckoutInfo,
    ) -> Result<String, OrderError> {
        let total = money::partition_total(partition);
        let order_number = numbers::order_number();
        let now = now_millis();

        let order = Order {
            order_id: Uuid::new_v4().to_string(),
            order_number: order_number.clone(),
            buyer_id: buyer_id.to_string(),
            seller_id: seller_id.to_string(),
            kind: OrderKind::CustomerToRetailer,
            status: OrderStatus::Pending,
            total_amount: total,
            delivery_address: info.delivery_address.clone(),
            delivery_latitude: info.delivery_latitude,
            delivery_longitude: info.delivery_longitude,
            notes: info.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        let order_id = order.order_id.clone();

        let line_items: Vec<OrderItem> = partition
            .iter()
            .map(|item| OrderItem {
                item_id: Uuid::new_v4().to_string(),
                order_id: order_id.clone(),
                product_id: item.product_id.clone(),
                product_name: item.product_name.clone(),
                quantity: item.quantity,
                // Unit price frozen from the cart snapshot
                unit_price: item.unit_price,
                subtotal: money::line_subtotal(item.unit_price, item.quantity),
            })
            .collect();

        self.orders.create_with_items(order, line_items).await?;

        // Charge the sub-order total; on failure this sub-order never existed
        // from the buyer's perspective.
        if let Err(e) = self
            .payments
            .charge(&order_id, buyer_id, total, info.payment_method)
            .await
        {
            tracing::warn!(
                order_number = %order_number,
                error = %e,
                "Payment failed, rolling back sub-order"
            );
            self.orders.delete_with_items(&order_id).await?;
            return Err(e);
        }

        let notification = Notification {
            notification_id: Uuid::new_v4().to_string(),
            user_id: buyer_id.to_string(),
            kind: NotificationType::OrderPlaced,
            title: "Order Placed Successfully".to_string(),
            message: format!("Your order #{} has been placed successfully.", order_number),
            read: false,
            related_order_id: Some(order_id.clone()),
            related_transaction_id: None,
            created_at: now_millis(),
        };
        if let Err(e) = self.notifications.insert(notification).await {
            tracing::error!(order_number = %order_number, error = %e, "Failed to create order notification");
        }

        Ok(order_id)
    }
}

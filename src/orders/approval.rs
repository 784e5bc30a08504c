//! B2B Approval Engine
//!
//! 零售商向批发商的进货单：创建（校验起订量/库存上限/零售价下限）、
//! 库存复核、批准（扣减批发库存 + 转移到零售库存）、驳回（原因必填）。
//!
//! Concurrency: the pending→confirmed conditional transition is the lock;
//! exactly one concurrent decision wins. Stock decrements are conditional
//! (`stock_quantity >= qty`) and never trust an earlier read; a partial
//! failure restores what was already deducted and reverts the order.

use serde::{Deserialize, Serialize};
use surrealdb::engine::local::Db;
use surrealdb::Surreal;
use uuid::Uuid;

use crate::db::models::{
    Notification, NotificationType, Order, OrderItem, OrderKind, OrderStatus,
};
use crate::db::repository::{NotificationRepository, OrderRepository, StockRepository};
use crate::orders::error::OrderError;
use crate::orders::{money, numbers};
use crate::utils::time::now_millis;

const RESALE_NOTE_PREFIX: &str = "Desired retail price:";

/// Retailer-initiated stock replenishment request
#[derive(Debug, Clone, Deserialize)]
pub struct B2bOrderRequest {
    pub retailer_id: String,
    pub wholesaler_id: String,
    pub product_id: String,
    pub quantity: i64,
    /// Price the retailer intends to resell at. Must exceed the wholesale price
    pub retail_price: f64,
    /// Retailer's resolved business address
    pub delivery_address: String,
}

/// Per-item availability verdict
#[derive(Debug, Clone, Serialize)]
pub struct StockCheckItem {
    pub product_id: String,
    pub product_name: String,
    pub available: bool,
    pub current_stock: i64,
    pub needed_qty: i64,
}

/// Stock availability across all line items of an order
#[derive(Debug, Clone, Serialize)]
pub struct StockCheck {
    pub all_available: bool,
    pub items: Vec<StockCheckItem>,
}

#[derive(Clone)]
pub struct ApprovalService {
    orders: OrderRepository,
    stock: StockRepository,
    notifications: NotificationRepository,
}

impl ApprovalService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            stock: StockRepository::new(db.clone()),
            notifications: NotificationRepository::new(db),
        }
    }

    // ========================================================================
    // Request creation
    // ========================================================================

    /// Create a `pending` retailer→wholesaler order.
    ///
    /// All policy checks run before any row is written. The line item is priced
    /// at the *wholesale* unit price; the declared resale price travels only in
    /// the order notes.
    pub async fn create_request(&self, req: B2bOrderRequest) -> Result<Order, OrderError> {
        if !req.retail_price.is_finite() {
            return Err(OrderError::Validation(format!(
                "Retail price must be a finite number, got {}",
                req.retail_price
            )));
        }

        let product = self
            .stock
            .get_wholesaler(&req.wholesaler_id, &req.product_id)
            .await?
            .ok_or_else(|| {
                OrderError::NotFound(format!(
                    "Product {} not offered by wholesaler {}",
                    req.product_id, req.wholesaler_id
                ))
            })?;

        if req.quantity < product.minimum_order_quantity {
            return Err(OrderError::Validation(format!(
                "Minimum order quantity is {} units",
                product.minimum_order_quantity
            )));
        }
        if req.quantity > product.stock_quantity {
            return Err(OrderError::Validation(format!(
                "Maximum available quantity is {} units",
                product.stock_quantity
            )));
        }
        if req.retail_price <= product.price {
            return Err(OrderError::Validation(format!(
                "Retail price must be higher than wholesale price (₹{:.2})",
                product.price
            )));
        }

        let now = now_millis();
        let order = Order {
            order_id: Uuid::new_v4().to_string(),
            order_number: numbers::order_number(),
            buyer_id: req.retailer_id.clone(),
            seller_id: req.wholesaler_id.clone(),
            kind: OrderKind::RetailerToWholesaler,
            status: OrderStatus::Pending,
            total_amount: money::line_subtotal(product.price, req.quantity),
            delivery_address: req.delivery_address.clone(),
            delivery_latitude: None,
            delivery_longitude: None,
            notes: Some(format!("{} ₹{:.2}", RESALE_NOTE_PREFIX, req.retail_price)),
            created_at: now,
            updated_at: now,
        };

        let item = OrderItem {
            item_id: Uuid::new_v4().to_string(),
            order_id: order.order_id.clone(),
            product_id: req.product_id.clone(),
            product_name: product.product_name.clone(),
            quantity: req.quantity,
            unit_price: product.price,
            subtotal: money::line_subtotal(product.price, req.quantity),
        };

        let created = self.orders.create_with_items(order, vec![item]).await?;

        let notification = Notification {
            notification_id: Uuid::new_v4().to_string(),
            user_id: req.wholesaler_id.clone(),
            kind: NotificationType::OrderPlaced,
            title: "New Product Request".to_string(),
            message: format!(
                "Retailer {} requested {} units of {}",
                req.retailer_id, req.quantity, product.product_name
            ),
            read: false,
            related_order_id: Some(created.order_id.clone()),
            related_transaction_id: None,
            created_at: now_millis(),
        };
        if let Err(e) = self.notifications.insert(notification).await {
            tracing::error!(order_id = %created.order_id, error = %e, "Failed to create request notification");
        }

        tracing::info!(
            order_number = %created.order_number,
            retailer = %req.retailer_id,
            wholesaler = %req.wholesaler_id,
            "B2B request created"
        );
        Ok(created)
    }

    // ========================================================================
    // Stock check
    // ========================================================================

    /// Availability of every line item against the wholesaler's current stock.
    /// Missing stock rows count as unavailable with current = 0.
    pub async fn check_stock(&self, order_id: &str) -> Result<StockCheck, OrderError> {
        let order = self.load_b2b_order(order_id).await?;
        let items = self.orders.find_items(order_id).await?;

        let mut checks = Vec::with_capacity(items.len());
        for item in &items {
            let stock = self
                .stock
                .get_wholesaler(&order.seller_id, &item.product_id)
                .await?;
            let current = stock.map(|s| s.stock_quantity).unwrap_or(0);
            checks.push(StockCheckItem {
                product_id: item.product_id.clone(),
                product_name: item.product_name.clone(),
                available: current >= item.quantity,
                current_stock: current,
                needed_qty: item.quantity,
            });
        }

        Ok(StockCheck {
            all_available: checks.iter().all(|c| c.available),
            items: checks,
        })
    }

    // ========================================================================
    // Approve
    // ========================================================================

    /// Approve a pending request: confirm the order, deduct wholesaler stock,
    /// provision/extend the retailer's stock at the declared resale price.
    pub async fn approve(&self, order_id: &str, wholesaler_id: &str) -> Result<(), OrderError> {
        let order = self.load_owned_b2b_order(order_id, wholesaler_id).await?;
        if order.status != OrderStatus::Pending {
            return Err(OrderError::InvalidTransition {
                order_id: order_id.to_string(),
                status: order.status,
            });
        }

        let items = self.orders.find_items(order_id).await?;

        // Display-time check; the decrement below re-validates under write
        let check = self.check_stock(order_id).await?;
        if let Some(missing) = check.items.iter().find(|c| !c.available) {
            return Err(OrderError::InsufficientStock {
                product: missing.product_name.clone(),
                have: missing.current_stock,
                need: missing.needed_qty,
            });
        }

        // The transition is the lock: only one concurrent decision wins it
        if !self
            .orders
            .transition(order_id, OrderStatus::Pending, OrderStatus::Confirmed)
            .await?
        {
            return self.invalid_transition(order_id).await;
        }

        // Deduct stock item by item; any failure restores what was deducted
        // and hands the order back to pending.
        let mut deducted: Vec<&OrderItem> = Vec::new();
        for item in &items {
            let ok = self
                .stock
                .decrement_wholesaler_stock(&order.seller_id, &item.product_id, item.quantity)
                .await?;
            if !ok {
                for done in &deducted {
                    self.stock
                        .restore_wholesaler_stock(&order.seller_id, &done.product_id, done.quantity)
                        .await?;
                }
                self.orders
                    .transition(order_id, OrderStatus::Confirmed, OrderStatus::Pending)
                    .await?;

                let current = self
                    .stock
                    .get_wholesaler(&order.seller_id, &item.product_id)
                    .await?
                    .map(|s| s.stock_quantity)
                    .unwrap_or(0);
                return Err(OrderError::InsufficientStock {
                    product: item.product_name.clone(),
                    have: current,
                    need: item.quantity,
                });
            }
            deducted.push(item);
        }

        // Transfer to the retailer at the declared resale price
        let resale = parse_resale_price(order.notes.as_deref());
        for item in &items {
            let price = resale.unwrap_or_else(|| {
                tracing::warn!(
                    order_number = %order.order_number,
                    "No resale price in order notes, falling back to wholesale price"
                );
                item.unit_price
            });
            self.stock
                .add_retailer_stock(
                    &order.buyer_id,
                    &item.product_id,
                    &item.product_name,
                    item.quantity,
                    price,
                )
                .await?;
        }

        // No approval notification by design; the retailer sees the status flip.
        tracing::info!(
            order_number = %order.order_number,
            wholesaler = %wholesaler_id,
            "B2B order approved, stock transferred"
        );
        Ok(())
    }

    // ========================================================================
    // Reject
    // ========================================================================

    /// Reject a pending request with a mandatory reason. The reason is appended
    /// to the order notes and sent verbatim to the retailer.
    pub async fn reject(
        &self,
        order_id: &str,
        wholesaler_id: &str,
        reason: &str,
    ) -> Result<(), OrderError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(OrderError::MissingReason);
        }

        let order = self.load_owned_b2b_order(order_id, wholesaler_id).await?;
        if order.status != OrderStatus::Pending {
            return Err(OrderError::InvalidTransition {
                order_id: order_id.to_string(),
                status: order.status,
            });
        }

        if !self
            .orders
            .transition(order_id, OrderStatus::Pending, OrderStatus::Cancelled)
            .await?
        {
            return self.invalid_transition(order_id).await;
        }

        let notes = match &order.notes {
            Some(existing) => format!("{}\nRejected: {}", existing, reason),
            None => format!("Rejected: {}", reason),
        };
        self.orders.update_notes(order_id, notes).await?;

        let notification = Notification {
            notification_id: Uuid::new_v4().to_string(),
            user_id: order.buyer_id.clone(),
            kind: NotificationType::OrderCancelled,
            title: "Order Rejected".to_string(),
            message: format!(
                "Your product request #{} was rejected. Reason: {}",
                order.order_number, reason
            ),
            read: false,
            related_order_id: Some(order.order_id.clone()),
            related_transaction_id: None,
            created_at: now_millis(),
        };
        if let Err(e) = self.notifications.insert(notification).await {
            tracing::error!(order_id, error = %e, "Failed to create rejection notification");
        }

        tracing::info!(order_number = %order.order_number, "B2B order rejected");
        Ok(())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn load_b2b_order(&self, order_id: &str) -> Result<Order, OrderError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("Order {} not found", order_id)))?;
        if order.kind != OrderKind::RetailerToWholesaler {
            return Err(OrderError::Validation(format!(
                "Order {} is not a retailer-to-wholesaler order",
                order.order_number
            )));
        }
        Ok(order)
    }

    async fn load_owned_b2b_order(
        &self,
        order_id: &str,
        wholesaler_id: &str,
    ) -> Result<Order, OrderError> {
        let order = self.load_b2b_order(order_id).await?;
        if order.seller_id != wholesaler_id {
            return Err(OrderError::NotFound(format!("Order {} not found", order_id)));
        }
        Ok(order)
    }

    /// 条件迁移失败后重新读取当前状态，给出准确的错误
    async fn invalid_transition(&self, order_id: &str) -> Result<(), OrderError> {
        let status = self
            .orders
            .find_by_id(order_id)
            .await?
            .map(|o| o.status)
            .ok_or_else(|| OrderError::NotFound(format!("Order {} not found", order_id)))?;
        Err(OrderError::InvalidTransition {
            order_id: order_id.to_string(),
            status,
        })
    }
}

/// Extract the declared resale price from the `Desired retail price: ₹x.yz` note
fn parse_resale_price(notes: Option<&str>) -> Option<f64> {
    let notes = notes?;
    for line in notes.lines() {
        if let Some(rest) = line.trim().strip_prefix(RESALE_NOTE_PREFIX) {
            let cleaned = rest.trim().trim_start_matches('₹');
            if let Ok(price) = cleaned.parse::<f64>() {
                if price.is_finite() && price > 0.0 {
                    return Some(price);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resale_price_round_trip() {
        let notes = format!("{} ₹{:.2}", RESALE_NOTE_PREFIX, 149.5);
        assert_eq!(parse_resale_price(Some(&notes)), Some(149.5));
    }

    #[test]
    fn test_parse_resale_price_survives_rejection_note() {
        let notes = "Desired retail price: ₹120.00\nRejected: out of stock";
        assert_eq!(parse_resale_price(Some(notes)), Some(120.0));
    }

    #[test]
    fn test_parse_resale_price_missing_or_garbage() {
        assert_eq!(parse_resale_price(None), None);
        assert_eq!(parse_resale_price(Some("free-text note")), None);
        assert_eq!(
            parse_resale_price(Some("Desired retail price: ₹not-a-number")),
            None
        );
        assert_eq!(
            parse_resale_price(Some("Desired retail price: ₹-5.0")),
            None
        );
    }
}

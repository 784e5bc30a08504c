//! Order Repository
//!
//! 订单 + 订单行。状态迁移一律走条件更新（`WHERE status = $from`），
//! 并发下只有一个迁移会赢。

use surrealdb::engine::local::Db;
use surrealdb::Surreal;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Order, OrderItem, OrderStatus};
use crate::utils::time::now_millis;

const TABLE: &str = "order";
const ITEM_TABLE: &str = "order_item";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Insert an order followed by its line items.
    ///
    /// 行插入失败时调用方负责补偿（删除半成品订单），与支付失败同路径。
    pub async fn create_with_items(
        &self,
        order: Order,
        items: Vec<OrderItem>,
    ) -> RepoResult<Order> {
        let created: Option<Order> = self
            .base
            .db()
            .create((TABLE, order.order_id.clone()))
            .content(order)
            .await?;
        let order =
            created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))?;

        for item in items {
            let _: Option<OrderItem> = self
                .base
                .db()
                .create((ITEM_TABLE, item.item_id.clone()))
                .content(item)
                .await?;
        }

        Ok(order)
    }

    pub async fn find_by_id(&self, order_id: &str) -> RepoResult<Option<Order>> {
        let order: Option<Order> = self.base.db().select((TABLE, order_id)).await?;
        Ok(order)
    }

    /// Line items of an order
    pub async fn find_items(&self, order_id: &str) -> RepoResult<Vec<OrderItem>> {
        let items: Vec<OrderItem> = self
            .base
            .db()
            .query("SELECT * FROM order_item WHERE order_id = $order_id")
            .bind(("order_id", order_id.to_string()))
            .await?
            .take(0)?;
        Ok(items)
    }

    pub async fn find_by_buyer(&self, buyer_id: &str) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE buyer_id = $buyer_id ORDER BY created_at DESC")
            .bind(("buyer_id", buyer_id.to_string()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    pub async fn find_by_seller(&self, seller_id: &str) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE seller_id = $seller_id ORDER BY created_at DESC")
            .bind(("seller_id", seller_id.to_string()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Orders currently in a given status (provisioning pass input)
    pub async fn find_by_status(&self, status: OrderStatus) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE status = $status ORDER BY created_at ASC")
            .bind(("status", status))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Conditional status transition. Returns `false` if the order was no longer
    /// in `from` (a concurrent transition won).
    pub async fn transition(
        &self,
        order_id: &str,
        from: OrderStatus,
        to: OrderStatus,
    ) -> RepoResult<bool> {
        let updated: Vec<Order> = self
            .base
            .db()
            .query(
                "UPDATE order SET status = $to, updated_at = $now \
                 WHERE order_id = $order_id AND status = $from RETURN AFTER",
            )
            .bind(("order_id", order_id.to_string()))
            .bind(("from", from))
            .bind(("to", to))
            .bind(("now", now_millis()))
            .await?
            .take(0)?;
        Ok(!updated.is_empty())
    }

    /// Unconditional status set (delivery engine promoting to `delivered`)
    pub async fn set_status(&self, order_id: &str, to: OrderStatus) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE order SET status = $to, updated_at = $now WHERE order_id = $order_id")
            .bind(("order_id", order_id.to_string()))
            .bind(("to", to))
            .bind(("now", now_millis()))
            .await?;
        Ok(())
    }

    /// Replace the order notes (reject path appends the reason upstream)
    pub async fn update_notes(&self, order_id: &str, notes: String) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE order SET notes = $notes, updated_at = $now WHERE order_id = $order_id")
            .bind(("order_id", order_id.to_string()))
            .bind(("notes", notes))
            .bind(("now", now_millis()))
            .await?;
        Ok(())
    }

    /// Compensating delete: line items first, then the order.
    ///
    /// 只有支付失败补偿路径会调用；取消是状态不是删除。
    pub async fn delete_with_items(&self, order_id: &str) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE order_item WHERE order_id = $order_id")
            .bind(("order_id", order_id.to_string()))
            .await?;
        self.base
            .db()
            .query("DELETE order WHERE order_id = $order_id")
            .bind(("order_id", order_id.to_string()))
            .await?;
        Ok(())
    }
}

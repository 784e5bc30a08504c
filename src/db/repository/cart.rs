//! Cart Repository

use surrealdb::engine::local::Db;
use surrealdb::Surreal;
use uuid::Uuid;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{CartItem, CartItemCreate};
use crate::utils::time::now_millis;

const TABLE: &str = "cart_item";

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn add(&self, data: CartItemCreate) -> RepoResult<CartItem> {
        let item = CartItem {
            cart_item_id: Uuid::new_v4().to_string(),
            buyer_id: data.buyer_id,
            seller_id: data.seller_id,
            product_id: data.product_id,
            product_name: data.product_name,
            quantity: data.quantity,
            unit_price: data.unit_price,
            created_at: now_millis(),
        };
        let created: Option<CartItem> = self
            .base
            .db()
            .create((TABLE, item.cart_item_id.clone()))
            .content(item)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create cart item".into()))
    }

    pub async fn list_by_buyer(&self, buyer_id: &str) -> RepoResult<Vec<CartItem>> {
        let rows: Vec<CartItem> = self
            .base
            .db()
            .query("SELECT * FROM cart_item WHERE buyer_id = $buyer_id ORDER BY created_at ASC")
            .bind(("buyer_id", buyer_id.to_string()))
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// Remove one line. Returns `false` if it does not exist.
    pub async fn remove(&self, cart_item_id: &str) -> RepoResult<bool> {
        let existing: Option<CartItem> = self.base.db().select((TABLE, cart_item_id)).await?;
        if existing.is_none() {
            return Ok(false);
        }
        let _: Option<CartItem> = self.base.db().delete((TABLE, cart_item_id)).await?;
        Ok(true)
    }

    /// 结账成功后清空买家购物车
    pub async fn clear_buyer(&self, buyer_id: &str) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE cart_item WHERE buyer_id = $buyer_id")
            .bind(("buyer_id", buyer_id.to_string()))
            .await?;
        Ok(())
    }
}

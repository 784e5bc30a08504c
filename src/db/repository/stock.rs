//! Product Stock Repository
//!
//! 审批路径的并发关键点：扣减必须是条件更新（`stock_quantity >= $qty`），
//! 不能信任之前读到的库存。见 [`Self::decrement_wholesaler_stock`]。

use surrealdb::engine::local::Db;
use surrealdb::Surreal;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{RetailerProduct, WholesalerProduct};
use crate::utils::time::now_millis;

const WHOLESALER_TABLE: &str = "wholesaler_product";
const RETAILER_TABLE: &str = "retailer_product";

#[derive(Clone)]
pub struct StockRepository {
    base: BaseRepository,
}

impl StockRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    // ========================================================================
    // Wholesaler stock
    // ========================================================================

    pub async fn get_wholesaler(
        &self,
        wholesaler_id: &str,
        product_id: &str,
    ) -> RepoResult<Option<WholesalerProduct>> {
        let rows: Vec<WholesalerProduct> = self
            .base
            .db()
            .query(
                "SELECT * FROM wholesaler_product \
                 WHERE wholesaler_id = $wholesaler_id AND product_id = $product_id LIMIT 1",
            )
            .bind(("wholesaler_id", wholesaler_id.to_string()))
            .bind(("product_id", product_id.to_string()))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Create or replace a wholesaler stock row (seeding / catalog sync)
    pub async fn put_wholesaler(&self, entry: WholesalerProduct) -> RepoResult<WholesalerProduct> {
        // 先删后建，(wholesaler, product) 唯一索引兜底
        self.base
            .db()
            .query(
                "DELETE wholesaler_product \
                 WHERE wholesaler_id = $wholesaler_id AND product_id = $product_id",
            )
            .bind(("wholesaler_id", entry.wholesaler_id.clone()))
            .bind(("product_id", entry.product_id.clone()))
            .await?;

        let created: Option<WholesalerProduct> = self
            .base
            .db()
            .create(WHOLESALER_TABLE)
            .content(entry)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create wholesaler stock".into()))
    }

    /// Conditional decrement: succeeds only while `stock_quantity >= qty`.
    /// Returns `false` when stock is insufficient at execution time;
    /// the caller must treat an earlier read as advisory only.
    pub async fn decrement_wholesaler_stock(
        &self,
        wholesaler_id: &str,
        product_id: &str,
        qty: i64,
    ) -> RepoResult<bool> {
        let updated: Vec<WholesalerProduct> = self
            .base
            .db()
            .query(
                "UPDATE wholesaler_product \
                 SET stock_quantity -= $qty, updated_at = $now \
                 WHERE wholesaler_id = $wholesaler_id AND product_id = $product_id \
                 AND stock_quantity >= $qty RETURN AFTER",
            )
            .bind(("wholesaler_id", wholesaler_id.to_string()))
            .bind(("product_id", product_id.to_string()))
            .bind(("qty", qty))
            .bind(("now", now_millis()))
            .await?
            .take(0)?;
        Ok(!updated.is_empty())
    }

    /// Compensation for a partially applied approval: give the quantity back
    pub async fn restore_wholesaler_stock(
        &self,
        wholesaler_id: &str,
        product_id: &str,
        qty: i64,
    ) -> RepoResult<()> {
        self.base
            .db()
            .query(
                "UPDATE wholesaler_product \
                 SET stock_quantity += $qty, updated_at = $now \
                 WHERE wholesaler_id = $wholesaler_id AND product_id = $product_id",
            )
            .bind(("wholesaler_id", wholesaler_id.to_string()))
            .bind(("product_id", product_id.to_string()))
            .bind(("qty", qty))
            .bind(("now", now_millis()))
            .await?;
        Ok(())
    }

    // ========================================================================
    // Retailer stock
    // ========================================================================

    pub async fn get_retailer(
        &self,
        retailer_id: &str,
        product_id: &str,
    ) -> RepoResult<Option<RetailerProduct>> {
        let rows: Vec<RetailerProduct> = self
            .base
            .db()
            .query(
                "SELECT * FROM retailer_product \
                 WHERE retailer_id = $retailer_id AND product_id = $product_id LIMIT 1",
            )
            .bind(("retailer_id", retailer_id.to_string()))
            .bind(("product_id", product_id.to_string()))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Approval-time stock transfer target: create the retailer's row at the
    /// declared resale price, or increment the existing one. Either way the
    /// row ends up available.
    pub async fn add_retailer_stock(
        &self,
        retailer_id: &str,
        product_id: &str,
        product_name: &str,
        qty: i64,
        resale_price: f64,
    ) -> RepoResult<RetailerProduct> {
        if let Some(_existing) = self.get_retailer(retailer_id, product_id).await? {
            let updated: Vec<RetailerProduct> = self
                .base
                .db()
                .query(
                    "UPDATE retailer_product \
                     SET stock_quantity += $qty, is_available = true, updated_at = $now \
                     WHERE retailer_id = $retailer_id AND product_id = $product_id RETURN AFTER",
                )
                .bind(("retailer_id", retailer_id.to_string()))
                .bind(("product_id", product_id.to_string()))
                .bind(("qty", qty))
                .bind(("now", now_millis()))
                .await?
                .take(0)?;
            return updated
                .into_iter()
                .next()
                .ok_or_else(|| RepoError::Database("Failed to update retailer stock".into()));
        }

        let entry = RetailerProduct {
            retailer_id: retailer_id.to_string(),
            product_id: product_id.to_string(),
            product_name: product_name.to_string(),
            price: resale_price,
            stock_quantity: qty,
            is_available: true,
            updated_at: now_millis(),
        };
        let created: Option<RetailerProduct> =
            self.base.db().create(RETAILER_TABLE).content(entry).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create retailer stock".into()))
    }
}

//! Schema Definition
//!
//! 启动时幂等应用。业务不变量依赖的唯一索引都定义在这里：
//! - 订单号 / 交易号 / 运单号全局唯一
//! - 每单至多一条配送跟踪记录（并发 provisioning 的防线）
//! - (seller, product) 库存行唯一

use surrealdb::engine::local::Db;
use surrealdb::Surreal;

use crate::utils::AppError;

const SCHEMA: &str = r#"
    DEFINE TABLE IF NOT EXISTS order SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS order_item SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS payment_transaction SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS delivery_tracking SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS delivery_status_history SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS notification SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS wholesaler_product SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS retailer_product SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS cart_item SCHEMALESS;

    DEFINE INDEX IF NOT EXISTS order_number_unique ON order FIELDS order_number UNIQUE;
    DEFINE INDEX IF NOT EXISTS order_item_order_idx ON order_item FIELDS order_id;
    DEFINE INDEX IF NOT EXISTS txn_unique ON payment_transaction FIELDS transaction_id UNIQUE;
    DEFINE INDEX IF NOT EXISTS tracking_order_unique ON delivery_tracking FIELDS order_id UNIQUE;
    DEFINE INDEX IF NOT EXISTS tracking_number_unique ON delivery_tracking FIELDS tracking_number UNIQUE;
    DEFINE INDEX IF NOT EXISTS history_tracking_idx ON delivery_status_history FIELDS tracking_id;
    DEFINE INDEX IF NOT EXISTS notification_user_idx ON notification FIELDS user_id;
    DEFINE INDEX IF NOT EXISTS wholesaler_stock_unique ON wholesaler_product FIELDS wholesaler_id, product_id UNIQUE;
    DEFINE INDEX IF NOT EXISTS retailer_stock_unique ON retailer_product FIELDS retailer_id, product_id UNIQUE;
    DEFINE INDEX IF NOT EXISTS cart_buyer_idx ON cart_item FIELDS buyer_id;
"#;

/// Apply table and index definitions (idempotent)
pub async fn define(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(SCHEMA)
        .await
        .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;
    tracing::debug!("Schema definitions applied");
    Ok(())
}

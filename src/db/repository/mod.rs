//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.
//!
//! Conventions:
//! - 行自带字符串主键字段（同时作为 record key），查询不经手 `RecordId`
//! - 条件更新（`WHERE status = $from` / `WHERE stock_quantity >= $qty`）
//!   返回受影响行，空结果 = 前置条件已失效，由调用方决定语义

pub mod cart;
pub mod delivery;
pub mod notification;
pub mod order;
pub mod payment;
pub mod stock;

pub use cart::CartRepository;
pub use delivery::DeliveryRepository;
pub use notification::NotificationRepository;
pub use order::OrderRepository;
pub use payment::PaymentRepository;
pub use stock::StockRepository;

use surrealdb::engine::local::Db;
use surrealdb::Surreal;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl RepoError {
    /// 唯一索引冲突判定（嵌入式 SDK 没有结构化错误码，只能看消息）
    pub fn is_duplicate_message(msg: &str) -> bool {
        let msg = msg.to_lowercase();
        msg.contains("unique") || msg.contains("already exists") || msg.contains("duplicate")
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

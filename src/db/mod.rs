//! Database Module
//!
//! Embedded SurrealDB (RocksDB backend). 打开 `work_dir/database/` 下的库，
//! 启动时应用 schema（唯一索引），向外提供克隆的 `Surreal<Db>` 句柄。

pub mod models;
pub mod repository;
pub mod schema;

use std::path::Path;

use surrealdb::engine::local::{Db, RocksDb};
use surrealdb::Surreal;

use crate::utils::AppError;

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database at `db_path` and apply the schema
    pub async fn new(db_path: &Path) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns("mandi")
            .use_db("mandi")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        schema::define(&db).await?;

        tracing::info!("Database ready (SurrealDB embedded, RocksDB backend)");
        Ok(Self { db })
    }

    /// 获取数据库句柄（浅拷贝）
    pub fn handle(&self) -> Surreal<Db> {
        self.db.clone()
    }
}

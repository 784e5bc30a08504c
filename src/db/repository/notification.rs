//! Notification Repository

use surrealdb::engine::local::Db;
use surrealdb::Surreal;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Notification;

const TABLE: &str = "notification";

#[derive(Clone)]
pub struct NotificationRepository {
    base: BaseRepository,
}

impl NotificationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn insert(&self, notification: Notification) -> RepoResult<Notification> {
        let created: Option<Notification> = self
            .base
            .db()
            .create((TABLE, notification.notification_id.clone()))
            .content(notification)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create notification".into()))
    }

    /// 按接收者查询，最新在前
    pub async fn list_by_user(&self, user_id: &str) -> RepoResult<Vec<Notification>> {
        let rows: Vec<Notification> = self
            .base
            .db()
            .query("SELECT * FROM notification WHERE user_id = $user_id ORDER BY created_at DESC")
            .bind(("user_id", user_id.to_string()))
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// Mark a notification read. Returns `false` if it does not exist.
    pub async fn mark_read(&self, notification_id: &str) -> RepoResult<bool> {
        let updated: Vec<Notification> = self
            .base
            .db()
            .query(
                "UPDATE notification SET read = true \
                 WHERE notification_id = $notification_id RETURN AFTER",
            )
            .bind(("notification_id", notification_id.to_string()))
            .await?
            .take(0)?;
        Ok(!updated.is_empty())
    }
}

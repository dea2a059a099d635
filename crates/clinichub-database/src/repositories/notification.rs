//! Notification repository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use clinichub_core::result::AppResult;
use clinichub_entity::notification::{NewNotification, Notification};

use super::db_error;
use crate::store::NotificationStore;

/// PostgreSQL-backed [`NotificationStore`].
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn insert_many(&self, items: Vec<NewNotification>) -> AppResult<()> {
        if items.is_empty() {
            return Ok(());
        }
        let now = Utc::now();
        let mut qb = QueryBuilder::<Postgres>::new(
            "INSERT INTO notifications (id, user_id, title, message, kind, read, created_at) ",
        );
        qb.push_values(items, |mut row, item| {
            let n = item.into_notification(now);
            row.push_bind(n.id)
                .push_bind(n.user_id)
                .push_bind(n.title)
                .push_bind(n.message)
                .push_bind(n.kind)
                .push_bind(n.read)
                .push_bind(n.created_at);
        });
        qb.build()
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to create notifications"))?;
        Ok(())
    }

    async fn unread_for(&self, user_id: Uuid, limit: u64) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE user_id = $1 AND NOT read \
             ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list notifications"))
    }

    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(db_error("Failed to update notification"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notifications")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count notifications"))?;
        Ok(total as u64)
    }
}

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use clinichub_core::result::AppResult;
use clinichub_entity::notification::{NewNotification, Notification};

use crate::store::NotificationStore;

/// In-memory [`NotificationStore`].
#[derive(Debug, Default)]
pub struct MemoryNotificationStore {
    rows: RwLock<Vec<Notification>>,
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn insert_many(&self, items: Vec<NewNotification>) -> AppResult<()> {
        let now = Utc::now();
        self.rows
            .write()
            .await
            .extend(items.into_iter().map(|n| n.into_notification(now)));
        Ok(())
    }

    async fn unread_for(&self, user_id: Uuid, limit: u64) -> AppResult<Vec<Notification>> {
        let mut unread: Vec<_> = self
            .rows
            .read()
            .await
            .iter()
            .filter(|n| n.user_id == user_id && !n.read)
            .cloned()
            .collect();
        unread.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        unread.truncate(limit as usize);
        Ok(unread)
    }

    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|n| n.id == id && n.user_id == user_id) {
            Some(n) => {
                n.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.rows.read().await.len() as u64)
    }
}

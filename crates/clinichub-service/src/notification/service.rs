//! Reading and acknowledging notifications.

use std::sync::Arc;

use uuid::Uuid;

use clinichub_core::{AppError, AppResult};
use clinichub_database::NotificationStore;
use clinichub_entity::notification::{Notification, UNREAD_LIMIT};

use crate::context::RequestContext;

/// Serves the caller's own notifications.
#[derive(Clone)]
pub struct NotificationService {
    notifications: Arc<dyn NotificationStore>,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService").finish_non_exhaustive()
    }
}

impl NotificationService {
    pub fn new(notifications: Arc<dyn NotificationStore>) -> Self {
        Self { notifications }
    }

    /// Unread notifications of the caller, newest first.
    pub async fn unread(&self, ctx: &RequestContext) -> AppResult<Vec<Notification>> {
        self.notifications.unread_for(ctx.user_id, UNREAD_LIMIT).await
    }

    /// Someone else's notification is reported as absent.
    pub async fn mark_read(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        if self.notifications.mark_read(id, ctx.user_id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("Notification not found"))
        }
    }
}

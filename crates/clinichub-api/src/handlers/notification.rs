//! Notification handlers.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use clinichub_core::error::AppError;

use crate::dto::response::message;
use crate::extractors::{AuthUser, PathId};
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_unread(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, AppError> {
    let notifications = state.notification_service.unread(&auth).await?;
    Ok(Json(json!({ "notifications": notifications })))
}

/// PUT /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
) -> Result<Json<Value>, AppError> {
    state.notification_service.mark_read(&auth, id).await?;
    Ok(Json(message("Notification marked as read")))
}

//! Admin handlers. Every route here requires the admin role.

use axum::Json;
use axum::extract::{Query, State};
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use clinichub_core::error::AppError;
use clinichub_service::admin::{BackupReceipt, MaintenanceReport};
use clinichub_service::auth::UserSummary;

use crate::dto::request::{AuditLogQuery, SetUserStatusRequest, StaffQuery};
use crate::dto::response::paged;
use crate::extractors::{AdminOnly, Authorized, PathId};
use crate::state::AppState;

type Admin = Authorized<AdminOnly>;

/// GET /api/admin/users
pub async fn list_users(State(state): State<AppState>, _auth: Admin) -> Result<Json<Value>, AppError> {
    let users = state.admin_service.users().await?;
    Ok(Json(json!({ "users": users })))
}

/// GET /api/admin/staff
pub async fn list_staff(
    State(state): State<AppState>,
    _auth: Admin,
    WithRejection(Query(query), _): WithRejection<Query<StaffQuery>, AppError>,
) -> Result<Json<Value>, AppError> {
    let page = state
        .admin_service
        .staff(&query.filter()?, &query.page_request())
        .await?;
    Ok(Json(paged("staff", page)?))
}

/// GET /api/admin/audit-logs
pub async fn list_audit_logs(
    State(state): State<AppState>,
    _auth: Admin,
    WithRejection(Query(query), _): WithRejection<Query<AuditLogQuery>, AppError>,
) -> Result<Json<Value>, AppError> {
    let page = state
        .admin_service
        .audit_logs(&query.filter(), &query.page_request())
        .await?;
    Ok(Json(paged("logs", page)?))
}

/// GET /api/admin/system-stats
pub async fn system_stats(
    State(state): State<AppState>,
    _auth: Admin,
) -> Result<Json<Value>, AppError> {
    let system_stats = state.admin_service.system_stats().await?;
    Ok(Json(json!({ "system_stats": system_stats })))
}

/// POST /api/admin/backup
pub async fn create_backup(
    State(state): State<AppState>,
    auth: Admin,
) -> Result<Json<BackupReceipt>, AppError> {
    Ok(Json(state.admin_service.backup(&auth).await?))
}

/// POST /api/admin/maintenance
pub async fn run_maintenance(
    State(state): State<AppState>,
    auth: Admin,
) -> Result<Json<MaintenanceReport>, AppError> {
    Ok(Json(state.admin_service.maintenance(&auth).await?))
}

/// PUT /api/admin/users/{id}/status
pub async fn set_user_status(
    State(state): State<AppState>,
    auth: Admin,
    PathId(id): PathId,
    WithRejection(Json(req), _): WithRejection<Json<SetUserStatusRequest>, AppError>,
) -> Result<Json<Value>, AppError> {
    let is_active = req.is_active()?;
    let user = state.admin_service.set_user_status(&auth, id, is_active).await?;
    let verb = if user.is_active { "activated" } else { "deactivated" };
    Ok(Json(json!({
        "message": format!("User {verb} successfully"),
        "user": UserSummary::from(&user),
    })))
}

//! Analytics and dashboard handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use clinichub_core::error::AppError;
use clinichub_service::analytics::DashboardStats;

use crate::extractors::{AdminOnly, AuthUser, Authorized};
use crate::state::AppState;

/// GET /api/analytics/revenue
pub async fn revenue(
    State(state): State<AppState>,
    _auth: Authorized<AdminOnly>,
) -> Result<Json<Value>, AppError> {
    let revenue_data = state.analytics_service.revenue().await?;
    Ok(Json(json!({ "revenue_data": revenue_data })))
}

/// GET /api/analytics/doctor-performance
pub async fn doctor_performance(
    State(state): State<AppState>,
    _auth: Authorized<AdminOnly>,
) -> Result<Json<Value>, AppError> {
    let doctor_performance = state.analytics_service.doctor_performance().await?;
    Ok(Json(json!({ "doctor_performance": doctor_performance })))
}

/// GET /api/analytics/patient-satisfaction
pub async fn patient_satisfaction(State(state): State<AppState>, _auth: AuthUser) -> Json<Value> {
    Json(json!({ "satisfaction_data": state.analytics_service.satisfaction() }))
}

/// GET /api/staff/analytics/dashboard/{role}
pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(Path(role), _): WithRejection<Path<String>, AppError>,
) -> Result<Json<DashboardStats>, AppError> {
    Ok(Json(state.analytics_service.dashboard(&auth, &role).await?))
}

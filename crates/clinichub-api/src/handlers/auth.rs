//! Registration, login and profile handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use clinichub_core::error::AppError;
use clinichub_service::auth::{AuthResponse, LoginPortal, LoginRequest, RegisterRequest};

use crate::extractors::{AuthUser, ClientOrigin};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ClientOrigin(origin): ClientOrigin,
    WithRejection(Json(req), _): WithRejection<Json<RegisterRequest>, AppError>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let response = state.auth_service.register(&origin, req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ClientOrigin(origin): ClientOrigin,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = state
        .auth_service
        .login(&origin, LoginPortal::Clinic, req)
        .await?;
    Ok(Json(response))
}

/// POST /api/staff/auth/login
pub async fn staff_login(
    State(state): State<AppState>,
    ClientOrigin(origin): ClientOrigin,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = state
        .auth_service
        .login(&origin, LoginPortal::Staff, req)
        .await?;
    Ok(Json(response))
}

/// GET /api/auth/me
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> Json<Value> {
    Json(json!({ "user": state.auth_service.me(&auth) }))
}

//! Appointment booking and management handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum_extra::extract::WithRejection;
use serde_json::Value;

use clinichub_core::error::AppError;
use clinichub_service::appointment::{BookingReceipt, BookingRequest, UpdateAppointmentRequest};

use crate::dto::request::AppointmentQuery;
use crate::dto::response::{message, paged};
use crate::extractors::{AuthUser, ClientOrigin, PathId};
use crate::state::AppState;

/// POST /api/appointments (public)
pub async fn book_appointment(
    State(state): State<AppState>,
    ClientOrigin(origin): ClientOrigin,
    WithRejection(Json(req), _): WithRejection<Json<BookingRequest>, AppError>,
) -> Result<(StatusCode, Json<BookingReceipt>), AppError> {
    let receipt = state.appointment_service.book(&origin, req).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// GET /api/appointments, GET /api/staff/appointments
pub async fn list_appointments(
    State(state): State<AppState>,
    _auth: AuthUser,
    WithRejection(Query(query), _): WithRejection<Query<AppointmentQuery>, AppError>,
) -> Result<Json<Value>, AppError> {
    let filter = query.filter()?;
    let page = state
        .appointment_service
        .list(&filter, &query.page_request())
        .await?;
    Ok(Json(paged("appointments", page)?))
}

/// PUT /api/appointments/{id}
pub async fn update_appointment(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
    WithRejection(Json(req), _): WithRejection<Json<UpdateAppointmentRequest>, AppError>,
) -> Result<Json<Value>, AppError> {
    state.appointment_service.update(&auth, id, req).await?;
    Ok(Json(message("Appointment updated successfully")))
}

/// DELETE /api/appointments/{id}
pub async fn delete_appointment(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
) -> Result<Json<Value>, AppError> {
    state.appointment_service.delete(&auth, id).await?;
    Ok(Json(message("Appointment deleted successfully")))
}

//! Patient record handlers, shared by the clinic and staff portals.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use clinichub_core::error::AppError;
use clinichub_entity::patient::Patient;

use crate::dto::response::{message, paged};
use crate::extractors::{AdminOrDoctor, AuthUser, Authorized, ListParams, PathId};
use crate::state::AppState;

/// GET /api/patients, GET /api/staff/patients
pub async fn list_patients(
    State(state): State<AppState>,
    _auth: AuthUser,
    WithRejection(Query(params), _): WithRejection<Query<ListParams>, AppError>,
) -> Result<Json<Value>, AppError> {
    let page = state
        .patient_service
        .list(params.search(), &params.sort(), &params.page_request())
        .await?;
    Ok(Json(paged("patients", page)?))
}

/// GET /api/patients/{id}, GET /api/staff/patients/{id}
pub async fn get_patient(
    State(state): State<AppState>,
    _auth: AuthUser,
    PathId(id): PathId,
) -> Result<Json<Patient>, AppError> {
    Ok(Json(state.patient_service.get(id).await?))
}

/// POST /api/patients
pub async fn create_patient(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(Json(body), _): WithRejection<Json<Value>, AppError>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let patient = state.patient_service.create(&auth, body).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Patient created successfully",
            "patient_id": patient.id,
        })),
    ))
}

/// PUT /api/patients/{id}
pub async fn update_patient(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
    WithRejection(Json(body), _): WithRejection<Json<Value>, AppError>,
) -> Result<Json<Value>, AppError> {
    state.patient_service.update(&auth, id, body).await?;
    Ok(Json(message("Patient updated successfully")))
}

/// DELETE /api/patients/{id}
pub async fn delete_patient(
    State(state): State<AppState>,
    auth: Authorized<AdminOrDoctor>,
    PathId(id): PathId,
) -> Result<Json<Value>, AppError> {
    state.patient_service.delete(&auth, id).await?;
    Ok(Json(message("Patient deleted successfully")))
}

/// GET /api/patients/{id}/documents
pub async fn list_documents(
    State(state): State<AppState>,
    _auth: AuthUser,
    PathId(id): PathId,
) -> Result<Json<Value>, AppError> {
    let documents = state.patient_service.documents(id).await?;
    Ok(Json(json!({ "documents": documents })))
}

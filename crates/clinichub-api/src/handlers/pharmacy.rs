//! Pharmacy handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum_extra::extract::WithRejection;
use serde_json::Value;

use clinichub_core::error::AppError;

use crate::dto::request::PrescriptionParams;
use crate::dto::response::paged;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/pharmacy/prescriptions
pub async fn list_prescriptions(
    State(state): State<AppState>,
    _auth: AuthUser,
    WithRejection(Query(params), _): WithRejection<Query<PrescriptionParams>, AppError>,
) -> Result<Json<Value>, AppError> {
    let page = state
        .pharmacy_service
        .prescriptions(&params.query(), &params.page_request());
    Ok(Json(paged("prescriptions", page)?))
}

//! Patient document upload handler.

use axum::Json;
use axum::extract::{Multipart, State};
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};
use tracing::debug;

use clinichub_core::error::AppError;
use clinichub_service::document::{DocumentUpload, UploadedFile};

use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/upload/patient-document (multipart: `file`, `patient_id`)
pub async fn upload_patient_document(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(mut multipart, _): WithRejection<Multipart, AppError>,
) -> Result<Json<Value>, AppError> {
    let mut upload = DocumentUpload::default();

    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or_default() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                upload.file = Some(UploadedFile { filename, data });
            }
            "patient_id" => {
                upload.patient_id = Some(field.text().await?);
            }
            other => {
                debug!(field = other, "Ignoring unknown multipart field");
            }
        }
    }

    let document = state.document_service.upload(&auth, upload).await?;
    Ok(Json(json!({
        "message": "File uploaded successfully",
        "filename": document.filename,
    })))
}

//! Patient document metadata model. The binary lives in storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Metadata for one uploaded patient document.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PatientDocument {
    pub id: Uuid,
    pub patient_id: Uuid,
    /// Stored name, `{patient}_{timestamp}_{sanitized}`.
    pub filename: String,
    /// Name as sent by the client.
    pub original_filename: String,
    pub file_size: i64,
    pub uploaded_by: Uuid,
    /// Lowercase extension.
    pub file_type: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Data for recording a new document.
#[derive(Debug, Clone)]
pub struct NewPatientDocument {
    pub patient_id: Uuid,
    pub filename: String,
    pub original_filename: String,
    pub file_size: i64,
    pub uploaded_by: Uuid,
    pub file_type: String,
}

impl NewPatientDocument {
    pub fn into_document(self, now: DateTime<Utc>) -> PatientDocument {
        PatientDocument {
            id: Uuid::new_v4(),
            patient_id: self.patient_id,
            filename: self.filename,
            original_filename: self.original_filename,
            file_size: self.file_size,
            uploaded_by: self.uploaded_by,
            file_type: self.file_type,
            uploaded_at: now,
        }
    }
}

//! Patient document metadata repository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use clinichub_core::result::AppResult;
use clinichub_entity::document::{NewPatientDocument, PatientDocument};

use super::db_error;
use crate::store::DocumentStore;

/// PostgreSQL-backed [`DocumentStore`].
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for DocumentRepository {
    async fn insert(&self, data: NewPatientDocument) -> AppResult<PatientDocument> {
        let doc = data.into_document(Utc::now());
        sqlx::query_as::<_, PatientDocument>(
            "INSERT INTO patient_documents \
             (id, patient_id, filename, original_filename, file_size, uploaded_by, file_type, uploaded_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(doc.id)
        .bind(doc.patient_id)
        .bind(&doc.filename)
        .bind(&doc.original_filename)
        .bind(doc.file_size)
        .bind(doc.uploaded_by)
        .bind(&doc.file_type)
        .bind(doc.uploaded_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to record document"))
    }

    async fn list_for_patient(&self, patient_id: Uuid) -> AppResult<Vec<PatientDocument>> {
        sqlx::query_as::<_, PatientDocument>(
            "SELECT * FROM patient_documents WHERE patient_id = $1 ORDER BY uploaded_at DESC",
        )
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list documents"))
    }

    async fn delete_for_patient(&self, patient_id: Uuid) -> AppResult<u64> {
        // Normally already gone through ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM patient_documents WHERE patient_id = $1")
            .bind(patient_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete documents"))?;
        Ok(result.rows_affected())
    }

    async fn count(&self) -> AppResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM patient_documents")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count documents"))?;
        Ok(total as u64)
    }
}

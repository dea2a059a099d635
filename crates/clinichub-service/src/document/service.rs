//! Stores uploaded patient documents and records their metadata.

use std::sync::Arc;

use bytes::Bytes;
use serde_json::json;
use tracing::{info, warn};

use clinichub_core::{AppError, AppResult};
use clinichub_database::{DocumentStore, PatientStore};
use clinichub_entity::audit::AuditAction;
use clinichub_entity::document::{NewPatientDocument, PatientDocument};
use clinichub_storage::FileStore;
use clinichub_storage::naming::{extension_of, is_allowed, sanitize_filename, stored_document_name};

use crate::audit::AuditRecorder;
use crate::context::RequestContext;
use crate::validation;

/// One file part of a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Name as sent by the client; may be empty.
    pub filename: String,
    pub data: Bytes,
}

/// The parts of `POST /api/upload/patient-document`.
#[derive(Debug, Clone, Default)]
pub struct DocumentUpload {
    pub file: Option<UploadedFile>,
    pub patient_id: Option<String>,
}

/// Handles patient document uploads.
#[derive(Clone)]
pub struct DocumentService {
    patients: Arc<dyn PatientStore>,
    documents: Arc<dyn DocumentStore>,
    files: Arc<dyn FileStore>,
    allowed_extensions: Arc<[String]>,
    recorder: AuditRecorder,
}

impl std::fmt::Debug for DocumentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentService")
            .field("files", &self.files)
            .field("allowed_extensions", &self.allowed_extensions)
            .finish_non_exhaustive()
    }
}

impl DocumentService {
    /// Creates a new document service.
    pub fn new(
        patients: Arc<dyn PatientStore>,
        documents: Arc<dyn DocumentStore>,
        files: Arc<dyn FileStore>,
        allowed_extensions: Vec<String>,
        recorder: AuditRecorder,
    ) -> Self {
        Self {
            patients,
            documents,
            files,
            allowed_extensions: allowed_extensions.into(),
            recorder,
        }
    }

    /// Validates, stores and records one document.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        upload: DocumentUpload,
    ) -> AppResult<PatientDocument> {
        let file = upload
            .file
            .ok_or_else(|| AppError::invalid_input("No file provided"))?;
        let raw_patient_id = validation::non_blank(upload.patient_id)
            .ok_or_else(|| AppError::invalid_input("Patient ID required"))?;
        let patient_id = validation::parse_id(&raw_patient_id)?;

        if self.patients.find(patient_id).await?.is_none() {
            return Err(AppError::not_found("Patient not found"));
        }
        if file.filename.trim().is_empty() {
            return Err(AppError::invalid_input("No file selected"));
        }

        let original = sanitize_filename(&file.filename);
        if !is_allowed(&original, &self.allowed_extensions) {
            return Err(AppError::invalid_input("File type not allowed"));
        }
        let file_type = extension_of(&original).unwrap_or_default();

        let stored_name = stored_document_name(patient_id, ctx.request_time, &original);
        let file_size = self.files.write(&stored_name, file.data).await?;

        let inserted = self
            .documents
            .insert(NewPatientDocument {
                patient_id,
                filename: stored_name.clone(),
                original_filename: original,
                file_size: i64::try_from(file_size).unwrap_or(i64::MAX),
                uploaded_by: ctx.user_id,
                file_type,
            })
            .await;
        let document = match inserted {
            Ok(document) => document,
            Err(e) => {
                if let Err(cleanup) = self.files.delete(&stored_name).await {
                    warn!(
                        filename = %stored_name,
                        error = %cleanup,
                        "Failed to remove document after metadata insert failed"
                    );
                }
                return Err(e);
            }
        };

        info!(
            patient_id = %patient_id,
            filename = %document.filename,
            size = document.file_size,
            "Patient document uploaded"
        );
        self.recorder
            .record(
                &ctx.origin,
                AuditAction::DocumentUpload,
                ctx.actor(),
                json!({
                    "patient_id": patient_id,
                    "filename": document.original_filename,
                }),
            )
            .await;

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;
    use clinichub_core::error::ErrorKind;
    use clinichub_database::Stores;
    use clinichub_entity::patient::Patient;
    use clinichub_entity::user::UserRole;
    use clinichub_storage::LocalFileStore;
    use uuid::Uuid;

    use super::*;
    use crate::context::RequestOrigin;

    async fn fixture(dir: &std::path::Path) -> (Stores, DocumentService, Arc<LocalFileStore>) {
        let stores = Stores::in_memory();
        let files = Arc::new(LocalFileStore::new(dir).await.unwrap());
        let service = DocumentService::new(
            stores.patients.clone(),
            stores.documents.clone(),
            files.clone(),
            vec!["pdf".into(), "png".into()],
            AuditRecorder::new(stores.audit.clone(), Duration::from_secs(1)),
        );
        (stores, service, files)
    }

    fn ctx() -> RequestContext {
        RequestContext {
            user_id: Uuid::new_v4(),
            email: "doc@clinic.test".into(),
            name: "Doc".into(),
            role: UserRole::Doctor,
            origin: RequestOrigin::default(),
            request_time: Utc::now(),
        }
    }

    fn file(name: &str) -> Option<UploadedFile> {
        Some(UploadedFile {
            filename: name.into(),
            data: Bytes::from_static(b"%PDF-1.7"),
        })
    }

    #[tokio::test]
    async fn test_upload_stores_bytes_and_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let (stores, service, files) = fixture(dir.path()).await;
        let patient = Patient::new(Default::default(), Utc::now());
        stores.patients.insert(&patient).await.unwrap();

        let document = service
            .upload(
                &ctx(),
                DocumentUpload {
                    file: file("lab results.PDF"),
                    patient_id: Some(patient.id.to_string()),
                },
            )
            .await
            .unwrap();

        assert!(document.filename.starts_with(&patient.id.to_string()));
        assert!(document.filename.ends_with("_labresults.PDF"));
        assert_eq!(document.file_type, "pdf");
        assert_eq!(document.file_size, 8);
        assert!(files.exists(&document.filename).await.unwrap());
        assert_eq!(stores.documents.list_for_patient(patient.id).await.unwrap().len(), 1);
    }

    /// Accepts nothing, as if the metadata table were unreachable.
    struct BrokenDocuments;

    #[async_trait::async_trait]
    impl DocumentStore for BrokenDocuments {
        async fn insert(&self, _data: NewPatientDocument) -> AppResult<PatientDocument> {
            Err(AppError::database("metadata insert failed"))
        }

        async fn list_for_patient(&self, _patient_id: Uuid) -> AppResult<Vec<PatientDocument>> {
            Ok(Vec::new())
        }

        async fn delete_for_patient(&self, _patient_id: Uuid) -> AppResult<u64> {
            Ok(0)
        }

        async fn count(&self) -> AppResult<u64> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_failed_metadata_insert_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let stores = Stores::in_memory();
        let files = Arc::new(LocalFileStore::new(dir.path()).await.unwrap());
        let service = DocumentService::new(
            stores.patients.clone(),
            Arc::new(BrokenDocuments),
            files,
            vec!["pdf".into()],
            AuditRecorder::new(stores.audit.clone(), Duration::from_secs(1)),
        );
        let patient = Patient::new(Default::default(), Utc::now());
        stores.patients.insert(&patient).await.unwrap();

        let err = service
            .upload(
                &ctx(),
                DocumentUpload {
                    file: file("scan.pdf"),
                    patient_id: Some(patient.id.to_string()),
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Database);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_checks_run_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let (stores, service, _) = fixture(dir.path()).await;
        let patient = Patient::new(Default::default(), Utc::now());
        stores.patients.insert(&patient).await.unwrap();
        let known = Some(patient.id.to_string());

        let cases = [
            (None, known.clone(), "No file provided"),
            (file("a.pdf"), None, "Patient ID required"),
            (file("a.pdf"), Some("nope".to_string()), "Invalid ID"),
            (file(""), known.clone(), "No file selected"),
            (file("run.exe"), known.clone(), "File type not allowed"),
        ];
        for (file, patient_id, expected) in cases {
            let err = service
                .upload(&ctx(), DocumentUpload { file, patient_id })
                .await
                .unwrap_err();
            assert_eq!(err.message, expected);
        }

        let err = service
            .upload(
                &ctx(),
                DocumentUpload {
                    file: file(""),
                    patient_id: Some(Uuid::new_v4().to_string()),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}

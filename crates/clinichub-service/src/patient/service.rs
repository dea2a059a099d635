//! Patient CRUD.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use clinichub_core::types::{Page, PageRequest, SortField};
use clinichub_core::{AppError, AppResult};
use clinichub_database::{DocumentStore, PatientStore};
use clinichub_entity::audit::AuditAction;
use clinichub_entity::document::PatientDocument;
use clinichub_entity::patient::{Attributes, Patient, sanitize_attributes};

use crate::audit::AuditRecorder;
use crate::context::RequestContext;

/// Manages patient records.
#[derive(Clone)]
pub struct PatientService {
    patients: Arc<dyn PatientStore>,
    documents: Arc<dyn DocumentStore>,
    recorder: AuditRecorder,
}

impl std::fmt::Debug for PatientService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatientService").finish_non_exhaustive()
    }
}

impl PatientService {
    /// Creates a new patient service.
    pub fn new(
        patients: Arc<dyn PatientStore>,
        documents: Arc<dyn DocumentStore>,
        recorder: AuditRecorder,
    ) -> Self {
        Self {
            patients,
            documents,
            recorder,
        }
    }

    /// Lists patients matching `search`, sorted and paginated.
    pub async fn list(
        &self,
        search: &str,
        sort: &SortField,
        page: &PageRequest,
    ) -> AppResult<Page<Patient>> {
        self.patients.list(search.trim(), sort, page).await
    }

    /// Gets a single patient by ID.
    pub async fn get(&self, id: Uuid) -> AppResult<Patient> {
        self.patients
            .find(id)
            .await?
            .ok_or_else(|| AppError::not_found("Patient not found"))
    }

    /// Creates a patient from a JSON object of attributes.
    pub async fn create(&self, ctx: &RequestContext, body: Value) -> AppResult<Patient> {
        let patient = Patient::new(into_attributes(body)?, ctx.request_time);
        self.patients.insert(&patient).await?;

        info!(patient_id = %patient.id, created_by = %ctx.user_id, "Patient created");
        self.recorder
            .record(
                &ctx.origin,
                AuditAction::PatientCreated,
                ctx.actor(),
                json!({ "patient_id": patient.id }),
            )
            .await;

        Ok(patient)
    }

    /// Merges the supplied attributes into an existing patient.
    pub async fn update(&self, ctx: &RequestContext, id: Uuid, body: Value) -> AppResult<Patient> {
        let changes = into_attributes(body)?;
        let fields: Vec<String> = changes.keys().cloned().collect();

        let patient = self
            .patients
            .merge(id, &changes, ctx.request_time)
            .await?
            .ok_or_else(|| AppError::not_found("Patient not found"))?;

        self.recorder
            .record(
                &ctx.origin,
                AuditAction::PatientUpdated,
                ctx.actor(),
                json!({ "patient_id": id, "updated_fields": fields }),
            )
            .await;

        Ok(patient)
    }

    /// Hard-deletes a patient and its document metadata.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        if !self.patients.delete(id).await? {
            return Err(AppError::not_found("Patient not found"));
        }
        let documents = self.documents.delete_for_patient(id).await?;

        info!(patient_id = %id, documents, deleted_by = %ctx.user_id, "Patient deleted");
        self.recorder
            .record(
                &ctx.origin,
                AuditAction::PatientDeleted,
                ctx.actor(),
                json!({ "patient_id": id }),
            )
            .await;

        Ok(())
    }

    /// Document metadata of one patient, newest first.
    pub async fn documents(&self, id: Uuid) -> AppResult<Vec<PatientDocument>> {
        self.get(id).await?;
        self.documents.list_for_patient(id).await
    }
}

/// Client attributes with server-owned keys removed, for every backend.
fn into_attributes(body: Value) -> AppResult<Attributes> {
    match body {
        Value::Object(map) => Ok(sanitize_attributes(map)),
        _ => Err(AppError::invalid_input("Patient data must be a JSON object")),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use clinichub_core::error::ErrorKind;
    use clinichub_database::Stores;
    use clinichub_entity::audit::AuditFilter;
    use clinichub_entity::document::NewPatientDocument;
    use clinichub_entity::user::UserRole;

    use super::*;
    use crate::context::RequestOrigin;

    fn service(stores: &Stores) -> PatientService {
        PatientService::new(
            stores.patients.clone(),
            stores.documents.clone(),
            AuditRecorder::new(stores.audit.clone(), Duration::from_secs(1)),
        )
    }

    fn ctx() -> RequestContext {
        RequestContext {
            user_id: Uuid::new_v4(),
            email: "nurse@clinic.test".into(),
            name: "Nurse".into(),
            role: UserRole::Nurse,
            origin: RequestOrigin::default(),
            request_time: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_non_objects() {
        let stores = Stores::in_memory();
        let err = service(&stores)
            .create(&ctx(), json!(["not", "an", "object"]))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let stores = Stores::in_memory();
        let patients = service(&stores);
        let ctx = ctx();

        let created = patients
            .create(
                &ctx,
                json!({"firstName": "Ada", "lastName": "Lovelace", "phone": "5550001111"}),
            )
            .await
            .unwrap();
        let updated = patients
            .update(&ctx, created.id, json!({"phone": "5552223333"}))
            .await
            .unwrap();

        assert_eq!(updated.text("phone"), Some("5552223333"));
        assert_eq!(updated.text("firstName"), Some("Ada"));
        assert_eq!(updated.text("lastName"), Some("Lovelace"));
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
        assert_eq!(stores.audit.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update_ignores_server_owned_keys() {
        let stores = Stores::in_memory();
        let patients = service(&stores);
        let ctx = ctx();

        let created = patients
            .create(&ctx, json!({"firstName": "Ada"}))
            .await
            .unwrap();
        let updated = patients
            .update(
                &ctx,
                created.id,
                json!({
                    "id": "x",
                    "_id": "y",
                    "createdAt": "1999-01-01T00:00:00Z",
                    "updatedAt": "1999-01-01T00:00:00Z",
                    "bloodType": "B+"
                }),
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);

        let raw = serde_json::to_string(&updated).unwrap();
        for key in ["\"id\"", "\"createdAt\"", "\"updatedAt\""] {
            assert_eq!(raw.matches(key).count(), 1, "{key} in {raw}");
        }
        assert!(!raw.contains("\"_id\""));

        let log = stores
            .audit
            .list(
                &AuditFilter {
                    action: Some("patient_updated".into()),
                    ..Default::default()
                },
                &PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(log.items[0].details["updated_fields"], json!(["bloodType"]));
    }

    #[tokio::test]
    async fn test_delete_removes_document_metadata() {
        let stores = Stores::in_memory();
        let patients = service(&stores);
        let ctx = ctx();
        let kept = patients.create(&ctx, json!({"firstName": "Kept"})).await.unwrap();
        let gone = patients.create(&ctx, json!({"firstName": "Gone"})).await.unwrap();

        for patient_id in [kept.id, gone.id] {
            stores
                .documents
                .insert(NewPatientDocument {
                    patient_id,
                    filename: format!("{patient_id}_scan.pdf"),
                    original_filename: "scan.pdf".into(),
                    file_size: 4,
                    uploaded_by: ctx.user_id,
                    file_type: "pdf".into(),
                })
                .await
                .unwrap();
        }

        patients.delete(&ctx, gone.id).await.unwrap();

        assert!(stores.documents.list_for_patient(gone.id).await.unwrap().is_empty());
        assert_eq!(stores.documents.list_for_patient(kept.id).await.unwrap().len(), 1);
        assert_eq!(stores.documents.count().await.unwrap(), 1);
    }

    #[test]
    fn test_into_attributes_strips_reserved_keys() {
        let attributes =
            into_attributes(json!({"id": 1, "_id": 2, "updatedAt": 3, "name": "kept"})).unwrap();
        assert_eq!(attributes.len(), 1);
        assert_eq!(attributes["name"], "kept");
    }

    #[tokio::test]
    async fn test_missing_patient() {
        let stores = Stores::in_memory();
        let patients = service(&stores);
        let id = Uuid::new_v4();

        assert_eq!(patients.get(id).await.unwrap_err().message, "Patient not found");
        assert_eq!(
            patients.delete(&ctx(), id).await.unwrap_err().kind,
            ErrorKind::NotFound
        );
        assert_eq!(
            patients
                .update(&ctx(), id, json!({"a": 1}))
                .await
                .unwrap_err()
                .kind,
            ErrorKind::NotFound
        );
    }
}

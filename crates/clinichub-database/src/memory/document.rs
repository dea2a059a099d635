use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use clinichub_core::result::AppResult;
use clinichub_entity::document::{NewPatientDocument, PatientDocument};

use crate::store::DocumentStore;

/// In-memory [`DocumentStore`].
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    rows: RwLock<Vec<PatientDocument>>,
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, data: NewPatientDocument) -> AppResult<PatientDocument> {
        let doc = data.into_document(Utc::now());
        self.rows.write().await.push(doc.clone());
        Ok(doc)
    }

    async fn list_for_patient(&self, patient_id: Uuid) -> AppResult<Vec<PatientDocument>> {
        let mut docs: Vec<_> = self
            .rows
            .read()
            .await
            .iter()
            .filter(|d| d.patient_id == patient_id)
            .cloned()
            .collect();
        docs.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(docs)
    }

    async fn delete_for_patient(&self, patient_id: Uuid) -> AppResult<u64> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|d| d.patient_id != patient_id);
        Ok((before - rows.len()) as u64)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.rows.read().await.len() as u64)
    }
}

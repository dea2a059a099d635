use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use clinichub_core::result::AppResult;
use clinichub_core::types::{Page, PageRequest, SortField};
use clinichub_entity::patient::{Attributes, Patient, PatientCriteria};

use crate::store::PatientStore;

/// In-memory [`PatientStore`].
#[derive(Debug, Default)]
pub struct MemoryPatientStore {
    rows: RwLock<HashMap<Uuid, Patient>>,
}

impl MemoryPatientStore {
    async fn newest_first(&self, keep: impl Fn(&Patient) -> bool) -> Vec<Patient> {
        let mut patients: Vec<Patient> = self
            .rows
            .read()
            .await
            .values()
            .filter(|p| keep(p))
            .cloned()
            .collect();
        patients.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        patients
    }
}

#[async_trait]
impl PatientStore for MemoryPatientStore {
    async fn insert(&self, patient: &Patient) -> AppResult<()> {
        self.rows.write().await.insert(patient.id, patient.clone());
        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Patient>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn list(
        &self,
        search: &str,
        sort: &SortField,
        page: &PageRequest,
    ) -> AppResult<Page<Patient>> {
        let mut matching = self.newest_first(|p| p.matches_search(search)).await;
        matching.sort_by(|a, b| {
            sort.direction
                .apply(a.compare_by(b, &sort.field))
                .then(a.id.cmp(&b.id))
        });
        let total = matching.len() as u64;
        Ok(Page::new(page.slice(matching), page, total))
    }

    async fn merge(
        &self,
        id: Uuid,
        changes: &Attributes,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Patient>> {
        Ok(self.rows.write().await.get_mut(&id).map(|patient| {
            patient.merge(changes.clone(), now);
            patient.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.rows.write().await.remove(&id).is_some())
    }

    async fn search(&self, criteria: &PatientCriteria, limit: u64) -> AppResult<Vec<Patient>> {
        let mut found = self.newest_first(|p| criteria.matches(p)).await;
        found.truncate(limit as usize);
        Ok(found)
    }

    async fn all(&self) -> AppResult<Vec<Patient>> {
        Ok(self.newest_first(|_| true).await)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.rows.read().await.len() as u64)
    }

    async fn count_assigned_to(&self, doctor_id: &str) -> AppResult<u64> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .filter(|p| p.text("assigned_doctor") == Some(doctor_id))
            .count() as u64)
    }

    async fn count_by_month(&self) -> AppResult<Vec<(String, u64)>> {
        let mut months: BTreeMap<String, u64> = BTreeMap::new();
        for patient in self.rows.read().await.values() {
            *months
                .entry(patient.created_at.format("%Y-%m").to_string())
                .or_default() += 1;
        }
        Ok(months.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: serde_json::Value) -> Attributes {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_pagination_over_25() {
        let store = MemoryPatientStore::default();
        for i in 0..25 {
            let patient = Patient::new(attrs(json!({"firstName": format!("P{i:02}")})), Utc::now());
            store.insert(&patient).await.unwrap();
        }

        let page = store
            .list("", &SortField::default(), &PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages, 3);

        let last = store
            .list("", &SortField::default(), &PageRequest::new(3, 10))
            .await
            .unwrap();
        assert_eq!(last.items.len(), 5);
    }

    #[tokio::test]
    async fn test_sort_by_attribute() {
        let store = MemoryPatientStore::default();
        for name in ["Carol", "Alice", "Bob"] {
            store
                .insert(&Patient::new(attrs(json!({"firstName": name})), Utc::now()))
                .await
                .unwrap();
        }
        let page = store
            .list("", &SortField::asc("firstName"), &PageRequest::default())
            .await
            .unwrap();
        let names: Vec<_> = page.items.iter().filter_map(|p| p.text("firstName")).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
    }

    #[tokio::test]
    async fn test_merge_missing_is_none() {
        let store = MemoryPatientStore::default();
        let merged = store
            .merge(Uuid::new_v4(), &attrs(json!({"a": 1})), Utc::now())
            .await
            .unwrap();
        assert!(merged.is_none());
    }
}

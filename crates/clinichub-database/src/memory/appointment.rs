use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use clinichub_core::error::AppError;
use clinichub_core::result::AppResult;
use clinichub_core::types::{Page, PageRequest};
use clinichub_entity::appointment::{
    Appointment, AppointmentChanges, AppointmentFilter, SLOT_TAKEN_MESSAGE,
};

use crate::store::AppointmentStore;

/// In-memory [`AppointmentStore`]. Slot checks and writes share one lock.
#[derive(Debug, Default)]
pub struct MemoryAppointmentStore {
    rows: RwLock<HashMap<Uuid, Appointment>>,
}

fn slot_taken(rows: &HashMap<Uuid, Appointment>, candidate: &Appointment) -> bool {
    candidate.status.holds_slot()
        && rows
            .values()
            .any(|a| a.id != candidate.id && a.occupies(candidate.date, &candidate.time))
}

fn calendar_order(mut items: Vec<Appointment>) -> Vec<Appointment> {
    items.sort_by(|a, b| {
        (a.date, &a.time, a.created_at, a.id).cmp(&(b.date, &b.time, b.created_at, b.id))
    });
    items
}

#[async_trait]
impl AppointmentStore for MemoryAppointmentStore {
    async fn book(&self, appointment: &Appointment) -> AppResult<()> {
        let mut rows = self.rows.write().await;
        if slot_taken(&rows, appointment) {
            return Err(AppError::conflict(SLOT_TAKEN_MESSAGE));
        }
        rows.insert(appointment.id, appointment.clone());
        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Appointment>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn list(
        &self,
        filter: &AppointmentFilter,
        page: &PageRequest,
    ) -> AppResult<Page<Appointment>> {
        let matching = calendar_order(
            self.rows
                .read()
                .await
                .values()
                .filter(|a| filter.matches(a))
                .cloned()
                .collect(),
        );
        let total = matching.len() as u64;
        Ok(Page::new(page.slice(matching), page, total))
    }

    async fn update(
        &self,
        id: Uuid,
        changes: &AppointmentChanges,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Appointment>> {
        let mut rows = self.rows.write().await;
        let Some(current) = rows.get(&id) else {
            return Ok(None);
        };
        let mut updated = current.clone();
        updated.apply(changes.clone(), now);
        if slot_taken(&rows, &updated) {
            return Err(AppError::conflict(SLOT_TAKEN_MESSAGE));
        }
        rows.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.rows.write().await.remove(&id).is_some())
    }

    async fn all(&self) -> AppResult<Vec<Appointment>> {
        Ok(calendar_order(self.rows.read().await.values().cloned().collect()))
    }

    async fn count(&self, filter: &AppointmentFilter) -> AppResult<u64> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .filter(|a| filter.matches(a))
            .count() as u64)
    }
}

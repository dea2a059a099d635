use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use clinichub_core::result::AppResult;
use clinichub_core::types::{Page, PageRequest};
use clinichub_entity::audit::{AuditEntry, AuditFilter, NewAuditEntry};

use crate::store::AuditStore;

/// In-memory [`AuditStore`]. Entries are only ever pushed or swept.
#[derive(Debug, Default)]
pub struct MemoryAuditStore {
    rows: RwLock<Vec<AuditEntry>>,
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn append(&self, entry: NewAuditEntry) -> AppResult<()> {
        self.rows.write().await.push(entry.into_entry());
        Ok(())
    }

    async fn list(&self, filter: &AuditFilter, page: &PageRequest) -> AppResult<Page<AuditEntry>> {
        let mut matching: Vec<_> = self
            .rows
            .read()
            .await
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        // Stable sort keeps append order among equal timestamps; reverse it.
        matching.reverse();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let total = matching.len() as u64;
        Ok(Page::new(page.slice(matching), page, total))
    }

    async fn purge_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|e| e.timestamp >= cutoff);
        Ok((before - rows.len()) as u64)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.rows.read().await.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinichub_entity::audit::{AuditAction, AuditActor};

    fn entry(action: AuditAction, timestamp: DateTime<Utc>) -> NewAuditEntry {
        NewAuditEntry {
            action,
            actor: AuditActor::Public,
            ip_address: None,
            user_agent: None,
            details: serde_json::json!({}),
            timestamp,
        }
    }

    #[tokio::test]
    async fn test_newest_first_and_purge() {
        let store = MemoryAuditStore::default();
        let now = Utc::now();
        store
            .append(entry(AuditAction::BackupCreated, now - chrono::Duration::days(400)))
            .await
            .unwrap();
        store.append(entry(AuditAction::PatientCreated, now)).await.unwrap();

        let page = store
            .list(&AuditFilter::default(), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.items[0].action, "patient_created");

        let purged = store
            .purge_before(now - chrono::Duration::days(365))
            .await
            .unwrap();
        assert_eq!(purged, 1);
        assert_eq!(store.count().await.unwrap(), 1);
    }
}

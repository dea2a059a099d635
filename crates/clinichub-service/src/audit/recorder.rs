//! Best-effort audit recorder.
//!
//! The recorder is the only writer of the audit trail. A failed or slow
//! append is logged and dropped; it never fails the operation being
//! audited.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use clinichub_core::config::AuditConfig;
use clinichub_core::types::{Page, PageRequest};
use clinichub_core::AppResult;
use clinichub_database::AuditStore;
use clinichub_entity::audit::{AuditAction, AuditActor, AuditEntry, AuditFilter, NewAuditEntry};

use crate::context::RequestOrigin;

/// Appends and reads audit entries.
#[derive(Clone)]
pub struct AuditRecorder {
    store: Arc<dyn AuditStore>,
    write_timeout: Duration,
}

impl std::fmt::Debug for AuditRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditRecorder")
            .field("write_timeout", &self.write_timeout)
            .finish_non_exhaustive()
    }
}

impl AuditRecorder {
    /// Creates a new recorder.
    pub fn new(store: Arc<dyn AuditStore>, write_timeout: Duration) -> Self {
        Self {
            store,
            write_timeout,
        }
    }

    /// Creates a recorder from audit configuration.
    pub fn from_config(store: Arc<dyn AuditStore>, config: &AuditConfig) -> Self {
        Self::new(store, Duration::from_millis(config.write_timeout_ms))
    }

    /// Record one security-relevant action.
    pub async fn record(
        &self,
        origin: &RequestOrigin,
        action: AuditAction,
        actor: AuditActor,
        details: Value,
    ) {
        let entry = NewAuditEntry {
            action,
            actor,
            ip_address: origin.ip_address.clone(),
            user_agent: origin.user_agent.clone(),
            details,
            timestamp: Utc::now(),
        };

        match tokio::time::timeout(self.write_timeout, self.store.append(entry)).await {
            Ok(Ok(())) => debug!(%action, %actor, "Audit entry recorded"),
            Ok(Err(e)) => warn!(
                %action,
                %actor,
                error = %e,
                "Failed to record audit entry"
            ),
            Err(_) => warn!(
                %action,
                %actor,
                timeout_ms = self.write_timeout.as_millis() as u64,
                "Audit write timed out"
            ),
        }
    }

    /// Newest first.
    pub async fn list(
        &self,
        filter: &AuditFilter,
        page: &PageRequest,
    ) -> AppResult<Page<AuditEntry>> {
        self.store.list(filter, page).await
    }

    /// Delete entries older than `retention_days` before `now`.
    pub async fn purge_older_than(&self, retention_days: u32, now: DateTime<Utc>) -> AppResult<u64> {
        let cutoff = now - chrono::Duration::days(i64::from(retention_days));
        let purged = self.store.purge_before(cutoff).await?;
        debug!(purged, %cutoff, "Audit retention sweep finished");
        Ok(purged)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use clinichub_core::AppError;
    use clinichub_database::memory::MemoryAuditStore;
    use serde_json::json;

    use super::*;

    struct BrokenStore;

    #[async_trait]
    impl AuditStore for BrokenStore {
        async fn append(&self, _entry: NewAuditEntry) -> AppResult<()> {
            Err(AppError::database("audit_logs is read-only"))
        }

        async fn list(&self, _: &AuditFilter, page: &PageRequest) -> AppResult<Page<AuditEntry>> {
            Ok(Page::new(Vec::new(), page, 0))
        }

        async fn purge_before(&self, _: DateTime<Utc>) -> AppResult<u64> {
            Ok(0)
        }

        async fn count(&self) -> AppResult<u64> {
            Ok(0)
        }
    }

    struct StalledStore;

    #[async_trait]
    impl AuditStore for StalledStore {
        async fn append(&self, _entry: NewAuditEntry) -> AppResult<()> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }

        async fn list(&self, _: &AuditFilter, page: &PageRequest) -> AppResult<Page<AuditEntry>> {
            Ok(Page::new(Vec::new(), page, 0))
        }

        async fn purge_before(&self, _: DateTime<Utc>) -> AppResult<u64> {
            Ok(0)
        }

        async fn count(&self) -> AppResult<u64> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_records_origin_and_actor() {
        let store = Arc::new(MemoryAuditStore::default());
        let recorder = AuditRecorder::new(store.clone(), Duration::from_secs(1));
        let origin = RequestOrigin::new(Some("10.1.2.3".into()), Some("curl/8".into()));

        recorder
            .record(
                &origin,
                AuditAction::AppointmentCreated,
                AuditActor::Public,
                json!({"date": "2025-01-01"}),
            )
            .await;

        let page = recorder
            .list(&AuditFilter::default(), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        let entry = &page.items[0];
        assert_eq!(entry.action, "appointment_created");
        assert_eq!(entry.actor, "public");
        assert_eq!(entry.ip_address.as_deref(), Some("10.1.2.3"));
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8"));
    }

    #[tokio::test]
    async fn test_store_failure_is_swallowed() {
        let recorder = AuditRecorder::new(Arc::new(BrokenStore), Duration::from_secs(1));
        recorder
            .record(
                &RequestOrigin::default(),
                AuditAction::LoginFailed,
                AuditActor::Public,
                json!({}),
            )
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_store_is_bounded() {
        let recorder = AuditRecorder::new(Arc::new(StalledStore), Duration::from_millis(50));
        let started = tokio::time::Instant::now();
        recorder
            .record(
                &RequestOrigin::default(),
                AuditAction::MaintenanceRun,
                AuditActor::Public,
                json!({}),
            )
            .await;
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}

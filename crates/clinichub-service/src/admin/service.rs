//! Admin-only operations.

use std::collections::BTreeMap;
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use clinichub_core::types::{Page, PageRequest};
use clinichub_core::{AppError, AppResult};
use clinichub_database::Stores;
use clinichub_entity::appointment::{Appointment, AppointmentFilter};
use clinichub_entity::audit::{AuditAction, AuditEntry, AuditFilter};
use clinichub_entity::patient::Patient;
use clinichub_entity::user::{StaffFilter, User};
use clinichub_storage::FileStore;
use clinichub_storage::naming::{STAMP_FORMAT, backup_name};

use crate::audit::AuditRecorder;
use crate::context::RequestContext;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Row count of one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    pub count: u64,
}

/// Store-level statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemStats {
    pub collections: BTreeMap<&'static str, CollectionStats>,
    pub database_size_mb: f64,
    pub version: &'static str,
}

/// Result of `POST /api/admin/backup`.
#[derive(Debug, Clone, Serialize)]
pub struct BackupReceipt {
    pub message: String,
    pub backup_name: String,
    pub file_path: String,
}

/// Result of `POST /api/admin/maintenance`.
#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceReport {
    pub message: String,
    pub tasks_completed: Vec<String>,
}

#[derive(Serialize)]
struct BackupExport {
    timestamp: String,
    patients: Vec<Patient>,
    users: Vec<User>,
    appointments: Vec<Appointment>,
}

/// Admin operations over every store.
#[derive(Clone)]
pub struct AdminService {
    stores: Stores,
    backups: Arc<dyn FileStore>,
    recorder: AuditRecorder,
    retention_days: u32,
}

impl std::fmt::Debug for AdminService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminService")
            .field("backups", &self.backups)
            .field("retention_days", &self.retention_days)
            .finish_non_exhaustive()
    }
}

impl AdminService {
    /// Creates a new admin service.
    pub fn new(
        stores: Stores,
        backups: Arc<dyn FileStore>,
        recorder: AuditRecorder,
        retention_days: u32,
    ) -> Self {
        Self {
            stores,
            backups,
            recorder,
            retention_days,
        }
    }

    /// Every account, newest first. Hashes are never serialized.
    pub async fn users(&self) -> AppResult<Vec<User>> {
        self.stores.users.list_all().await
    }

    /// Paginated staff directory.
    pub async fn staff(&self, filter: &StaffFilter, page: &PageRequest) -> AppResult<Page<User>> {
        self.stores.users.list_staff(filter, page).await
    }

    /// Audit trail, newest first.
    pub async fn audit_logs(
        &self,
        filter: &AuditFilter,
        page: &PageRequest,
    ) -> AppResult<Page<AuditEntry>> {
        self.recorder.list(filter, page).await
    }

    /// Activate or deactivate an account.
    pub async fn set_user_status(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        is_active: bool,
    ) -> AppResult<User> {
        if user_id == ctx.user_id && !is_active {
            return Err(AppError::invalid_input(
                "You cannot deactivate your own account",
            ));
        }

        let user = self
            .stores
            .users
            .set_active(user_id, is_active)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        info!(user_id = %user.id, is_active, changed_by = %ctx.user_id, "User status changed");
        self.recorder
            .record(
                &ctx.origin,
                AuditAction::UserStatusChanged,
                ctx.actor(),
                json!({ "target_user_id": user.id, "is_active": is_active }),
            )
            .await;

        Ok(user)
    }

    pub async fn system_stats(&self) -> AppResult<SystemStats> {
        let stores = &self.stores;
        let mut collections = BTreeMap::new();
        collections.insert("users", stats(stores.users.count().await?));
        collections.insert("patients", stats(stores.patients.count().await?));
        collections.insert(
            "appointments",
            stats(stores.appointments.count(&AppointmentFilter::default()).await?),
        );
        collections.insert("patient_documents", stats(stores.documents.count().await?));
        collections.insert("notifications", stats(stores.notifications.count().await?));
        collections.insert("audit_logs", stats(stores.audit.count().await?));

        let size = stores.system.size_bytes().await?;
        Ok(SystemStats {
            collections,
            database_size_mb: (size as f64 / BYTES_PER_MB * 100.0).round() / 100.0,
            version: env!("CARGO_PKG_VERSION"),
        })
    }

    /// Write a JSON export of patients, users and appointments.
    pub async fn backup(&self, ctx: &RequestContext) -> AppResult<BackupReceipt> {
        let export = BackupExport {
            timestamp: ctx.request_time.format(STAMP_FORMAT).to_string(),
            patients: self.stores.patients.all().await?,
            users: self.stores.users.list_all().await?,
            appointments: self.stores.appointments.all().await?,
        };
        let body = serde_json::to_vec_pretty(&export)?;

        let name = backup_name(ctx.request_time);
        let bytes = self.backups.write(&name, Bytes::from(body)).await?;
        let file_path = self.backups.display_path(&name);

        info!(backup = %name, bytes, "Backup written");
        self.recorder
            .record(
                &ctx.origin,
                AuditAction::BackupCreated,
                ctx.actor(),
                json!({ "backup_name": name, "file_path": file_path }),
            )
            .await;

        Ok(BackupReceipt {
            message: "Backup created successfully".to_string(),
            backup_name: name,
            file_path,
        })
    }

    /// Audit retention sweep followed by store optimization.
    pub async fn maintenance(&self, ctx: &RequestContext) -> AppResult<MaintenanceReport> {
        let mut tasks = Vec::new();

        let purged = self
            .recorder
            .purge_older_than(self.retention_days, ctx.request_time)
            .await?;
        tasks.push(format!("Cleaned {purged} old audit logs"));
        tasks.extend(self.stores.system.optimize().await?);

        info!(tasks = ?tasks, "Maintenance completed");
        self.recorder
            .record(
                &ctx.origin,
                AuditAction::MaintenanceRun,
                ctx.actor(),
                json!({ "tasks_completed": tasks }),
            )
            .await;

        Ok(MaintenanceReport {
            message: "Maintenance completed successfully".to_string(),
            tasks_completed: tasks,
        })
    }
}

fn stats(count: u64) -> CollectionStats {
    CollectionStats { count }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;
    use clinichub_core::error::ErrorKind;
    use clinichub_entity::audit::{AuditActor, NewAuditEntry};
    use clinichub_entity::user::{CreateUser, UserRole};
    use clinichub_storage::LocalFileStore;

    use super::*;
    use crate::context::RequestOrigin;

    async fn fixture(dir: &std::path::Path) -> (Stores, AdminService) {
        let stores = Stores::in_memory();
        let backups = Arc::new(LocalFileStore::new(dir).await.unwrap());
        let recorder = AuditRecorder::new(stores.audit.clone(), Duration::from_secs(1));
        let admin = AdminService::new(stores.clone(), backups, recorder, 365);
        (stores, admin)
    }

    fn admin_ctx() -> RequestContext {
        RequestContext {
            user_id: Uuid::new_v4(),
            email: "admin@clinic.test".into(),
            name: "Admin".into(),
            role: UserRole::Admin,
            origin: RequestOrigin::default(),
            request_time: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_backup_excludes_password_hashes() {
        let dir = tempfile::tempdir().unwrap();
        let (stores, admin) = fixture(dir.path()).await;
        stores
            .users
            .create(&CreateUser {
                email: "nurse@clinic.test".into(),
                name: "Nurse".into(),
                password_hash: "$argon2id$secret-hash".into(),
                role: UserRole::Nurse,
                is_active: true,
            })
            .await
            .unwrap();

        let receipt = admin.backup(&admin_ctx()).await.unwrap();
        assert!(receipt.backup_name.starts_with("healthcare_backup_"));

        let raw = std::fs::read_to_string(dir.path().join(&receipt.backup_name)).unwrap();
        assert!(!raw.contains("secret-hash"));
        let export: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(export["users"].as_array().unwrap().len(), 1);
        assert!(export["patients"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_maintenance_purges_expired_entries() {
        let dir = tempfile::tempdir().unwrap();
        let (stores, admin) = fixture(dir.path()).await;
        let ctx = admin_ctx();
        stores
            .audit
            .append(NewAuditEntry {
                action: AuditAction::LoginFailed,
                actor: AuditActor::Public,
                ip_address: None,
                user_agent: None,
                details: json!({}),
                timestamp: ctx.request_time - chrono::Duration::days(400),
            })
            .await
            .unwrap();

        let report = admin.maintenance(&ctx).await.unwrap();
        assert_eq!(report.tasks_completed[0], "Cleaned 1 old audit logs");

        // Only the maintenance_run entry itself remains.
        let remaining = admin
            .audit_logs(&AuditFilter::default(), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(remaining.total, 1);
        assert_eq!(remaining.items[0].action, "maintenance_run");
    }

    #[tokio::test]
    async fn test_set_user_status() {
        let dir = tempfile::tempdir().unwrap();
        let (stores, admin) = fixture(dir.path()).await;
        let ctx = admin_ctx();
        let nurse = stores
            .users
            .create(&CreateUser {
                email: "nurse@clinic.test".into(),
                name: "Nurse".into(),
                password_hash: "x".into(),
                role: UserRole::Nurse,
                is_active: true,
            })
            .await
            .unwrap();

        let updated = admin.set_user_status(&ctx, nurse.id, false).await.unwrap();
        assert!(!updated.is_active);

        let err = admin
            .set_user_status(&ctx, Uuid::new_v4(), true)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let err = admin
            .set_user_status(&ctx, ctx.user_id, false)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_system_stats_lists_collections() {
        let dir = tempfile::tempdir().unwrap();
        let (_, admin) = fixture(dir.path()).await;
        let stats = admin.system_stats().await.unwrap();
        assert_eq!(stats.collections.len(), 6);
        assert_eq!(stats.collections["patients"].count, 0);
    }
}

//! Store traits shared by the PostgreSQL and in-memory backends.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use clinichub_core::result::AppResult;
use clinichub_core::types::{Page, PageRequest, SortField};
use clinichub_entity::appointment::{Appointment, AppointmentChanges, AppointmentFilter};
use clinichub_entity::audit::{AuditEntry, AuditFilter, NewAuditEntry};
use clinichub_entity::document::{NewPatientDocument, PatientDocument};
use clinichub_entity::notification::{NewNotification, Notification};
use clinichub_entity::patient::{Attributes, Patient, PatientCriteria};
use clinichub_entity::user::{CreateUser, StaffFilter, User, UserRole};

use crate::memory;
use crate::repositories;

/// Conflict message for a duplicate account email.
pub const EMAIL_TAKEN_MESSAGE: &str = "Email already exists";

/// Staff accounts. Email uniqueness is enforced here.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Lookup by normalized email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a user; a taken email is a `Conflict`.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Overwrite name, hash, role and active flag of an existing account.
    async fn replace_credentials(&self, id: Uuid, data: &CreateUser) -> AppResult<User>;

    /// Every user, newest first.
    async fn list_all(&self) -> AppResult<Vec<User>>;

    /// Paginated staff listing, newest first.
    async fn list_staff(&self, filter: &StaffFilter, page: &PageRequest) -> AppResult<Page<User>>;

    /// Active users holding any of `roles`.
    async fn list_active_by_roles(&self, roles: &[UserRole]) -> AppResult<Vec<User>>;

    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()>;

    /// Returns `None` when the user does not exist.
    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Option<User>>;

    async fn count(&self) -> AppResult<u64>;
}

/// Patient records.
#[async_trait]
pub trait PatientStore: Send + Sync {
    async fn insert(&self, patient: &Patient) -> AppResult<()>;

    async fn find(&self, id: Uuid) -> AppResult<Option<Patient>>;

    /// Filtered, sorted, paginated listing.
    async fn list(
        &self,
        search: &str,
        sort: &SortField,
        page: &PageRequest,
    ) -> AppResult<Page<Patient>>;

    /// Partial merge; `None` when the patient does not exist.
    async fn merge(
        &self,
        id: Uuid,
        changes: &Attributes,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Patient>>;

    /// Hard delete; `false` when nothing was deleted.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Advanced search, newest first, at most `limit` results.
    async fn search(&self, criteria: &PatientCriteria, limit: u64) -> AppResult<Vec<Patient>>;

    /// Every patient, newest first.
    async fn all(&self) -> AppResult<Vec<Patient>>;

    async fn count(&self) -> AppResult<u64>;

    /// Patients whose `assigned_doctor` attribute equals `doctor_id`.
    async fn count_assigned_to(&self, doctor_id: &str) -> AppResult<u64>;

    /// `(YYYY-MM, count)` by creation month, ascending.
    async fn count_by_month(&self) -> AppResult<Vec<(String, u64)>>;
}

/// Appointment bookings. Non-cancelled appointments have unique slots.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Insert; an occupied slot is a `Conflict`.
    async fn book(&self, appointment: &Appointment) -> AppResult<()>;

    async fn find(&self, id: Uuid) -> AppResult<Option<Appointment>>;

    /// Filtered listing ordered by date then time.
    async fn list(
        &self,
        filter: &AppointmentFilter,
        page: &PageRequest,
    ) -> AppResult<Page<Appointment>>;

    /// Partial update; `None` when absent, `Conflict` when the new slot is taken.
    async fn update(
        &self,
        id: Uuid,
        changes: &AppointmentChanges,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Appointment>>;

    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Every appointment ordered by date then time.
    async fn all(&self) -> AppResult<Vec<Appointment>>;

    async fn count(&self, filter: &AppointmentFilter) -> AppResult<u64>;
}

/// Patient document metadata.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, data: NewPatientDocument) -> AppResult<PatientDocument>;

    /// Documents of one patient, newest first.
    async fn list_for_patient(&self, patient_id: Uuid) -> AppResult<Vec<PatientDocument>>;

    /// Drop every metadata row of one patient; returns how many went.
    async fn delete_for_patient(&self, patient_id: Uuid) -> AppResult<u64>;

    async fn count(&self) -> AppResult<u64>;
}

/// Per-user notifications.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn insert_many(&self, items: Vec<NewNotification>) -> AppResult<()>;

    /// Unread notifications of `user_id`, newest first.
    async fn unread_for(&self, user_id: Uuid, limit: u64) -> AppResult<Vec<Notification>>;

    /// Mark read; `false` when the notification is absent or not owned by `user_id`.
    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> AppResult<bool>;

    async fn count(&self) -> AppResult<u64>;
}

/// Append-only audit trail.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn append(&self, entry: NewAuditEntry) -> AppResult<()>;

    /// Newest first.
    async fn list(&self, filter: &AuditFilter, page: &PageRequest) -> AppResult<Page<AuditEntry>>;

    /// Retention sweep; returns the number of purged entries.
    async fn purge_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;

    async fn count(&self) -> AppResult<u64>;
}

/// Backend-level operations.
#[async_trait]
pub trait SystemStore: Send + Sync {
    /// Round-trip to the backend; errors when it is unreachable.
    async fn ping(&self) -> AppResult<()>;

    /// Approximate storage footprint.
    async fn size_bytes(&self) -> AppResult<u64>;

    /// Refresh planner statistics; returns the completed task names.
    async fn optimize(&self) -> AppResult<Vec<String>>;
}

/// One handle per collection, shared across services.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub patients: Arc<dyn PatientStore>,
    pub appointments: Arc<dyn AppointmentStore>,
    pub documents: Arc<dyn DocumentStore>,
    pub notifications: Arc<dyn NotificationStore>,
    pub audit: Arc<dyn AuditStore>,
    pub system: Arc<dyn SystemStore>,
}

impl Stores {
    /// PostgreSQL-backed stores over one pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(repositories::UserRepository::new(pool.clone())),
            patients: Arc::new(repositories::PatientRepository::new(pool.clone())),
            appointments: Arc::new(repositories::AppointmentRepository::new(pool.clone())),
            documents: Arc::new(repositories::DocumentRepository::new(pool.clone())),
            notifications: Arc::new(repositories::NotificationRepository::new(pool.clone())),
            audit: Arc::new(repositories::AuditLogRepository::new(pool.clone())),
            system: Arc::new(repositories::SystemRepository::new(pool)),
        }
    }

    /// Fresh, empty in-memory stores.
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(memory::MemoryUserStore::default()),
            patients: Arc::new(memory::MemoryPatientStore::default()),
            appointments: Arc::new(memory::MemoryAppointmentStore::default()),
            documents: Arc::new(memory::MemoryDocumentStore::default()),
            notifications: Arc::new(memory::MemoryNotificationStore::default()),
            audit: Arc::new(memory::MemoryAuditStore::default()),
            system: Arc::new(memory::MemorySystemStore::default()),
        }
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}

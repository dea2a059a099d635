//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use clinichub_auth::{AccessGate, PasswordHasher, PasswordValidator, SessionTokenCodec};
use clinichub_core::config::AppConfig;
use clinichub_core::result::AppResult;
use clinichub_database::Stores;
use clinichub_service::{
    AdminService, AnalyticsService, AppointmentService, AuditRecorder, AuthService,
    DocumentService, NotificationService, PatientService, PharmacyService, SearchService,
};
use clinichub_storage::FileStore;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Store handles, PostgreSQL or in-memory
    pub stores: Stores,

    // ── Auth ─────────────────────────────────────────────────
    /// Guard pipeline evaluator
    pub gate: AccessGate,
    /// Audit trail writer
    pub recorder: AuditRecorder,

    // ── Services ─────────────────────────────────────────────
    pub auth_service: Arc<AuthService>,
    pub patient_service: Arc<PatientService>,
    pub search_service: Arc<SearchService>,
    pub appointment_service: Arc<AppointmentService>,
    pub document_service: Arc<DocumentService>,
    pub notification_service: Arc<NotificationService>,
    pub analytics_service: Arc<AnalyticsService>,
    pub admin_service: Arc<AdminService>,
    pub pharmacy_service: Arc<PharmacyService>,
}

impl AppState {
    /// Wire every service over `stores` and the two file stores.
    pub fn new(
        config: AppConfig,
        stores: Stores,
        uploads: Arc<dyn FileStore>,
        backups: Arc<dyn FileStore>,
    ) -> AppResult<Self> {
        let hasher = Arc::new(PasswordHasher::from_config(&config.auth)?);
        let validator = Arc::new(PasswordValidator::from_config(&config.auth));
        let codec = Arc::new(SessionTokenCodec::from_config(&config.auth));
        let gate = AccessGate::new(Arc::clone(&codec));
        let recorder = AuditRecorder::from_config(Arc::clone(&stores.audit), &config.audit);

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&stores.users),
            hasher,
            validator,
            codec,
            recorder.clone(),
        ));
        let patient_service = Arc::new(PatientService::new(
            Arc::clone(&stores.patients),
            Arc::clone(&stores.documents),
            recorder.clone(),
        ));
        let search_service = Arc::new(SearchService::new(Arc::clone(&stores.patients)));
        let appointment_service = Arc::new(AppointmentService::new(
            Arc::clone(&stores.appointments),
            Arc::clone(&stores.users),
            Arc::clone(&stores.notifications),
            recorder.clone(),
        ));
        let document_service = Arc::new(DocumentService::new(
            Arc::clone(&stores.patients),
            Arc::clone(&stores.documents),
            uploads,
            config.storage.allowed_extensions.clone(),
            recorder.clone(),
        ));
        let notification_service =
            Arc::new(NotificationService::new(Arc::clone(&stores.notifications)));
        let analytics_service = Arc::new(AnalyticsService::new(
            Arc::clone(&stores.users),
            Arc::clone(&stores.patients),
            Arc::clone(&stores.appointments),
        ));
        let admin_service = Arc::new(AdminService::new(
            stores.clone(),
            backups,
            recorder.clone(),
            config.audit.retention_days,
        ));

        Ok(Self {
            config: Arc::new(config),
            stores,
            gate,
            recorder,
            auth_service,
            patient_service,
            search_service,
            appointment_service,
            document_service,
            notification_service,
            analytics_service,
            admin_service,
            pharmacy_service: Arc::new(PharmacyService::new()),
        })
    }
}

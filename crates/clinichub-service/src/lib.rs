//! # clinichub-service
//!
//! Business logic service layer for ClinicHub. Each service orchestrates
//! stores, document storage, credentials and the audit trail to implement
//! one group of clinic use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod admin;
pub mod analytics;
pub mod appointment;
pub mod audit;
pub mod auth;
pub mod context;
pub mod document;
pub mod notification;
pub mod patient;
pub mod pharmacy;
pub mod validation;

pub use admin::{AdminService, StaffRoster, StaffSeed};
pub use analytics::AnalyticsService;
pub use appointment::AppointmentService;
pub use audit::AuditRecorder;
pub use auth::AuthService;
pub use context::{RequestContext, RequestOrigin};
pub use document::DocumentService;
pub use notification::NotificationService;
pub use patient::{PatientService, SearchService};
pub use pharmacy::PharmacyService;

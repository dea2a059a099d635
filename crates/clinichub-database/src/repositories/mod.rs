//! PostgreSQL implementations of the store traits.

pub mod appointment;
pub mod audit;
pub mod document;
pub mod notification;
pub mod patient;
pub mod system;
pub mod user;

pub use appointment::AppointmentRepository;
pub use audit::AuditLogRepository;
pub use document::DocumentRepository;
pub use notification::NotificationRepository;
pub use patient::PatientRepository;
pub use system::SystemRepository;
pub use user::UserRepository;

use clinichub_core::error::{AppError, ErrorKind};

/// Map a sqlx error, reporting an unreachable backend as unavailable.
pub(crate) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            AppError::with_source(ErrorKind::ServiceUnavailable, context, e)
        }
        _ => AppError::with_source(ErrorKind::Database, context, e),
    }
}

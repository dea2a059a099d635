//! In-memory store implementations for tests and `--in-memory` runs.
//!
//! Each store keeps its rows behind a single `tokio::sync::RwLock`, so a
//! check-then-write inside one lock acquisition is atomic.

mod appointment;
mod audit;
mod document;
mod notification;
mod patient;
mod system;
mod user;

pub use appointment::MemoryAppointmentStore;
pub use audit::MemoryAuditStore;
pub use document::MemoryDocumentStore;
pub use notification::MemoryNotificationStore;
pub use patient::MemoryPatientStore;
pub use system::MemorySystemStore;
pub use user::MemoryUserStore;

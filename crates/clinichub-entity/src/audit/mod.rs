//! Audit trail entities.

pub mod model;

pub use model::{AuditAction, AuditActor, AuditEntry, AuditFilter, NewAuditEntry};

//! Audit trail writer and reader.

pub mod recorder;

pub use recorder::AuditRecorder;

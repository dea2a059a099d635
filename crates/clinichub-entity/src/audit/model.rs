//! Audit log entity model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Actor string stored for unauthenticated requests.
pub const PUBLIC_ACTOR: &str = "public";

/// Security-relevant actions written to the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    UserRegistered,
    LoginFailed,
    UserStatusChanged,
    PatientCreated,
    PatientUpdated,
    PatientDeleted,
    AppointmentCreated,
    AppointmentUpdated,
    AppointmentDeleted,
    DocumentUpload,
    BackupCreated,
    MaintenanceRun,
}

impl AuditAction {
    /// Return the stored tag for this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserRegistered => "user_registered",
            Self::LoginFailed => "login_failed",
            Self::UserStatusChanged => "user_status_changed",
            Self::PatientCreated => "patient_created",
            Self::PatientUpdated => "patient_updated",
            Self::PatientDeleted => "patient_deleted",
            Self::AppointmentCreated => "appointment_created",
            Self::AppointmentUpdated => "appointment_updated",
            Self::AppointmentDeleted => "appointment_deleted",
            Self::DocumentUpload => "document_upload",
            Self::BackupCreated => "backup_created",
            Self::MaintenanceRun => "maintenance_run",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = clinichub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "user_registered" => Self::UserRegistered,
            "login_failed" => Self::LoginFailed,
            "user_status_changed" => Self::UserStatusChanged,
            "patient_created" => Self::PatientCreated,
            "patient_updated" => Self::PatientUpdated,
            "patient_deleted" => Self::PatientDeleted,
            "appointment_created" => Self::AppointmentCreated,
            "appointment_updated" => Self::AppointmentUpdated,
            "appointment_deleted" => Self::AppointmentDeleted,
            "document_upload" => Self::DocumentUpload,
            "backup_created" => Self::BackupCreated,
            "maintenance_run" => Self::MaintenanceRun,
            other => {
                return Err(clinichub_core::AppError::invalid_input(format!(
                    "Unknown audit action: '{other}'"
                )));
            }
        })
    }
}

/// Who performed an audited action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditActor {
    /// An authenticated user.
    User(Uuid),
    /// An unauthenticated caller.
    Public,
}

impl AuditActor {
    /// The string form stored in the `actor` column.
    pub fn as_stored(&self) -> String {
        match self {
            Self::User(id) => id.to_string(),
            Self::Public => PUBLIC_ACTOR.to_string(),
        }
    }
}

impl fmt::Display for AuditActor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_stored())
    }
}

/// A persisted audit entry. Entries are append-only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditEntry {
    /// Unique entry ID.
    pub id: Uuid,
    /// Action tag.
    pub action: String,
    /// User ID or `"public"`.
    #[serde(rename = "user_id")]
    pub actor: String,
    /// Client IP, if known.
    pub ip_address: Option<String>,
    /// Client user agent, if sent.
    pub user_agent: Option<String>,
    /// Action-specific context.
    pub details: serde_json::Value,
    /// When the action happened.
    pub timestamp: DateTime<Utc>,
}

/// Data for appending an audit entry.
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub action: AuditAction,
    pub actor: AuditActor,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub details: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl NewAuditEntry {
    /// Materialize the row that will be stored.
    pub fn into_entry(self) -> AuditEntry {
        AuditEntry {
            id: Uuid::new_v4(),
            action: self.action.as_str().to_string(),
            actor: self.actor.as_stored(),
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            details: self.details,
            timestamp: self.timestamp,
        }
    }
}

/// Filter for reading the audit trail.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Exact action tag.
    pub action: Option<String>,
    /// Exact actor string.
    pub actor: Option<String>,
    /// Inclusive lower bound.
    pub since: Option<DateTime<Utc>>,
}

impl AuditFilter {
    pub fn matches(&self, entry: &AuditEntry) -> bool {
        self.action.as_ref().is_none_or(|a| &entry.action == a)
            && self.actor.as_ref().is_none_or(|a| &entry.actor == a)
            && self.since.is_none_or(|s| entry.timestamp >= s)
    }
}

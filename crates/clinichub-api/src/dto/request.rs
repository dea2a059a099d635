//! Request DTOs: query strings and bodies owned by the HTTP layer.

use serde::Deserialize;

use clinichub_core::error::AppError;
use clinichub_core::types::PageRequest;
use clinichub_entity::appointment::AppointmentFilter;
use clinichub_entity::audit::AuditFilter;
use clinichub_entity::user::{StaffFilter, UserRole};
use clinichub_service::appointment::filter_from_query;
use clinichub_service::pharmacy::PrescriptionQuery;
use clinichub_service::validation::non_blank;

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    10
}

fn default_audit_limit() -> u64 {
    50
}

/// `GET /api/appointments` query.
#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Doctor id.
    pub doctor: Option<String>,
    pub status: Option<String>,
}

impl AppointmentQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }

    pub fn filter(&self) -> Result<AppointmentFilter, AppError> {
        filter_from_query(
            self.date.clone(),
            self.doctor.clone(),
            self.status.clone(),
        )
    }
}

/// `GET /api/admin/staff` query.
#[derive(Debug, Clone, Deserialize)]
pub struct StaffQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub role: Option<String>,
    pub search: Option<String>,
}

impl StaffQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }

    /// An unknown role is a 400.
    pub fn filter(&self) -> Result<StaffFilter, AppError> {
        Ok(StaffFilter {
            role: non_blank(self.role.clone())
                .map(|r| r.parse::<UserRole>())
                .transpose()?,
            search: non_blank(self.search.clone()),
        })
    }
}

/// `GET /api/admin/audit-logs` query.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditLogQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_audit_limit")]
    pub limit: u64,
    pub action: Option<String>,
}

impl AuditLogQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }

    pub fn filter(&self) -> AuditFilter {
        AuditFilter {
            action: non_blank(self.action.clone()),
            ..AuditFilter::default()
        }
    }
}

/// `GET /api/pharmacy/prescriptions` query.
#[derive(Debug, Clone, Deserialize)]
pub struct PrescriptionParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub status: Option<String>,
    pub search: Option<String>,
}

impl PrescriptionParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }

    pub fn query(&self) -> PrescriptionQuery {
        PrescriptionQuery {
            status: non_blank(self.status.clone()),
            search: non_blank(self.search.clone()),
        }
    }
}

/// `PUT /api/admin/users/{id}/status` body.
#[derive(Debug, Clone, Deserialize)]
pub struct SetUserStatusRequest {
    pub is_active: Option<bool>,
}

impl SetUserStatusRequest {
    pub fn is_active(&self) -> Result<bool, AppError> {
        self.is_active
            .ok_or_else(|| AppError::invalid_input("is_active is required"))
    }
}

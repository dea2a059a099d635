//! Per-role dashboard payloads.

use serde::Serialize;

/// Revenue credited per registered patient on the admin dashboard.
pub const DASHBOARD_REVENUE_PER_PATIENT: u64 = 150;

/// Stats shown on a staff dashboard; the shape depends on the role.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DashboardStats {
    Overview(OverviewStats),
    Doctor(DoctorStats),
    Nurse(NurseStats),
    Receptionist(ReceptionistStats),
    Pharmacist(PharmacistStats),
}

/// Clinic totals. Used for admins and unrecognized roles.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewStats {
    pub total_patients: u64,
    pub total_staff: u64,
    pub total_appointments: u64,
    pub revenue: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorStats {
    pub today_appointments: u64,
    pub completed_appointments: u64,
    pub pending_appointments: u64,
    pub total_patients: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NurseStats {
    pub patients_assigned: u64,
    pub tasks_completed: u64,
    pub pending_tasks: u64,
    pub vital_signs_recorded: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceptionistStats {
    pub appointments_scheduled: u64,
    pub patients_registered: u64,
    pub calls_handled: u64,
    pub pending_tasks: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PharmacistStats {
    pub prescriptions_processed: u64,
    pub pending_prescriptions: u64,
    pub inventory_alerts: u64,
    pub total_revenue: u64,
}

impl NurseStats {
    /// Canned until ward assignments are tracked.
    pub fn fixture() -> Self {
        Self {
            patients_assigned: 24,
            tasks_completed: 18,
            pending_tasks: 6,
            vital_signs_recorded: 45,
        }
    }
}

impl PharmacistStats {
    /// Canned; there is no dispensing system behind the pharmacy routes.
    pub fn fixture() -> Self {
        Self {
            prescriptions_processed: 34,
            pending_prescriptions: 8,
            inventory_alerts: 2,
            total_revenue: 8900,
        }
    }
}

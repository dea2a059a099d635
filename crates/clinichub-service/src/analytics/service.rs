//! Analytics queries.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use clinichub_core::AppResult;
use clinichub_database::{AppointmentStore, PatientStore, UserStore};
use clinichub_entity::appointment::{AppointmentFilter, AppointmentStatus};
use clinichub_entity::user::UserRole;

use super::dashboard::{
    DASHBOARD_REVENUE_PER_PATIENT, DashboardStats, DoctorStats, NurseStats, OverviewStats,
    PharmacistStats, ReceptionistStats,
};
use crate::context::RequestContext;

/// Mock billing rate per registered patient.
pub const REVENUE_PER_PATIENT: u64 = 100;

/// Revenue for one creation month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenuePoint {
    /// `YYYY-MM`.
    #[serde(rename = "_id")]
    pub month: String,
    pub revenue: u64,
    pub patient_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoctorPerformance {
    pub doctor_id: Uuid,
    pub doctor_name: String,
    pub patient_count: u64,
    pub appointment_count: u64,
    pub efficiency_score: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SatisfactionPoint {
    pub month: &'static str,
    pub satisfaction_score: f64,
    pub response_count: u32,
}

const SATISFACTION: [(&str, f64, u32); 5] = [
    ("2024-01", 4.2, 45),
    ("2024-02", 4.5, 52),
    ("2024-03", 4.3, 38),
    ("2024-04", 4.7, 61),
    ("2024-05", 4.4, 47),
];

/// Aggregates for the analytics and dashboard routes.
#[derive(Clone)]
pub struct AnalyticsService {
    users: Arc<dyn UserStore>,
    patients: Arc<dyn PatientStore>,
    appointments: Arc<dyn AppointmentStore>,
}

impl std::fmt::Debug for AnalyticsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyticsService").finish_non_exhaustive()
    }
}

impl AnalyticsService {
    pub fn new(
        users: Arc<dyn UserStore>,
        patients: Arc<dyn PatientStore>,
        appointments: Arc<dyn AppointmentStore>,
    ) -> Self {
        Self {
            users,
            patients,
            appointments,
        }
    }

    /// Mock revenue per patient-creation month, ascending.
    pub async fn revenue(&self) -> AppResult<Vec<RevenuePoint>> {
        let months = self.patients.count_by_month().await?;
        Ok(months
            .into_iter()
            .map(|(month, patient_count)| RevenuePoint {
                month,
                revenue: patient_count * REVENUE_PER_PATIENT,
                patient_count,
            })
            .collect())
    }

    /// Workload per doctor account.
    pub async fn doctor_performance(&self) -> AppResult<Vec<DoctorPerformance>> {
        let doctors = self
            .users
            .list_all()
            .await?
            .into_iter()
            .filter(|u| u.role == UserRole::Doctor);

        let mut performance = Vec::new();
        for doctor in doctors {
            let patient_count = self
                .patients
                .count_assigned_to(&doctor.id.to_string())
                .await?;
            let appointment_count = self
                .appointments
                .count(&AppointmentFilter {
                    doctor_id: Some(doctor.id),
                    ..Default::default()
                })
                .await?;
            performance.push(DoctorPerformance {
                doctor_id: doctor.id,
                doctor_name: doctor.name,
                patient_count,
                appointment_count,
                efficiency_score: efficiency_score(patient_count, appointment_count),
            });
        }
        Ok(performance)
    }

    /// Canned satisfaction survey results.
    pub fn satisfaction(&self) -> Vec<SatisfactionPoint> {
        SATISFACTION
            .iter()
            .map(|&(month, satisfaction_score, response_count)| SatisfactionPoint {
                month,
                satisfaction_score,
                response_count,
            })
            .collect()
    }

    /// Dashboard for `role`, which names the dashboard, not the caller.
    pub async fn dashboard(&self, ctx: &RequestContext, role: &str) -> AppResult<DashboardStats> {
        let role = role.parse::<UserRole>().ok();

        Ok(match role {
            Some(UserRole::Admin) => {
                let overview = self.overview().await?;
                DashboardStats::Overview(OverviewStats {
                    revenue: overview.total_patients * DASHBOARD_REVENUE_PER_PATIENT,
                    ..overview
                })
            }
            Some(UserRole::Doctor) => {
                let mine = |status: Option<AppointmentStatus>| AppointmentFilter {
                    doctor_id: Some(ctx.user_id),
                    status,
                    ..Default::default()
                };
                let today = AppointmentFilter {
                    date: Some(ctx.request_time.date_naive()),
                    ..mine(None)
                };
                DashboardStats::Doctor(DoctorStats {
                    today_appointments: self.appointments.count(&today).await?,
                    completed_appointments: self
                        .appointments
                        .count(&mine(Some(AppointmentStatus::Completed)))
                        .await?,
                    pending_appointments: self
                        .appointments
                        .count(&mine(Some(AppointmentStatus::Pending)))
                        .await?,
                    total_patients: self
                        .patients
                        .count_assigned_to(&ctx.user_id.to_string())
                        .await?,
                })
            }
            Some(UserRole::Nurse) => DashboardStats::Nurse(NurseStats::fixture()),
            Some(UserRole::Receptionist) => DashboardStats::Receptionist(ReceptionistStats {
                appointments_scheduled: self
                    .appointments
                    .count(&AppointmentFilter::default())
                    .await?,
                patients_registered: self.patients.count().await?,
                calls_handled: 23,
                pending_tasks: 3,
            }),
            Some(UserRole::Pharmacist) => DashboardStats::Pharmacist(PharmacistStats::fixture()),
            Some(UserRole::Staff) | None => DashboardStats::Overview(self.overview().await?),
        })
    }

    async fn overview(&self) -> AppResult<OverviewStats> {
        Ok(OverviewStats {
            total_patients: self.patients.count().await?,
            total_staff: self.users.count().await?,
            total_appointments: self
                .appointments
                .count(&AppointmentFilter::default())
                .await?,
            revenue: 0,
        })
    }
}

/// `min(100, 2 * (patients + appointments))`.
pub fn efficiency_score(patient_count: u64, appointment_count: u64) -> u64 {
    (patient_count + appointment_count)
        .saturating_mul(2)
        .min(100)
}

//! Public booking plus staff-side appointment management.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use clinichub_core::types::{Page, PageRequest};
use clinichub_core::{AppError, AppResult};
use clinichub_database::{AppointmentStore, NotificationStore, UserStore};
use clinichub_entity::appointment::{
    Appointment, AppointmentChanges, AppointmentFilter, AppointmentStatus, NewAppointment,
    parse_date, parse_time,
};
use clinichub_entity::audit::{AuditAction, AuditActor};
use clinichub_entity::notification::NewNotification;
use clinichub_entity::user::UserRole;

use crate::audit::AuditRecorder;
use crate::context::{RequestContext, RequestOrigin};
use crate::validation::{self, non_blank, required};

/// Roles notified about new bookings.
const BOOKING_WATCHERS: [UserRole; 2] = [UserRole::Admin, UserRole::Receptionist];

/// Body of `POST /api/appointments`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    #[serde(alias = "doctor_id")]
    pub doctor_id: Option<String>,
    pub notes: Option<String>,
}

/// Body of `PUT /api/appointments/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub status: Option<String>,
    #[serde(alias = "doctor_id")]
    pub doctor_id: Option<String>,
    pub notes: Option<String>,
}

/// Returned by a successful booking.
#[derive(Debug, Clone, Serialize)]
pub struct BookingReceipt {
    pub message: String,
    pub appointment_id: Uuid,
    pub appointment: Appointment,
}

/// Books and manages appointments.
#[derive(Clone)]
pub struct AppointmentService {
    appointments: Arc<dyn AppointmentStore>,
    users: Arc<dyn UserStore>,
    notifications: Arc<dyn NotificationStore>,
    recorder: AuditRecorder,
}

impl std::fmt::Debug for AppointmentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppointmentService").finish_non_exhaustive()
    }
}

impl AppointmentService {
    /// Creates a new appointment service.
    pub fn new(
        appointments: Arc<dyn AppointmentStore>,
        users: Arc<dyn UserStore>,
        notifications: Arc<dyn NotificationStore>,
        recorder: AuditRecorder,
    ) -> Self {
        Self {
            appointments,
            users,
            notifications,
            recorder,
        }
    }

    /// Book a pending appointment. Open to unauthenticated callers.
    pub async fn book(&self, origin: &RequestOrigin, req: BookingRequest) -> AppResult<BookingReceipt> {
        let name = required("name", req.name.as_deref())?.to_string();
        let phone = required("phone", req.phone.as_deref())?.to_string();
        let email = required("email", req.email.as_deref())?.to_string();
        let date = required("date", req.date.as_deref())?;
        let time = required("time", req.time.as_deref())?;

        validation::require_email(&email)?;
        validation::require_phone(&phone)?;
        let date = parse_date(date)?;
        let time = parse_time(time)?;
        let doctor_id = non_blank(req.doctor_id)
            .map(|raw| validation::parse_id(&raw))
            .transpose()?;

        let appointment = NewAppointment {
            name,
            phone,
            email,
            date,
            time,
            doctor_id,
            notes: non_blank(req.notes),
        }
        .into_appointment(chrono::Utc::now());

        self.appointments.book(&appointment).await?;
        info!(
            appointment_id = %appointment.id,
            date = %appointment.date,
            time = %appointment.time,
            "Appointment booked"
        );

        self.recorder
            .record(
                origin,
                AuditAction::AppointmentCreated,
                AuditActor::Public,
                json!({
                    "appointment_id": appointment.id,
                    "patient_name": appointment.name,
                    "date": appointment.date,
                    "time": appointment.time,
                }),
            )
            .await;
        self.notify_watchers(&appointment).await;

        Ok(BookingReceipt {
            message: "Appointment booked successfully!".to_string(),
            appointment_id: appointment.id,
            appointment,
        })
    }

    /// Filtered listing ordered by date then time.
    pub async fn list(
        &self,
        filter: &AppointmentFilter,
        page: &PageRequest,
    ) -> AppResult<Page<Appointment>> {
        self.appointments.list(filter, page).await
    }

    /// Applies a validated partial update.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        req: UpdateAppointmentRequest,
    ) -> AppResult<Appointment> {
        let changes = validate_changes(req)?;
        let fields = changed_fields(&changes);

        let appointment = self
            .appointments
            .update(id, &changes, ctx.request_time)
            .await?
            .ok_or_else(|| AppError::not_found("Appointment not found"))?;

        self.recorder
            .record(
                &ctx.origin,
                AuditAction::AppointmentUpdated,
                ctx.actor(),
                json!({ "appointment_id": id, "updated_fields": fields }),
            )
            .await;

        Ok(appointment)
    }

    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        if !self.appointments.delete(id).await? {
            return Err(AppError::not_found("Appointment not found"));
        }

        self.recorder
            .record(
                &ctx.origin,
                AuditAction::AppointmentDeleted,
                ctx.actor(),
                json!({ "appointment_id": id }),
            )
            .await;

        Ok(())
    }

    async fn notify_watchers(&self, appointment: &Appointment) {
        let watchers = match self.users.list_active_by_roles(&BOOKING_WATCHERS).await {
            Ok(users) => users,
            Err(e) => {
                warn!(error = %e, "Failed to load booking notification recipients");
                return;
            }
        };
        if watchers.is_empty() {
            return;
        }

        let items = watchers
            .iter()
            .map(|user| NewNotification {
                user_id: user.id,
                title: "New Appointment".to_string(),
                message: format!(
                    "{} booked an appointment on {} at {}",
                    appointment.name, appointment.date, appointment.time
                ),
                kind: "appointment".to_string(),
            })
            .collect();

        if let Err(e) = self.notifications.insert_many(items).await {
            warn!(
                appointment_id = %appointment.id,
                error = %e,
                "Failed to notify staff about booking"
            );
        }
    }
}

/// Build a listing filter from raw query values; blanks are ignored.
pub fn filter_from_query(
    date: Option<String>,
    doctor: Option<String>,
    status: Option<String>,
) -> AppResult<AppointmentFilter> {
    Ok(AppointmentFilter {
        date: non_blank(date).map(|d| parse_date(&d)).transpose()?,
        doctor_id: non_blank(doctor)
            .map(|d| validation::parse_id(&d))
            .transpose()?,
        status: non_blank(status)
            .map(|s| s.parse::<AppointmentStatus>())
            .transpose()?,
    })
}

fn validate_changes(req: UpdateAppointmentRequest) -> AppResult<AppointmentChanges> {
    let name = match req.name {
        Some(name) => Some(required("name", Some(&name))?.to_string()),
        None => None,
    };
    let phone = match req.phone {
        Some(phone) => {
            let phone = required("phone", Some(&phone))?.to_string();
            validation::require_phone(&phone)?;
            Some(phone)
        }
        None => None,
    };
    let email = match req.email {
        Some(email) => {
            let email = required("email", Some(&email))?.to_string();
            validation::require_email(&email)?;
            Some(email)
        }
        None => None,
    };

    Ok(AppointmentChanges {
        name,
        phone,
        email,
        date: req.date.as_deref().map(parse_date).transpose()?,
        time: req.time.as_deref().map(parse_time).transpose()?,
        status: req
            .status
            .as_deref()
            .map(|s| s.trim().parse::<AppointmentStatus>())
            .transpose()?,
        doctor_id: req
            .doctor_id
            .as_deref()
            .map(validation::parse_id)
            .transpose()?,
        notes: req.notes,
    })
}

fn changed_fields(changes: &AppointmentChanges) -> Vec<&'static str> {
    [
        ("name", changes.name.is_some()),
        ("phone", changes.phone.is_some()),
        ("email", changes.email.is_some()),
        ("date", changes.date.is_some()),
        ("time", changes.time.is_some()),
        ("status", changes.status.is_some()),
        ("doctorId", changes.doctor_id.is_some()),
        ("notes", changes.notes.is_some()),
    ]
    .into_iter()
    .filter_map(|(field, set)| set.then_some(field))
    .collect()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;
    use clinichub_core::error::ErrorKind;
    use clinichub_database::Stores;
    use clinichub_entity::appointment::SLOT_TAKEN_MESSAGE;
    use clinichub_entity::user::CreateUser;

    use super::*;

    fn service(stores: &Stores) -> AppointmentService {
        AppointmentService::new(
            stores.appointments.clone(),
            stores.users.clone(),
            stores.notifications.clone(),
            AuditRecorder::new(stores.audit.clone(), Duration::from_secs(1)),
        )
    }

    fn booking(date: &str, time: &str) -> BookingRequest {
        BookingRequest {
            name: Some("Ada Lovelace".into()),
            phone: Some("+15551234567".into()),
            email: Some("ada@example.com".into()),
            date: Some(date.into()),
            time: Some(time.into()),
            ..Default::default()
        }
    }

    fn staff_ctx() -> RequestContext {
        RequestContext {
            user_id: Uuid::new_v4(),
            email: "desk@clinic.test".into(),
            name: "Desk".into(),
            role: UserRole::Receptionist,
            origin: RequestOrigin::default(),
            request_time: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_double_booking_conflicts() {
        let stores = Stores::in_memory();
        let appointments = service(&stores);
        let origin = RequestOrigin::default();

        let receipt = appointments
            .book(&origin, booking("2025-01-01", "10:00"))
            .await
            .unwrap();
        assert_eq!(receipt.appointment.status, AppointmentStatus::Pending);

        let err = appointments
            .book(&origin, booking("2025-01-01", "10:00"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.message, SLOT_TAKEN_MESSAGE);
    }

    #[tokio::test]
    async fn test_required_fields_in_order() {
        let stores = Stores::in_memory();
        let appointments = service(&stores);
        let origin = RequestOrigin::default();

        let mut req = booking("2025-01-01", "10:00");
        req.phone = None;
        req.date = None;
        assert_eq!(
            appointments.book(&origin, req).await.unwrap_err().message,
            "phone is required"
        );

        let mut req = booking("2025-01-01", "10:00");
        req.phone = Some("call me".into());
        assert_eq!(
            appointments.book(&origin, req).await.unwrap_err().message,
            "Invalid phone number format"
        );

        assert_eq!(
            appointments
                .book(&origin, booking("01/01/2025", "10:00"))
                .await
                .unwrap_err()
                .message,
            "Invalid date format. Use YYYY-MM-DD"
        );
    }

    #[tokio::test]
    async fn test_booking_notifies_admins_and_receptionists() {
        let stores = Stores::in_memory();
        let mut ids = Vec::new();
        for (email, role) in [
            ("admin@clinic.test", UserRole::Admin),
            ("desk@clinic.test", UserRole::Receptionist),
            ("nurse@clinic.test", UserRole::Nurse),
        ] {
            let user = stores
                .users
                .create(&CreateUser {
                    email: email.into(),
                    name: email.into(),
                    password_hash: "x".into(),
                    role,
                    is_active: true,
                })
                .await
                .unwrap();
            ids.push(user.id);
        }

        service(&stores)
            .book(&RequestOrigin::default(), booking("2025-02-03", "09:30"))
            .await
            .unwrap();

        assert_eq!(stores.notifications.unread_for(ids[0], 50).await.unwrap().len(), 1);
        assert_eq!(stores.notifications.unread_for(ids[1], 50).await.unwrap().len(), 1);
        assert!(stores.notifications.unread_for(ids[2], 50).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let stores = Stores::in_memory();
        let appointments = service(&stores);
        let ctx = staff_ctx();

        let first = appointments
            .book(&ctx.origin, booking("2025-01-01", "10:00"))
            .await
            .unwrap();
        let second = appointments
            .book(&ctx.origin, booking("2025-01-01", "11:00"))
            .await
            .unwrap();

        let moved = appointments
            .update(
                &ctx,
                second.appointment_id,
                UpdateAppointmentRequest {
                    time: Some("10:00".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(moved.kind, ErrorKind::Conflict);

        let confirmed = appointments
            .update(
                &ctx,
                first.appointment_id,
                UpdateAppointmentRequest {
                    status: Some("confirmed".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(confirmed.status, AppointmentStatus::Confirmed);
        assert_eq!(confirmed.time, "10:00");

        appointments.delete(&ctx, first.appointment_id).await.unwrap();
        assert_eq!(
            appointments
                .delete(&ctx, first.appointment_id)
                .await
                .unwrap_err()
                .message,
            "Appointment not found"
        );
    }

    #[test]
    fn test_filter_from_query() {
        let filter = filter_from_query(Some("2025-01-01".into()), Some(String::new()), None).unwrap();
        assert!(filter.date.is_some());
        assert!(filter.doctor_id.is_none());
        assert!(filter_from_query(None, None, Some("lost".into())).is_err());
    }
}

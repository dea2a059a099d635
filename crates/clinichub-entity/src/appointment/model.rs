//! Appointment entity model.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clinichub_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::AppointmentStatus;

/// Conflict message for a double-booked slot.
pub const SLOT_TAKEN_MESSAGE: &str =
    "This time slot is already booked. Please choose another time.";

/// A booked appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: String,
    /// Calendar day of the visit.
    pub date: NaiveDate,
    /// Slot start, `HH:MM`.
    pub time: String,
    pub status: AppointmentStatus,
    /// Assigned doctor, if any.
    pub doctor_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Whether this appointment occupies the given slot.
    pub fn occupies(&self, date: NaiveDate, time: &str) -> bool {
        self.status.holds_slot() && self.date == date && self.time == time
    }

    /// Apply validated changes and stamp a strictly later `updated_at`.
    pub fn apply(&mut self, changes: AppointmentChanges, now: DateTime<Utc>) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(phone) = changes.phone {
            self.phone = phone;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(date) = changes.date {
            self.date = date;
        }
        if let Some(time) = changes.time {
            self.time = time;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(doctor_id) = changes.doctor_id {
            self.doctor_id = Some(doctor_id);
        }
        if let Some(notes) = changes.notes {
            self.notes = Some(notes);
        }
        self.updated_at = crate::patient::model::next_update_stamp(self.updated_at, now);
    }
}

/// Validated data for booking an appointment.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub date: NaiveDate,
    pub time: String,
    pub doctor_id: Option<Uuid>,
    pub notes: Option<String>,
}

impl NewAppointment {
    /// Materialize a pending appointment.
    pub fn into_appointment(self, now: DateTime<Utc>) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            name: self.name,
            phone: self.phone,
            email: self.email,
            date: self.date,
            time: self.time,
            status: AppointmentStatus::Pending,
            doctor_id: self.doctor_id,
            notes: self.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Validated partial update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct AppointmentChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub doctor_id: Option<Uuid>,
    pub notes: Option<String>,
}

impl AppointmentChanges {
    /// Whether the update moves the appointment to a different slot.
    pub fn moves_slot(&self) -> bool {
        self.date.is_some() || self.time.is_some()
    }
}

/// Filters for appointment listings.
#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub date: Option<NaiveDate>,
    pub doctor_id: Option<Uuid>,
    pub status: Option<AppointmentStatus>,
}

impl AppointmentFilter {
    pub fn matches(&self, appointment: &Appointment) -> bool {
        self.date.is_none_or(|d| appointment.date == d)
            && self.doctor_id.is_none_or(|d| appointment.doctor_id == Some(d))
            && self.status.is_none_or(|s| appointment.status == s)
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::invalid_input("Invalid date format. Use YYYY-MM-DD"))
}

/// Parse an `HH:MM` time and return it in canonical zero-padded form.
pub fn parse_time(raw: &str) -> AppResult<String> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| AppError::invalid_input("Invalid time format. Use HH:MM"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking() -> Appointment {
        NewAppointment {
            name: "Ada".into(),
            phone: "+15551234567".into(),
            email: "ada@example.com".into(),
            date: parse_date("2025-01-01").unwrap(),
            time: parse_time("10:00").unwrap(),
            doctor_id: None,
            notes: None,
        }
        .into_appointment(Utc::now())
    }

    #[test]
    fn test_parse_date_and_time() {
        assert!(parse_date("2025-13-01").is_err());
        assert!(parse_date("01/01/2025").is_err());
        assert_eq!(parse_time("9:05").unwrap(), "09:05");
        assert!(parse_time("25:00").is_err());
    }

    #[test]
    fn test_cancelled_frees_slot() {
        let mut appointment = booking();
        let date = appointment.date;
        assert!(appointment.occupies(date, "10:00"));

        appointment.apply(
            AppointmentChanges {
                status: Some(AppointmentStatus::Cancelled),
                ..Default::default()
            },
            Utc::now(),
        );
        assert!(!appointment.occupies(date, "10:00"));
    }

    #[test]
    fn test_filter() {
        let appointment = booking();
        let pending = AppointmentFilter {
            status: Some(AppointmentStatus::Pending),
            ..Default::default()
        };
        let other_day = AppointmentFilter {
            date: Some(parse_date("2025-01-02").unwrap()),
            ..Default::default()
        };
        assert!(pending.matches(&appointment));
        assert!(!other_day.matches(&appointment));
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(booking()).unwrap();
        assert_eq!(json["date"], "2025-01-01");
        assert_eq!(json["status"], "pending");
        assert!(json.get("doctorId").is_some());
        assert!(json.get("createdAt").is_some());
    }
}

//! Appointment entities.

pub mod model;
pub mod status;

pub use model::{
    Appointment, AppointmentChanges, AppointmentFilter, NewAppointment, SLOT_TAKEN_MESSAGE,
    parse_date, parse_time,
};
pub use status::AppointmentStatus;

//! Appointment booking and management.

pub mod service;

pub use service::{
    AppointmentService, BookingReceipt, BookingRequest, UpdateAppointmentRequest, filter_from_query,
};

//! Pharmacy prescriptions.

pub mod service;

pub use service::{Medication, PharmacyService, Prescription, PrescriptionQuery};

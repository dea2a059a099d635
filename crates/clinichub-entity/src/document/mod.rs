//! Patient document metadata.

pub mod model;

pub use model::{NewPatientDocument, PatientDocument};

//! Patient record entities.

pub mod criteria;
pub mod model;

pub use criteria::{AgeRange, PatientCriteria};
pub use model::{Attributes, Patient, RESERVED_KEYS, SEARCH_FIELDS, sanitize_attributes};

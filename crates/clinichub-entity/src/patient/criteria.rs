//! Advanced patient search criteria.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::model::Patient;

/// Inclusive age bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgeRange {
    pub min: f64,
    pub max: f64,
}

impl Default for AgeRange {
    fn default() -> Self {
        Self { min: 0.0, max: 120.0 }
    }
}

/// Validated criteria for `POST /api/search/advanced`. Empty strings are
/// normalized to `None` before this is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientCriteria {
    /// Substring of firstName or lastName.
    pub name: Option<String>,
    /// Substring of email.
    pub email: Option<String>,
    /// Substring of phone.
    pub phone: Option<String>,
    /// Exact status.
    pub status: Option<String>,
    /// Exact gender.
    pub gender: Option<String>,
    /// Bounds on the `age` attribute.
    pub age_range: Option<AgeRange>,
    /// Matches when any listed condition appears in `medicalHistory`.
    pub medical_history: Vec<String>,
    /// Inclusive bounds on `createdAt`.
    pub created_between: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl PatientCriteria {
    /// In-process evaluation of the criteria.
    pub fn matches(&self, patient: &Patient) -> bool {
        let contains = |field: &str, needle: &str| {
            patient
                .text(field)
                .is_some_and(|v| v.to_lowercase().contains(&needle.to_lowercase()))
        };

        if let Some(name) = &self.name {
            if !contains("firstName", name) && !contains("lastName", name) {
                return false;
            }
        }
        if let Some(email) = &self.email {
            if !contains("email", email) {
                return false;
            }
        }
        if let Some(phone) = &self.phone {
            if !contains("phone", phone) {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if patient.text("status") != Some(status.as_str()) {
                return false;
            }
        }
        if let Some(gender) = &self.gender {
            if patient.text("gender") != Some(gender.as_str()) {
                return false;
            }
        }
        if let Some(range) = self.age_range {
            match patient.number("age") {
                Some(age) if age >= range.min && age <= range.max => {}
                _ => return false,
            }
        }
        if !self.medical_history.is_empty() {
            let history: Vec<&str> = match patient.attributes.get("medicalHistory") {
                Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
                _ => Vec::new(),
            };
            if !self.medical_history.iter().any(|c| history.contains(&c.as_str())) {
                return false;
            }
        }
        if let Some((start, end)) = self.created_between {
            if patient.created_at < start || patient.created_at > end {
                return false;
            }
        }
        true
    }
}

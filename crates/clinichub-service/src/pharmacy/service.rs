//! Prescription queue served from fixtures; there is no dispensing backend.

use serde::Serialize;

use clinichub_core::types::{Page, PageRequest};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Medication {
    pub name: &'static str,
    pub dosage: &'static str,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    #[serde(rename = "_id")]
    pub id: &'static str,
    pub patient_name: &'static str,
    pub patient_id: &'static str,
    pub doctor_name: &'static str,
    pub medications: Vec<Medication>,
    pub status: &'static str,
    pub prescribed_date: &'static str,
    pub pickup_date: Option<&'static str>,
    pub total_amount: f64,
}

/// Filters for the prescription listing.
#[derive(Debug, Clone, Default)]
pub struct PrescriptionQuery {
    /// Exact status.
    pub status: Option<String>,
    /// Case-insensitive substring of patient or doctor name.
    pub search: Option<String>,
}

impl PrescriptionQuery {
    fn matches(&self, prescription: &Prescription) -> bool {
        let status_ok = self
            .status
            .as_deref()
            .is_none_or(|s| s.is_empty() || prescription.status == s);
        let search_ok = self.search.as_deref().is_none_or(|needle| {
            let needle = needle.to_lowercase();
            prescription.patient_name.to_lowercase().contains(&needle)
                || prescription.doctor_name.to_lowercase().contains(&needle)
        });
        status_ok && search_ok
    }
}

/// Serves the prescription queue.
#[derive(Debug, Clone, Default)]
pub struct PharmacyService;

impl PharmacyService {
    pub fn new() -> Self {
        Self
    }

    /// Filtered, paginated fixture prescriptions.
    pub fn prescriptions(&self, query: &PrescriptionQuery, page: &PageRequest) -> Page<Prescription> {
        let matching: Vec<Prescription> = fixtures()
            .into_iter()
            .filter(|p| query.matches(p))
            .collect();
        let total = matching.len() as u64;
        Page::new(page.slice(matching), page, total)
    }
}

fn fixtures() -> Vec<Prescription> {
    vec![
        Prescription {
            id: "1",
            patient_name: "John Doe",
            patient_id: "P001",
            doctor_name: "Dr. Smith",
            medications: vec![
                Medication {
                    name: "Metformin 500mg",
                    dosage: "Twice daily",
                    quantity: 30,
                },
                Medication {
                    name: "Lisinopril 10mg",
                    dosage: "Once daily",
                    quantity: 30,
                },
            ],
            status: "pending",
            prescribed_date: "2024-01-15",
            pickup_date: None,
            total_amount: 45.99,
        },
        Prescription {
            id: "2",
            patient_name: "Jane Smith",
            patient_id: "P002",
            doctor_name: "Dr. Johnson",
            medications: vec![Medication {
                name: "Atorvastatin 20mg",
                dosage: "Once daily",
                quantity: 30,
            }],
            status: "ready",
            prescribed_date: "2024-01-14",
            pickup_date: Some("2024-01-16"),
            total_amount: 25.50,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_filter() {
        let page = PharmacyService::new().prescriptions(
            &PrescriptionQuery {
                status: Some("ready".into()),
                search: None,
            },
            &PageRequest::default(),
        );
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].patient_name, "Jane Smith");
    }

    #[test]
    fn test_search_covers_doctor_name() {
        let page = PharmacyService::new().prescriptions(
            &PrescriptionQuery {
                status: None,
                search: Some("smith".into()),
            },
            &PageRequest::default(),
        );
        // Patient "Jane Smith" and "Dr. Smith".
        assert_eq!(page.total, 2);
    }

    #[test]
    fn test_pagination() {
        let page = PharmacyService::new()
            .prescriptions(&PrescriptionQuery::default(), &PageRequest::new(2, 1));
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, "2");
        assert_eq!(page.total_pages, 2);
    }
}

//! Advanced patient search.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use clinichub_core::{AppError, AppResult};
use clinichub_database::PatientStore;
use clinichub_entity::patient::{AgeRange, Patient, PatientCriteria};

use crate::validation::non_blank;

/// Upper bound on advanced search results.
pub const SEARCH_LIMIT: u64 = 100;

/// Optional age bounds; omitted ends default to 0 and 120.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgeRangeInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// Inclusive creation-time bounds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateRangeInput {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Body of `POST /api/search/advanced`; echoed back as `query`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdvancedSearchRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_range: Option<AgeRangeInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRangeInput>,
}

impl AdvancedSearchRequest {
    /// Validate and normalize into store criteria.
    pub fn to_criteria(&self) -> AppResult<PatientCriteria> {
        let age_range = self.age_range.as_ref().map(|range| {
            let defaults = AgeRange::default();
            AgeRange {
                min: range.min.unwrap_or(defaults.min),
                max: range.max.unwrap_or(defaults.max),
            }
        });

        let created_between = match &self.date_range {
            None => None,
            Some(range) => {
                let (Some(start), Some(end)) = (range.start.as_deref(), range.end.as_deref())
                else {
                    return Err(AppError::invalid_input(
                        "date_range requires both start and end",
                    ));
                };
                Some((parse_bound(start, false)?, parse_bound(end, true)?))
            }
        };

        Ok(PatientCriteria {
            name: non_blank(self.name.clone()),
            email: non_blank(self.email.clone()),
            phone: non_blank(self.phone.clone()),
            status: non_blank(self.status.clone()),
            gender: non_blank(self.gender.clone()),
            age_range,
            medical_history: self
                .medical_history
                .iter()
                .flatten()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
            created_between,
        })
    }
}

/// RFC 3339 instant, or a bare date covering the whole day.
fn parse_bound(raw: &str, end_of_day: bool) -> AppResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        AppError::invalid_input("Invalid date_range: use RFC 3339 or YYYY-MM-DD")
    })?;
    let time = if end_of_day {
        NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)
    } else {
        Some(NaiveTime::MIN)
    };
    time.map(|t| date.and_time(t).and_utc())
        .ok_or_else(|| AppError::internal("Invalid end-of-day time"))
}

/// Result of an advanced search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub patients: Vec<Patient>,
    pub total: usize,
    pub query: AdvancedSearchRequest,
}

/// Runs advanced patient searches.
#[derive(Clone)]
pub struct SearchService {
    patients: Arc<dyn PatientStore>,
}

impl std::fmt::Debug for SearchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchService").finish_non_exhaustive()
    }
}

impl SearchService {
    pub fn new(patients: Arc<dyn PatientStore>) -> Self {
        Self { patients }
    }

    /// At most [`SEARCH_LIMIT`] matches, newest first.
    pub async fn search(&self, query: AdvancedSearchRequest) -> AppResult<SearchResult> {
        let criteria = query.to_criteria()?;
        let patients = self.patients.search(&criteria, SEARCH_LIMIT).await?;
        Ok(SearchResult {
            total: patients.len(),
            patients,
            query,
        })
    }
}

#[cfg(test)]
mod tests {
    use clinichub_database::Stores;
    use serde_json::{Value, json};

    use super::*;

    async fn seed(stores: &Stores, attrs: Value) {
        let Value::Object(map) = attrs else {
            unreachable!()
        };
        stores.patients.insert(&Patient::new(map, Utc::now())).await.unwrap();
    }

    #[test]
    fn test_age_range_defaults() {
        let request: AdvancedSearchRequest =
            serde_json::from_value(json!({"age_range": {"min": 30}})).unwrap();
        let criteria = request.to_criteria().unwrap();
        assert_eq!(criteria.age_range, Some(AgeRange { min: 30.0, max: 120.0 }));
    }

    #[test]
    fn test_date_range_forms() {
        let request: AdvancedSearchRequest = serde_json::from_value(json!({
            "date_range": {"start": "2025-01-01", "end": "2025-01-31T12:00:00Z"}
        }))
        .unwrap();
        let (start, end) = request.to_criteria().unwrap().created_between.unwrap();
        assert_eq!(start.to_rfc3339(), "2025-01-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2025-01-31T12:00:00+00:00");

        let bad: AdvancedSearchRequest =
            serde_json::from_value(json!({"date_range": {"start": "yesterday", "end": "today"}}))
                .unwrap();
        assert!(bad.to_criteria().is_err());
    }

    #[tokio::test]
    async fn test_search_echoes_query() {
        let stores = Stores::in_memory();
        seed(&stores, json!({"firstName": "Grace", "gender": "female"})).await;
        seed(&stores, json!({"firstName": "Alan", "gender": "male"})).await;

        let result = SearchService::new(stores.patients.clone())
            .search(AdvancedSearchRequest {
                gender: Some("female".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.patients[0].text("firstName"), Some("Grace"));
        assert_eq!(
            serde_json::to_value(&result.query).unwrap(),
            json!({"gender": "female"})
        );
    }
}

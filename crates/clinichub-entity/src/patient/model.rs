//! Patient entity model.
//!
//! A patient is an open attribute map. Only the identifier and the two
//! timestamps are owned by the server.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Free-form patient attributes.
pub type Attributes = serde_json::Map<String, Value>;

/// Keys owned by the server; client-supplied values are dropped.
pub const RESERVED_KEYS: [&str; 4] = ["id", "_id", "createdAt", "updatedAt"];

/// Attributes covered by the listing `search` parameter.
pub const SEARCH_FIELDS: [&str; 4] = ["firstName", "lastName", "email", "phone"];

/// A patient record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Unique patient identifier.
    pub id: Uuid,
    /// Client-defined attributes.
    #[serde(flatten)]
    pub attributes: Attributes,
    /// Set once on create.
    pub created_at: DateTime<Utc>,
    /// Strictly increases on every update.
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    /// Build a new patient from client attributes.
    pub fn new(attributes: Attributes, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            attributes: sanitize_attributes(attributes),
            created_at: now,
            updated_at: now,
        }
    }

    /// A string-valued attribute.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// A numeric attribute; numeric strings are accepted.
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.attributes.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Case-insensitive substring match over [`SEARCH_FIELDS`].
    pub fn matches_search(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let needle = needle.to_lowercase();
        SEARCH_FIELDS
            .iter()
            .filter_map(|field| self.text(field))
            .any(|value| value.to_lowercase().contains(&needle))
    }

    /// Merge a partial update and stamp a strictly later `updated_at`.
    pub fn merge(&mut self, changes: Attributes, now: DateTime<Utc>) {
        for (key, value) in sanitize_attributes(changes) {
            self.attributes.insert(key, value);
        }
        self.updated_at = next_update_stamp(self.updated_at, now);
    }

    /// Ascending comparison on a sort field.
    pub fn compare_by(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "createdAt" => self.created_at.cmp(&other.created_at),
            "updatedAt" => self.updated_at.cmp(&other.updated_at),
            _ => {
                let left = self.attributes.get(field).map(sort_key);
                let right = other.attributes.get(field).map(sort_key);
                left.cmp(&right)
            }
        }
    }
}

/// Text key matching Postgres `data->>'field'` ordering of scalars.
fn sort_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Strip server-owned keys from client input.
pub fn sanitize_attributes(mut attributes: Attributes) -> Attributes {
    for key in RESERVED_KEYS {
        attributes.remove(key);
    }
    attributes
}

/// `max(now, previous + 1µs)`.
pub fn next_update_stamp(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    let floor = previous + chrono::Duration::microseconds(1);
    if now > floor { now } else { floor }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: Value) -> Attributes {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_reserved_keys_are_ignored_on_create() {
        let now = Utc::now();
        let patient = Patient::new(
            attrs(json!({
                "firstName": "Ada",
                "id": "client-id",
                "_id": "legacy",
                "createdAt": "1999-01-01T00:00:00Z"
            })),
            now,
        );
        assert_eq!(patient.created_at, now);
        assert!(!patient.attributes.contains_key("id"));
        assert!(!patient.attributes.contains_key("_id"));
        assert!(!patient.attributes.contains_key("createdAt"));
        assert_eq!(patient.text("firstName"), Some("Ada"));
    }

    #[test]
    fn test_merge_touches_only_supplied_fields() {
        let created = Utc::now();
        let mut patient = Patient::new(
            attrs(json!({"firstName": "Ada", "lastName": "Lovelace", "age": 36})),
            created,
        );
        let before = patient.clone();

        // Same instant as creation still strictly advances updated_at.
        patient.merge(attrs(json!({"lastName": "King"})), created);

        assert!(patient.updated_at > before.updated_at);
        assert_eq!(patient.created_at, before.created_at);
        assert_eq!(patient.text("lastName"), Some("King"));
        assert_eq!(patient.attributes["firstName"], before.attributes["firstName"]);
        assert_eq!(patient.attributes["age"], before.attributes["age"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let patient = Patient::new(
            attrs(json!({"firstName": "Grace", "email": "grace@navy.mil", "phone": "+15551234"})),
            Utc::now(),
        );
        assert!(patient.matches_search("GRA"));
        assert!(patient.matches_search("navy"));
        assert!(patient.matches_search("5551"));
        assert!(!patient.matches_search("hopper"));
    }

    #[test]
    fn test_serializes_flat() {
        let patient = Patient::new(attrs(json!({"firstName": "Ada"})), Utc::now());
        let json = serde_json::to_value(&patient).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert!(json.get("id").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("attributes").is_none());
    }
}

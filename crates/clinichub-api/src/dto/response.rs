//! Response envelopes.

use serde::Serialize;
use serde_json::{Map, Value, json};

use clinichub_core::error::AppError;
use clinichub_core::types::Page;

/// List envelope `{<key>: [...], total, page, limit, totalPages}`.
pub fn paged<T: Serialize>(key: &str, page: Page<T>) -> Result<Value, AppError> {
    let mut body = Map::new();
    body.insert(key.to_string(), serde_json::to_value(page.items)?);
    body.insert("total".into(), json!(page.total));
    body.insert("page".into(), json!(page.page));
    body.insert("limit".into(), json!(page.limit));
    body.insert("totalPages".into(), json!(page.total_pages));
    Ok(Value::Object(body))
}

/// `{message}` body.
pub fn message(text: &str) -> Value {
    json!({ "message": text })
}

#[cfg(test)]
mod tests {
    use clinichub_core::types::PageRequest;

    use super::*;

    #[test]
    fn test_paged_envelope_uses_resource_key() {
        let request = PageRequest::new(2, 10);
        let page = Page::new(vec!["a", "b"], &request, 12);
        let body = paged("logs", page).unwrap();

        assert_eq!(body["logs"], json!(["a", "b"]));
        assert_eq!(body["total"], 12);
        assert_eq!(body["page"], 2);
        assert_eq!(body["limit"], 10);
        assert_eq!(body["totalPages"], 2);
        assert!(body.get("items").is_none());
    }
}

//! Listing query parameters shared by the paginated endpoints.

use serde::Deserialize;

use clinichub_core::types::{PageRequest, SortDirection, SortField};

/// `page`, `limit`, `search`, `sortBy` and `sortOrder`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    /// Page number (1-based, default: 1).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page (default: 10, max: 100).
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub search: String,
    pub sort_by: Option<String>,
    /// "asc" or "desc".
    pub sort_order: Option<String>,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    10
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            search: String::new(),
            sort_by: None,
            sort_order: None,
        }
    }
}

impl ListParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }

    /// Anything other than `asc` sorts descending.
    pub fn sort(&self) -> SortField {
        let direction = match self.sort_order.as_deref() {
            Some(order) if order.eq_ignore_ascii_case("asc") => SortDirection::Asc,
            _ => SortDirection::Desc,
        };
        let field = self
            .sort_by
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .unwrap_or("createdAt");
        SortField::new(field, direction)
    }

    pub fn search(&self) -> &str {
        self.search.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params: ListParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.page_request(), PageRequest::new(1, 10));
        assert_eq!(params.sort(), SortField::desc("createdAt"));
        assert_eq!(params.search(), "");
    }

    #[test]
    fn test_sort_and_clamping() {
        let params: ListParams = serde_json::from_str(
            r#"{"page":0,"limit":500,"sortBy":"lastName","sortOrder":"ASC","search":" ann "}"#,
        )
        .unwrap();
        assert_eq!(params.page_request(), PageRequest::new(1, 100));
        assert_eq!(params.sort(), SortField::asc("lastName"));
        assert_eq!(params.search(), "ann");
    }
}

//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size.
pub const DEFAULT_PAGE_SIZE: u64 = 10;
/// Maximum page size.
pub const MAX_PAGE_SIZE: u64 = 100;
/// Highest page number; keeps `offset()` within a Postgres `BIGINT`.
pub const MAX_PAGE: u64 = i64::MAX as u64 / MAX_PAGE_SIZE;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub limit: u64,
}

impl PageRequest {
    /// Create a new page request, clamping both values into range.
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.clamp(1, MAX_PAGE),
            limit: limit.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Calculate the SQL `OFFSET` value.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Return the SQL `LIMIT` value.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// `OFFSET` as a bind parameter, saturating at `i64::MAX`.
    pub fn sql_offset(&self) -> i64 {
        i64::try_from(self.offset()).unwrap_or(i64::MAX)
    }

    /// `LIMIT` as a bind parameter.
    pub fn sql_limit(&self) -> i64 {
        i64::try_from(self.limit).unwrap_or(i64::MAX)
    }

    /// Apply this page window to an already filtered and sorted list.
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(usize::try_from(self.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(self.limit).unwrap_or(usize::MAX))
            .collect()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results together with the totals needed by list envelopes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Total number of matching items across all pages.
    pub total: u64,
    /// Current page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub limit: u64,
    /// `ceil(total / limit)`; zero when nothing matched.
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Create a new page.
    pub fn new(items: Vec<T>, request: &PageRequest, total: u64) -> Self {
        Self {
            items,
            total,
            page: request.page,
            limit: request.limit,
            total_pages: total.div_ceil(request.limit.max(1)),
        }
    }

    /// Transform the items while keeping the totals.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::new(1, 10).offset(), 0);
        assert_eq!(PageRequest::new(3, 10).offset(), 20);
        assert_eq!(PageRequest::new(0, 10).offset(), 0);
    }

    #[test]
    fn test_huge_page_is_clamped() {
        let request = PageRequest::new(u64::MAX / 10, 100);
        assert_eq!(request.page, MAX_PAGE);
        assert!(i64::try_from(request.offset()).is_ok());
        assert!(request.slice(vec![1, 2, 3]).is_empty());

        let unclamped = PageRequest {
            page: u64::MAX,
            limit: MAX_PAGE_SIZE,
        };
        assert_eq!(unclamped.offset(), u64::MAX);
        assert_eq!(unclamped.sql_offset(), i64::MAX);
        assert!(unclamped.slice(vec![1, 2, 3]).is_empty());
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(PageRequest::new(1, 0).limit, 1);
        assert_eq!(PageRequest::new(1, 5000).limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        let request = PageRequest::new(1, 10);
        assert_eq!(Page::new(Vec::<u8>::new(), &request, 25).total_pages, 3);
        assert_eq!(Page::new(Vec::<u8>::new(), &request, 30).total_pages, 3);
        assert_eq!(Page::new(Vec::<u8>::new(), &request, 0).total_pages, 0);
    }

    #[test]
    fn test_slice_window() {
        let items: Vec<u32> = (0..25).collect();
        let last = PageRequest::new(3, 10).slice(items);
        assert_eq!(last, vec![20, 21, 22, 23, 24]);
    }
}

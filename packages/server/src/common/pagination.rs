//! Page/offset pagination for the bill read endpoints.
//!
//! Page numbers are 1-based. The page size is clamped to [1, 100] regardless
//! of what the caller requests.

use serde::Serialize;

/// Default page size when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Hard cap on page size, applied no matter what was requested.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Validated pagination input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    page: i64,
    limit: i64,
}

impl Page {
    /// Normalize raw query parameters: page >= 1, limit in [1, 100].
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        Self { page, limit }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    /// SQL LIMIT value.
    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// SQL OFFSET value.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Pagination descriptor returned alongside a page of results.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: i64,
    pub limit: i64,
    pub has_more: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
}

impl PageInfo {
    /// Build from the page of results and the total matching the same filter.
    pub fn new(page: &Page, fetched: usize, total: i64) -> Self {
        PageInfo {
            page: page.page(),
            limit: page.limit(),
            has_more: page.offset() + (fetched as i64) < total,
            total: Some(total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults() {
        let page = Page::new(None, None);
        assert_eq!(page.page(), 1);
        assert_eq!(page.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_page_clamps_limit() {
        let page = Page::new(Some(1), Some(500));
        assert_eq!(page.limit(), 100);

        let page = Page::new(Some(1), Some(0));
        assert_eq!(page.limit(), 1);
    }

    #[test]
    fn test_page_clamps_page_number() {
        let page = Page::new(Some(0), Some(20));
        assert_eq!(page.page(), 1);

        let page = Page::new(Some(-3), Some(20));
        assert_eq!(page.page(), 1);
    }

    #[test]
    fn test_page_offset() {
        let page = Page::new(Some(3), Some(20));
        assert_eq!(page.offset(), 40);
    }

    #[test]
    fn test_page_info_has_more() {
        let page = Page::new(Some(1), Some(20));
        let info = PageInfo::new(&page, 20, 45);
        assert!(info.has_more);

        let page = Page::new(Some(3), Some(20));
        let info = PageInfo::new(&page, 5, 45);
        assert!(!info.has_more);
        assert_eq!(info.total, Some(45));
    }
}

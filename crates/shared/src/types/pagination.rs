//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    25
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PageRequest {
    /// Calculates the offset for database queries.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

/// Response wrapper for paginated data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items in the current page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

/// Pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Current page number.
    pub current_page: u32,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of items across all pages.
    pub total_items: u64,
    /// Items per page.
    pub per_page: u32,
}

impl<T> PageResponse<T> {
    /// Creates a new paginated response.
    #[must_use]
    pub fn new(data: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
        let total_pages = if total == 0 {
            1
        } else {
            u32::try_from(total.div_ceil(u64::from(per_page.max(1)))).unwrap_or(u32::MAX)
        };

        Self {
            data,
            meta: PageMeta {
                current_page: page,
                total_pages,
                total_items: total,
                per_page,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_request() {
        let req = PageRequest::default();
        assert_eq!(req.page, 1);
        assert_eq!(req.per_page, 25);
        assert_eq!(req.offset(), 0);
        assert_eq!(req.limit(), 25);
    }

    #[test]
    fn test_offset_calculation() {
        let req = PageRequest {
            page: 3,
            per_page: 10,
        };
        assert_eq!(req.offset(), 20);
    }

    #[test]
    fn test_page_response_meta() {
        let resp = PageResponse::new(vec![1, 2, 3], 1, 25, 100);
        assert_eq!(resp.meta.current_page, 1);
        assert_eq!(resp.meta.total_pages, 4);
        assert_eq!(resp.meta.total_items, 100);
        assert_eq!(resp.meta.per_page, 25);
    }

    #[test]
    fn test_page_response_empty() {
        let resp: PageResponse<i32> = PageResponse::new(vec![], 1, 25, 0);
        assert_eq!(resp.meta.total_pages, 1);
        assert_eq!(resp.meta.total_items, 0);
    }

    #[test]
    fn test_page_response_partial_last_page() {
        let resp = PageResponse::new(vec![1], 5, 25, 101);
        assert_eq!(resp.meta.total_pages, 5);
    }
}

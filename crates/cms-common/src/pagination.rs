//! Pagination parameters and paged results

use serde::{Deserialize, Serialize};

/// Upper bound on page size
pub const MAX_LIMIT: u32 = 100;
/// Page size when none (or garbage) is requested
pub const DEFAULT_LIMIT: u32 = 10;

/// Sanitized page/limit pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    limit: u32,
    offset: usize,
}

impl Pagination {
    /// Sanitize raw values: page is at least 1, limit is clamped to 1..=100
    /// and a zero limit falls back to the default
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let limit = match limit.unwrap_or(DEFAULT_LIMIT) {
            0 => DEFAULT_LIMIT,
            n => n.min(MAX_LIMIT),
        };
        let offset = (page as usize - 1) * limit as usize;
        Self { page, limit, offset }
    }

    /// Build from an offset/limit pair (content listing style)
    pub fn from_offset(offset: u32, limit: Option<u32>) -> Self {
        let base = Self::new(None, limit);
        Self {
            page: offset / base.limit + 1,
            limit: base.limit,
            offset: offset as usize,
        }
    }

    /// 1-based page number
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Page size
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items to skip
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Paging metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Matching items across all pages
    pub total: u64,
    /// Current page
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// ceil(total / limit)
    pub total_pages: u64,
}

/// A page of results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page
    pub data: Vec<T>,
    /// Paging metadata
    pub meta: PageMeta,
}

impl<T> Page<T> {
    /// Assemble a page from its items and the unpaged total
    pub fn new(data: Vec<T>, total: u64, pagination: Pagination) -> Self {
        let limit = u64::from(pagination.limit());
        Self {
            data,
            meta: PageMeta {
                total,
                page: pagination.page(),
                limit: pagination.limit(),
                total_pages: total.div_ceil(limit),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize() {
        let p = Pagination::new(Some(0), Some(500));
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 100);

        let p = Pagination::new(None, Some(0));
        assert_eq!(p.limit(), DEFAULT_LIMIT);

        let p = Pagination::new(Some(3), Some(20));
        assert_eq!(p.offset(), 40);
    }

    #[test]
    fn test_from_offset() {
        let p = Pagination::from_offset(25, Some(10));
        assert_eq!(p.page(), 3);
        assert_eq!(p.offset(), 25);
    }

    #[test]
    fn test_page_meta() {
        let page = Page::new(vec![1, 2, 3], 21, Pagination::new(Some(1), Some(10)));
        assert_eq!(page.meta.total_pages, 3);
        assert_eq!(page.meta.page, 1);
        assert_eq!(page.data, vec![1, 2, 3]);
    }
}

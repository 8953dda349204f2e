//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_NUMBER, MAX_PAGE_SIZE};

/// Pagination query parameters, `page` is 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number, starting at 0
    #[serde(default = "default_page")]
    #[param(example = 0)]
    pub page: u64,
    /// Items per page (1..=100)
    #[serde(default = "default_size")]
    #[param(example = 10)]
    pub size: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    pub fn new(page: u64, size: u64) -> Self {
        Self { page, size }
    }

    /// Get limit clamped to 1..=MAX_PAGE_SIZE
    pub fn limit(&self) -> u64 {
        self.size.clamp(1, MAX_PAGE_SIZE)
    }

    /// Page number capped at MAX_PAGE_NUMBER
    pub fn number(&self) -> u64 {
        self.page.min(MAX_PAGE_NUMBER)
    }

    /// Calculate offset for database query
    pub fn offset(&self) -> u64 {
        self.number() * self.limit()
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Page of results as returned by services
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationMeta {
    /// Requested page size (after clamping)
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
    /// Current page number (0-indexed)
    pub number: u64,
}

impl PaginationMeta {
    pub fn has_next(&self) -> bool {
        self.number.saturating_add(1) < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.number > 0
    }

    /// Index of the last page, 0 for an empty collection
    pub fn last_page(&self) -> u64 {
        self.total_pages.saturating_sub(1)
    }
}

impl<T> Paginated<T> {
    /// Create new paginated result
    pub fn new(data: Vec<T>, params: &PaginationParams, total: u64) -> Self {
        let size = params.limit();
        let total_pages = total.div_ceil(size);

        Self {
            data,
            meta: PaginationMeta {
                size,
                total_elements: total,
                total_pages,
                number: params.number(),
            },
        }
    }

    /// Convert the items, keeping the metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PaginationParams::default();
        assert_eq!(params.page, 0);
        assert_eq!(params.limit(), 10);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(PaginationParams::new(0, 0).limit(), 1);
        assert_eq!(PaginationParams::new(0, 1000).limit(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_offset_uses_clamped_limit() {
        assert_eq!(PaginationParams::new(3, 10).offset(), 30);
        assert_eq!(PaginationParams::new(2, 500).offset(), 200);
    }

    #[test]
    fn test_meta_navigation() {
        let page: Paginated<u8> = Paginated::new(vec![0; 10], &PaginationParams::new(0, 10), 25);
        assert_eq!(page.meta.total_pages, 3);
        assert!(page.meta.has_next());
        assert!(!page.meta.has_prev());
        assert_eq!(page.meta.last_page(), 2);
    }

    #[test]
    fn test_huge_page_number_is_capped() {
        let params = PaginationParams::new(u64::MAX, 10);
        assert_eq!(params.number(), MAX_PAGE_NUMBER);
        assert!(params.offset() <= i64::MAX as u64);

        let page: Paginated<u8> = Paginated::new(vec![], &params, 5);
        assert_eq!(page.meta.number, MAX_PAGE_NUMBER);
        assert!(!page.meta.has_next());
        assert!(page.meta.has_prev());
    }

    #[test]
    fn test_empty_collection() {
        let page: Paginated<u8> = Paginated::new(vec![], &PaginationParams::default(), 0);
        assert_eq!(page.meta.total_pages, 0);
        assert!(!page.meta.has_next());
        assert_eq!(page.meta.last_page(), 0);
    }
}

//! Page/offset arithmetic and the paginated response shape shared by the
//! repository and the API surface.

use serde::Serialize;

use super::DomainError;

/// Validated pagination parameters: page >= 1, page size 1..=100.
#[derive(Debug, Clone, Copy)]
pub struct PaginationParams {
    page: u64,
    page_size: u64,
}

impl PaginationParams {
    pub const MAX_PAGE_SIZE: u64 = 100;

    pub fn new(page: u64, page_size: u64) -> Result<Self, DomainError> {
        if page < 1 {
            return Err(DomainError::Validation("page must be >= 1".to_string()));
        }
        if page_size < 1 || page_size > Self::MAX_PAGE_SIZE {
            return Err(DomainError::Validation(format!(
                "page_size must be between 1 and {}",
                Self::MAX_PAGE_SIZE
            )));
        }
        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Offset for the SQL query: (page - 1) * page_size
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.page_size
    }

    /// Limit for the SQL query
    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
        }
    }
}

/// One page of results together with the totals needed by the caller.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub pages: u64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: u64, pagination: &PaginationParams) -> Self {
        Self {
            items,
            total,
            page: pagination.page(),
            page_size: pagination.page_size(),
            pages: total.div_ceil(pagination.page_size()),
        }
    }
}

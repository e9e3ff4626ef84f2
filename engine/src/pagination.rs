//! Page requests and pagination state.

use crate::{error::Result, Error, PageNumber, PageSize};
use serde::{Deserialize, Serialize};

/// Page size used when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: PageSize = 6;

/// A validated request for one page of the remote catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number
    pub page: PageNumber,
    /// Products per page
    pub limit: PageSize,
}

impl PageRequest {
    /// Create a request; `page` must be at least 1 and `limit` positive.
    pub fn new(page: PageNumber, limit: PageSize) -> Result<Self> {
        if page == 0 || limit == 0 {
            return Err(Error::InvalidPage { page, limit });
        }
        Ok(Self { page, limit })
    }

    /// The first page of the given size.
    pub fn first(limit: PageSize) -> Result<Self> {
        Self::new(1, limit)
    }
}

/// Pagination state after the most recent successful fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: PageNumber,
    pub total_pages: PageNumber,
    pub limit: PageSize,
    pub has_more: bool,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::initial(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    /// State before the first fetch: assume there is something to load.
    pub fn initial(limit: PageSize) -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            limit,
            has_more: true,
        }
    }

    /// State after fetching `request` from a catalog holding `total` products.
    pub fn from_total(request: PageRequest, total: u64) -> Self {
        let total_pages = total.div_ceil(u64::from(request.limit));
        let total_pages = PageNumber::try_from(total_pages).unwrap_or(PageNumber::MAX);
        Self {
            current_page: request.page,
            total_pages,
            limit: request.limit,
            has_more: request.page < total_pages,
        }
    }

    /// The page a "load more" should request, if any.
    pub fn next_page(&self) -> Option<PageRequest> {
        if !self.has_more {
            return None;
        }
        let page = self.current_page.checked_add(1)?;
        PageRequest::new(page, self.limit).ok()
    }
}

//! Pagination request and result types.

use serde::{Deserialize, Serialize};

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

/// A zero-based page request with a bounded page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    /// Creates a page request, clamping the size to `1..=100`.
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// The number of items to skip.
    pub fn offset(&self) -> usize {
        self.page as usize * self.size as usize
    }

    /// The maximum number of items to return.
    pub fn limit(&self) -> usize {
        self.size as usize
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results together with totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Builds a page from a full slice of already-ordered items.
    ///
    /// Used by in-memory stores; SQL-backed stores compute the totals in
    /// the database and call [`Page::from_parts`] instead.
    pub fn paginate(items: Vec<T>, request: PageRequest) -> Self {
        let total_items = items.len() as u64;
        let page_items: Vec<T> = items
            .into_iter()
            .skip(request.offset())
            .take(request.limit())
            .collect();
        Self::from_parts(page_items, request, total_items)
    }

    /// Builds a page from pre-sliced items and a separately computed total.
    pub fn from_parts(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        let total_pages = (total_items as f64 / request.size as f64).ceil() as u32;
        Self {
            items,
            page: request.page,
            size: request.size,
            total_items,
            total_pages,
        }
    }

    /// Maps page items while keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

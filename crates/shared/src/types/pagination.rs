//! Pagination types for list operations.

use serde::{Deserialize, Serialize};

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
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
    10
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
    /// Creates a page request.
    #[must_use]
    pub const fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// Returns the half-open index range `[(page-1)*per_page, page*per_page)`.
    ///
    /// `None` when the page cannot hold any items (page 0, zero page size,
    /// or an offset that does not fit in `usize`).
    #[must_use]
    pub fn window(&self) -> Option<std::ops::Range<usize>> {
        if self.page == 0 || self.per_page == 0 {
            return None;
        }
        let per_page = usize::try_from(self.per_page).ok()?;
        let start = usize::try_from(self.page - 1).ok()?.checked_mul(per_page)?;
        Some(start..start.saturating_add(per_page))
    }

    /// Slices `items` to this page.
    ///
    /// Out-of-range pages yield an empty vector.
    #[must_use]
    pub fn slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        match self.window() {
            Some(range) if range.start < items.len() => {
                items[range.start..range.end.min(items.len())].to_vec()
            }
            _ => Vec::new(),
        }
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
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items across all pages.
    pub total: u64,
    /// Total number of pages.
    pub total_pages: u32,
}

impl<T> PageResponse<T> {
    /// Creates a new paginated response.
    #[must_use]
    pub fn new(data: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
        let total_pages = if total == 0 || per_page == 0 {
            1
        } else {
            u32::try_from(total.div_ceil(u64::from(per_page))).unwrap_or(u32::MAX)
        };

        Self {
            data,
            meta: PageMeta {
                page,
                per_page,
                total,
                total_pages,
            },
        }
    }

    /// Total number of items matching the query, independent of the page.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.meta.total
    }
}

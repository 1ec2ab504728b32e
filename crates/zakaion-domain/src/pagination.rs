//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Pagination parameters shared across all list endpoints.
///
/// - `size`: 1–100, default 20
/// - `page`: zero-based, default 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_size")]
    pub size: u32,
    #[serde(default)]
    pub page: u32,
}

fn default_size() -> u32 {
    20
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            size: default_size(),
            page: 0,
        }
    }
}

impl PageRequest {
    /// Clamp `size` to the valid range 1–100.
    pub fn clamped(self) -> Self {
        Self {
            size: self.size.clamp(1, 100),
            page: self.page,
        }
    }

    /// Number of rows to skip for this page.
    pub fn offset(self) -> u64 {
        let PageRequest { size, page } = self.clamped();
        u64::from(size) * u64::from(page)
    }
}

/// One page of results plus the total row count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    #[serde(rename = "totalElements")]
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
        }
    }
}

//! Pagination utilities for service layer
//!
//! Provides a simple `Pagination` struct and helpers to normalize inputs.

use serde::{Deserialize, Serialize};

/// Pagination parameters
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

/// One page of an already ordered list.
#[derive(Clone, Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    /// Clamp to sane defaults and convert to `u64`
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, 100);
        ((page - 1) as u64, per_page as u64)
    }

    /// Slice `rows` according to the normalized page.
    pub fn apply<T: Clone>(self, rows: &[T]) -> Page<T> {
        let (index, per_page) = self.normalize();
        let start = index.saturating_mul(per_page).min(rows.len() as u64) as usize;
        let end = (start as u64 + per_page).min(rows.len() as u64) as usize;
        Page {
            items: rows[start..end].to_vec(),
            total: rows.len() as u64,
            page: index as u32 + 1,
            per_page: per_page as u32,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 20 } }
}

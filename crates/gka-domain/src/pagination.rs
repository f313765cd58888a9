//! Pagination and sort direction types.

use serde::{Deserialize, Serialize};

/// Upper bound for `per_page` on every list endpoint.
pub const MAX_PER_PAGE: u32 = 100;

/// Generic sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sort {
    Desc,
    Asc,
}

/// Pagination parameters shared across all list endpoints.
///
/// - `per_page`: 1–100, default 20
/// - `page`: ≥ 1, default 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_per_page", rename = "per-page")]
    pub per_page: u32,
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_per_page() -> u32 {
    20
}

fn default_page() -> u32 {
    1
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            page: default_page(),
        }
    }
}

impl PageRequest {
    /// Build from optional query values, falling back to defaults.
    pub fn from_query(per_page: Option<u32>, page: Option<u32>) -> Self {
        Self {
            per_page: per_page.unwrap_or_else(default_per_page),
            page: page.unwrap_or_else(default_page),
        }
        .clamped()
    }

    /// Clamp `per_page` to 1–[`MAX_PER_PAGE`] and `page` to ≥ 1.
    pub fn clamped(self) -> Self {
        Self {
            per_page: self.per_page.clamp(1, MAX_PER_PAGE),
            page: self.page.max(1),
        }
    }

    /// Row offset of the first item on this page.
    pub fn offset(&self) -> u64 {
        let p = self.clamped();
        u64::from(p.page - 1) * u64::from(p.per_page)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.clamped().per_page)
    }
}

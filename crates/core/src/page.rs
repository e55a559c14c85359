//! Paginated list responses.

use serde::{Deserialize, Serialize};

/// One page of a list endpoint: `{ items, total, page, limit }`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    crate::DEFAULT_PAGE_SIZE
}

impl<T> Page<T> {
    /// Number of pages needed for `total` items (at least one).
    pub fn total_pages(&self) -> u64 {
        let limit = u64::from(self.limit.max(1));
        self.total.div_ceil(limit).max(1)
    }
}

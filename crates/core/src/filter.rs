//! List-view filter state and its query-string encoding.

use crate::article::ArticleStatus;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Filter state of one list view.
///
/// Implementations are persisted as JSON under [`ListFilters::STORAGE_KEY`];
/// missing fields fall back to their defaults when read back.
pub trait ListFilters: Clone + Default + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Durable storage key for this view.
    const STORAGE_KEY: &'static str;

    /// Query parameters for the list endpoint, without empty values.
    fn query_pairs(&self) -> Vec<(&'static str, String)>;

    /// Current page (1-based).
    fn page(&self) -> u32;

    /// Move to another page (clamped to 1).
    fn set_page(&mut self, page: u32);
}

fn push_non_empty(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: &str) {
    if !value.is_empty() {
        pairs.push((key, value.to_string()));
    }
}

/// Filters of the article list view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleFilters {
    pub status: Option<ArticleStatus>,
    pub tag_id: String,
    pub category_id: String,
    pub q: String,
    pub page: u32,
    pub limit: u32,
}

impl Default for ArticleFilters {
    fn default() -> Self {
        Self {
            status: None,
            tag_id: String::new(),
            category_id: String::new(),
            q: String::new(),
            page: 1,
            limit: crate::DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListFilters for ArticleFilters {
    const STORAGE_KEY: &'static str = "articleFilters";

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        push_non_empty(&mut pairs, "tag_id", &self.tag_id);
        push_non_empty(&mut pairs, "category_id", &self.category_id);
        push_non_empty(&mut pairs, "q", &self.q);
        pairs.push(("page", self.page.max(1).to_string()));
        pairs.push(("limit", self.limit.to_string()));
        pairs
    }

    fn page(&self) -> u32 {
        self.page
    }

    fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }
}

/// Published-state filter of the file list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishedFilter {
    #[default]
    All,
    True,
    False,
}

impl PublishedFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::True => "true",
            Self::False => "false",
        }
    }
}

/// Sort order of the file list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileSort {
    #[default]
    CreatedDesc,
    CreatedAsc,
    TitleAsc,
    TitleDesc,
}

impl FileSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedDesc => "created_desc",
            Self::CreatedAsc => "created_asc",
            Self::TitleAsc => "title_asc",
            Self::TitleDesc => "title_desc",
        }
    }
}

impl fmt::Display for FileSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filters of the file-record list view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileFilters {
    pub q: String,
    pub published: PublishedFilter,
    pub page: u32,
    pub limit: u32,
    pub sort: FileSort,
}

impl Default for FileFilters {
    fn default() -> Self {
        Self {
            q: String::new(),
            published: PublishedFilter::All,
            page: 1,
            limit: crate::DEFAULT_PAGE_SIZE,
            sort: FileSort::CreatedDesc,
        }
    }
}

impl ListFilters for FileFilters {
    const STORAGE_KEY: &'static str = "publicFilesFilters";

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_non_empty(&mut pairs, "q", &self.q);
        pairs.push(("published", self.published.as_str().to_string()));
        pairs.push(("page", self.page.max(1).to_string()));
        pairs.push(("limit", self.limit.to_string()));
        pairs.push(("sort", self.sort.as_str().to_string()));
        pairs
    }

    fn page(&self) -> u32 {
        self.page
    }

    fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }
}

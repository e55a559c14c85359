//! Article records and the bodies sent when creating or updating them.

use crate::id::RecordId;
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Editorial status of an article.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    #[default]
    Draft,
    Published,
    Pending,
}

impl ArticleStatus {
    /// Parse from string.
    pub fn parse(s: &str) -> crate::Result<Self> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "pending" => Ok(Self::Pending),
            _ => Err(crate::Error::Serialization(format!(
                "unknown article status: {s}"
            ))),
        }
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Pending => "pending",
        }
    }

    /// Target of the publish/unpublish toggle.
    ///
    /// Drafts and pending articles publish; published articles go back to draft.
    pub fn toggled(&self) -> Self {
        match self {
            Self::Draft | Self::Pending => Self::Published,
            Self::Published => Self::Draft,
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an article body lives: inline markdown or an external document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleSource {
    #[default]
    Inline,
    Drive,
}

/// An article as returned by the API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: RecordId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub summary: String,
    /// Markdown body (inline mode only).
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub source: Option<ArticleSource>,
    #[serde(default)]
    pub external_link: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_ids: Vec<RecordId>,
    #[serde(default)]
    pub hero_image_id: Option<RecordId>,
    #[serde(default)]
    pub status: ArticleStatus,
    /// Set by the publish transition, cleared on unpublish (server-controlled).
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl Article {
    /// Effective source mode.
    ///
    /// Older records carry no explicit `source`; an external link then means
    /// the article is drive-backed.
    pub fn source_mode(&self) -> ArticleSource {
        match (self.source, self.external_link.as_deref()) {
            (Some(source), _) => source,
            (None, Some(link)) if !link.is_empty() => ArticleSource::Drive,
            (None, _) => ArticleSource::Inline,
        }
    }
}

/// Body of `POST /v1/articles`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub status: ArticleStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub source: ArticleSource,
    #[serde(default)]
    pub external_link: Option<String>,
}

/// Body of `PUT /v1/articles/:id`.
///
/// Exactly one of `content` / `external_link` is populated, matching `source`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArticleUpdate {
    pub title: String,
    pub slug: String,
    pub author: String,
    pub summary: String,
    pub content: Option<String>,
    pub status: ArticleStatus,
    pub tags: Vec<String>,
    pub image_ids: Vec<RecordId>,
    pub hero_image_id: Option<RecordId>,
    pub source: ArticleSource,
    pub external_link: Option<String>,
}

/// Body of `PATCH /v1/articles/:id/status`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: ArticleStatus,
}

/// Response of `GET /v1/articles/stats`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleStats {
    pub published: u64,
    pub drafts: u64,
    pub pending: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_toggle() {
        assert_eq!(ArticleStatus::Draft.toggled(), ArticleStatus::Published);
        assert_eq!(ArticleStatus::Published.toggled(), ArticleStatus::Draft);
        assert_eq!(ArticleStatus::Pending.toggled(), ArticleStatus::Published);
    }

    #[test]
    fn test_source_mode_inferred_from_external_link() {
        let article: Article = serde_json::from_value(json!({
            "id": 3,
            "title": "Rainfall",
            "external_link": "https://drive.google.com/file/d/abc/view"
        }))
        .unwrap();
        assert_eq!(article.source_mode(), ArticleSource::Drive);

        let inline: Article = serde_json::from_value(json!({"id": 4, "external_link": ""})).unwrap();
        assert_eq!(inline.source_mode(), ArticleSource::Inline);
    }

    #[test]
    fn test_article_timestamps_parse() {
        let article: Article = serde_json::from_value(json!({
            "id": "a-1",
            "status": "published",
            "published_at": "2025-03-01T10:00:00Z",
            "updated_at": null
        }))
        .unwrap();
        assert_eq!(article.status, ArticleStatus::Published);
        assert!(article.published_at.is_some());
        assert!(article.updated_at.is_none());
    }
}

//! Linked-file records: titled collections of links to external documents.

use crate::error::ValidationError;
use crate::id::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;
use url::Url;

/// Name given to a legacy `drive_link` when it is promoted to a link row.
pub const PRIMARY_LINK_NAME: &str = "Primary link";

/// One external document attached to a file record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FileLink {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub href: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

/// A file record as returned by the API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: RecordId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub links: Option<Vec<FileLink>>,
    /// Single-link form used by older records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive_link: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default = "empty_object")]
    pub metadata: Value,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl FileRecord {
    /// Link rows to seed an editor with.
    ///
    /// Records without a `links` array but with a legacy `drive_link` get
    /// that link as a single "Primary link" row.
    pub fn initial_links(&self) -> Vec<FileLink> {
        if let Some(links) = &self.links {
            return links.clone();
        }
        match &self.drive_link {
            Some(href) => vec![FileLink {
                name: PRIMARY_LINK_NAME.to_string(),
                href: href.clone(),
                description: None,
                meta: Some(empty_object()),
            }],
            None => Vec::new(),
        }
    }

    /// Metadata pretty-printed for editing.
    pub fn metadata_text(&self) -> String {
        serde_json::to_string_pretty(&self.metadata).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Body of `POST /v1/public-files`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CreateFileRecordRequest {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive_link: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default = "empty_object")]
    pub metadata: Value,
}

/// Body of `PUT /v1/public-files/:id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileRecordUpdate {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub links: Vec<FileLink>,
    pub metadata: Value,
}

/// Body of `PATCH /v1/public-files/:id/publish`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PublishChange {
    pub is_published: bool,
}

/// Parse metadata text typed by a user.
///
/// Blank text means an empty object. Anything else must be a JSON object.
pub fn parse_metadata(text: &str) -> Result<Value, ValidationError> {
    if text.trim().is_empty() {
        return Ok(empty_object());
    }
    match serde_json::from_str::<Value>(text) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(other) => Err(ValidationError::InvalidMetadata(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(err) => Err(ValidationError::InvalidMetadata(err.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Check that a link target is an absolute http(s) URL.
pub fn validate_href(href: &str) -> Result<Url, String> {
    let url = Url::parse(href).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        "http" | "https" => Err("missing host".to_string()),
        other => Err(format!("unsupported scheme: {other}")),
    }
}

/// Prepare link rows for saving.
///
/// Rows with neither a name nor an href are dropped; names and hrefs are
/// trimmed and blank descriptions become `None`. Every remaining row must
/// carry a valid URL.
pub fn sanitize_links(links: &[FileLink]) -> Result<Vec<FileLink>, ValidationError> {
    let mut cleaned = Vec::with_capacity(links.len());
    for (index, link) in links.iter().enumerate() {
        let name = link.name.trim();
        let href = link.href.trim();
        if name.is_empty() && href.is_empty() {
            continue;
        }
        validate_href(href).map_err(|reason| ValidationError::InvalidLinkUrl {
            index,
            href: href.to_string(),
            reason,
        })?;
        let description = link
            .description
            .as_ref()
            .filter(|d| !d.trim().is_empty())
            .cloned();
        cleaned.push(FileLink {
            name: name.to_string(),
            href: href.to_string(),
            description,
            meta: link.meta.clone(),
        });
    }
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_metadata() {
        assert_eq!(parse_metadata("").unwrap(), json!({}));
        assert_eq!(parse_metadata("{\"year\": 2025}").unwrap(), json!({"year": 2025}));
        assert!(matches!(
            parse_metadata("{bad json"),
            Err(ValidationError::InvalidMetadata(_))
        ));
        assert!(matches!(
            parse_metadata("[1, 2]"),
            Err(ValidationError::InvalidMetadata(_))
        ));
    }

    #[test]
    fn test_sanitize_links_drops_blank_rows() {
        let links = vec![
            FileLink {
                name: "  Report ".to_string(),
                href: " https://example.com/report.pdf ".to_string(),
                description: Some("   ".to_string()),
                meta: None,
            },
            FileLink::default(),
        ];
        let cleaned = sanitize_links(&links).unwrap();
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].name, "Report");
        assert_eq!(cleaned[0].href, "https://example.com/report.pdf");
        assert_eq!(cleaned[0].description, None);
    }

    #[test]
    fn test_sanitize_links_rejects_malformed_url() {
        let links = vec![FileLink {
            name: "Broken".to_string(),
            href: "not a url".to_string(),
            ..FileLink::default()
        }];
        match sanitize_links(&links) {
            Err(ValidationError::InvalidLinkUrl { index, href, .. }) => {
                assert_eq!(index, 0);
                assert_eq!(href, "not a url");
            }
            other => panic!("expected InvalidLinkUrl, got {other:?}"),
        }

        let ftp = vec![FileLink {
            name: "Mirror".to_string(),
            href: "ftp://example.com/file".to_string(),
            ..FileLink::default()
        }];
        assert!(sanitize_links(&ftp).is_err());
    }

    #[test]
    fn test_legacy_drive_link_promoted() {
        let record: FileRecord = serde_json::from_value(json!({
            "id": 5,
            "title": "Rainfall",
            "drive_link": "https://drive.google.com/file/d/xyz/view"
        }))
        .unwrap();
        let links = record.initial_links();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].name, PRIMARY_LINK_NAME);
        assert_eq!(record.metadata, json!({}));
    }
}

//! Tag entities and tag-name editing rules.

use crate::error::ValidationError;
use crate::id::RecordId;
use serde::{Deserialize, Serialize};

/// Maximum tag name length in characters.
pub const MAX_TAG_LEN: usize = 64;

/// A tag as managed through the tags endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: RecordId,
    pub name: String,
}

/// Body for tag create/rename.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TagRequest {
    pub name: String,
}

/// Clean a tag name: trim and collapse inner whitespace runs to one space.
pub fn normalize_tag_name(raw: &str) -> Result<String, ValidationError> {
    let cleaned = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        return Err(ValidationError::EmptyTag);
    }
    let len = cleaned.chars().count();
    if len > MAX_TAG_LEN {
        return Err(ValidationError::TagTooLong {
            len,
            max: MAX_TAG_LEN,
        });
    }
    Ok(cleaned)
}

/// Append a tag name to an ordered tag set.
///
/// Returns `Ok(false)` when an equal name (case-insensitive) is already
/// present; the list is left untouched in that case.
pub fn add_tag(tags: &mut Vec<String>, raw: &str) -> Result<bool, ValidationError> {
    let name = normalize_tag_name(raw)?;
    let key = name.to_lowercase();
    if tags.iter().any(|t| t.trim().to_lowercase() == key) {
        return Ok(false);
    }
    tags.push(name);
    Ok(true)
}

/// Remove a tag by exact name. Returns whether anything was removed.
pub fn remove_tag(tags: &mut Vec<String>, name: &str) -> bool {
    let before = tags.len();
    tags.retain(|t| t != name);
    tags.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_tag_normalizes_and_dedupes() {
        let mut tags = vec!["Climate".to_string()];
        assert!(add_tag(&mut tags, "  river   basin ").unwrap());
        assert!(!add_tag(&mut tags, "CLIMATE").unwrap());
        assert_eq!(tags, vec!["Climate", "river basin"]);
    }

    #[test]
    fn test_add_tag_rejects_empty_and_long_names() {
        let mut tags = Vec::new();
        assert_eq!(add_tag(&mut tags, "   "), Err(ValidationError::EmptyTag));
        let long = "x".repeat(MAX_TAG_LEN + 1);
        assert!(matches!(
            add_tag(&mut tags, &long),
            Err(ValidationError::TagTooLong { len: 65, max: 64 })
        ));
        assert!(tags.is_empty());
    }

    #[test]
    fn test_remove_tag_is_exact() {
        let mut tags = vec!["Flood".to_string(), "flood".to_string()];
        assert!(remove_tag(&mut tags, "flood"));
        assert_eq!(tags, vec!["Flood"]);
        assert!(!remove_tag(&mut tags, "missing"));
    }
}

//! Server-assigned record identifiers.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifier of a server record (article, file record, image, tag).
///
/// The backend may hand out integer or string ids. The wire form is kept so
/// that ids echoed back in request bodies (`hero_image_id`, `image_ids`) are
/// sent exactly as received, while equality and hashing only look at the
/// textual value: `42` and `"42"` name the same record.
#[derive(Clone)]
pub struct RecordId {
    value: String,
    numeric: bool,
}

impl RecordId {
    /// Parse from user input (command line, path segment).
    pub fn parse(s: &str) -> crate::Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(crate::Error::InvalidRecordId("empty id".to_string()));
        }
        if trimmed.contains('/') {
            return Err(crate::Error::InvalidRecordId(format!(
                "id must not contain '/': {trimmed}"
            )));
        }
        Ok(Self::from(trimmed))
    }

    /// Get the textual form.
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self {
            value: value.to_string(),
            numeric: false,
        }
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self {
            value,
            numeric: false,
        }
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        Self {
            value: value.to_string(),
            numeric: true,
        }
    }
}

impl PartialEq for RecordId {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for RecordId {}

impl Hash for RecordId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl PartialOrd for RecordId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RecordId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.value)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.numeric
            && let Ok(n) = self.value.parse::<u64>()
        {
            return serializer.serialize_u64(n);
        }
        serializer.serialize_str(&self.value)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = RecordId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or non-negative integer id")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<RecordId, E> {
                Ok(RecordId::from(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<RecordId, E> {
                u64::try_from(v)
                    .map(RecordId::from)
                    .map_err(|_| E::custom(format!("negative id: {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<RecordId, E> {
                Ok(RecordId::from(v))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

//! Invalidation tags.

use folio_core::RecordId;
use serde_json::Value;
use std::fmt;

/// Which slice of a resource type a tag names.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TagScope {
    List,
    Stats,
    Item(RecordId),
}

/// A label shared between the queries that provide data and the mutations
/// that make it stale.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResourceTag {
    Auth,
    Articles(TagScope),
    PublicFiles(TagScope),
    Images(TagScope),
    Tags(TagScope),
}

/// Resource type of a tag, used to build list providers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Articles,
    PublicFiles,
    Images,
    Tags,
}

impl ResourceKind {
    pub fn tag(self, scope: TagScope) -> ResourceTag {
        match self {
            Self::Articles => ResourceTag::Articles(scope),
            Self::PublicFiles => ResourceTag::PublicFiles(scope),
            Self::Images => ResourceTag::Images(scope),
            Self::Tags => ResourceTag::Tags(scope),
        }
    }

    pub fn list(self) -> ResourceTag {
        self.tag(TagScope::List)
    }

    pub fn item(self, id: &RecordId) -> ResourceTag {
        self.tag(TagScope::Item(id.clone()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Articles => "Articles",
            Self::PublicFiles => "PublicFiles",
            Self::Images => "Images",
            Self::Tags => "Tags",
        }
    }
}

impl ResourceTag {
    pub fn kind(&self) -> Option<ResourceKind> {
        match self {
            Self::Auth => None,
            Self::Articles(_) => Some(ResourceKind::Articles),
            Self::PublicFiles(_) => Some(ResourceKind::PublicFiles),
            Self::Images(_) => Some(ResourceKind::Images),
            Self::Tags(_) => Some(ResourceKind::Tags),
        }
    }

    pub fn scope(&self) -> Option<&TagScope> {
        match self {
            Self::Auth => None,
            Self::Articles(scope)
            | Self::PublicFiles(scope)
            | Self::Images(scope)
            | Self::Tags(scope) => Some(scope),
        }
    }
}

impl fmt::Display for ResourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (Some(kind), Some(scope)) = (self.kind(), self.scope()) else {
            return f.write_str("Auth");
        };
        match scope {
            TagScope::List => write!(f, "{}:LIST", kind.as_str()),
            TagScope::Stats => write!(f, "{}:STATS", kind.as_str()),
            TagScope::Item(id) => write!(f, "{}:{}", kind.as_str(), id),
        }
    }
}

/// Ids of the records in a list payload.
///
/// Accepts a paginated `{items: [...]}` object or a bare array; elements
/// without a usable `id` are skipped.
pub fn item_ids(payload: &Value) -> Vec<RecordId> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("items") {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };
    items
        .iter()
        .filter_map(|item| item.get("id"))
        .filter_map(|id| serde_json::from_value::<RecordId>(id.clone()).ok())
        .collect()
}

/// The list tag plus one item tag per returned record.
pub fn list_tags(kind: ResourceKind, payload: &Value) -> Vec<ResourceTag> {
    std::iter::once(kind.list())
        .chain(item_ids(payload).iter().map(|id| kind.item(id)))
        .collect()
}

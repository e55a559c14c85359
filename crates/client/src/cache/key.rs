//! Normalized cache keys.

use serde_json::Value;
use std::fmt;

/// Identity of a cached query: endpoint name plus canonical parameters.
///
/// Object members are ordered by name at every depth, so two parameter sets
/// that differ only in key order map to the same key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    endpoint: String,
    params: String,
}

impl QueryKey {
    pub fn new(endpoint: impl Into<String>, params: &Value) -> Self {
        let mut canonical = String::new();
        write_canonical(params, &mut canonical);
        Self {
            endpoint: endpoint.into(),
            params: canonical,
        }
    }

    /// Key for an endpoint that takes no parameters.
    pub fn bare(endpoint: impl Into<String>) -> Self {
        Self::new(endpoint, &Value::Null)
    }

    pub fn from_pairs<K: AsRef<str>>(endpoint: impl Into<String>, pairs: &[(K, String)]) -> Self {
        let params = pairs
            .iter()
            .map(|(k, v)| (k.as_ref().to_string(), Value::String(v.clone())))
            .collect::<serde_json::Map<_, _>>();
        Self::new(endpoint, &Value::Object(params))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn params(&self) -> &str {
        &self.params
    }
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (k, v)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(k.clone()).to_string());
                out.push(':');
                write_canonical(v, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params == "null" {
            write!(f, "{}", self.endpoint)
        } else {
            write!(f, "{}({})", self.endpoint, self.params)
        }
    }
}

//! Failure taxonomy surfaced by the gateway and everything built on it.

use folio_core::ValidationError;
use serde_json::Value;
use thiserror::Error;

/// Typed failure of an API call.
///
/// Cloneable so a single failure of a de-duplicated query can be handed to
/// every waiter and subscriber.
#[derive(Clone, Debug, Error)]
pub enum ApiError {
    /// A 401 that survived the refresh attempt. The session has been cleared.
    #[error("authentication required (HTTP {status}): {}", body_message(.body))]
    AuthExpired { status: u16, body: Value },

    /// Rejected locally; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request never completed.
    #[error("network failure: {0}")]
    Network(String),

    /// Any other non-2xx response, passed through verbatim.
    #[error("API error ({status}): {}", body_message(.body))]
    Server { status: u16, body: Value },

    /// A 2xx response whose payload did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::AuthExpired { status, .. } | Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired { .. })
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Best human-readable message carried by an error body.
fn body_message(body: &Value) -> String {
    match body {
        Value::Null => "no response body".to_string(),
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("message")
            .or_else(|| map.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string()),
        other => other.to_string(),
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

//! Error types for the core domain.

use thiserror::Error;

/// Client-side validation failure.
///
/// These never reach the server: a draft that fails validation is held back
/// and the failure is shown next to the offending field.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid metadata JSON: {0}")]
    InvalidMetadata(String),

    #[error("invalid link #{index} ({href}): {reason}")]
    InvalidLinkUrl {
        index: usize,
        href: String,
        reason: String,
    },

    #[error("tag name is empty")]
    EmptyTag,

    #[error("tag name too long: {len} characters (max {max})")]
    TagTooLong { len: usize, max: usize },
}

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid record id: {0}")]
    InvalidRecordId(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

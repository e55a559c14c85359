//! Core domain types for the folio content console.
//!
//! This crate defines the data model shared by the runtime and the CLI:
//! - Article and linked-file records, and the bodies sent to mutate them
//! - Record identifiers and paginated list responses
//! - Slug derivation, tag-name rules, link and metadata validation
//! - List-view filters and their query encoding
//! - Session and auth wire types
//! - Console configuration

pub mod article;
pub mod config;
pub mod error;
pub mod file_record;
pub mod filter;
pub mod id;
pub mod media;
pub mod page;
pub mod session;
pub mod slug;
pub mod tag;

pub use article::{Article, ArticleSource, ArticleStats, ArticleStatus, ArticleUpdate};
pub use config::ConsoleConfig;
pub use error::{Error, Result, ValidationError};
pub use file_record::{FileLink, FileRecord, FileRecordUpdate};
pub use filter::{ArticleFilters, FileFilters, FileSort, ListFilters, PublishedFilter};
pub use id::RecordId;
pub use page::Page;
pub use session::{Session, UserProfile};
pub use slug::to_slug;
pub use tag::Tag;

/// Default page size of list views.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Path prefix of every API route.
pub const API_PREFIX: &str = "/v1";

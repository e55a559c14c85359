//! Client runtime of the folio content console.
//!
//! Layers, bottom up:
//! - [`storage`]: best-effort durable key/value storage
//! - [`token_store`]: the session, mirrored to storage
//! - [`transport`]: logical requests and the HTTP transport
//! - [`gateway`]: bearer injection with a single refresh-and-retry on 401
//! - [`cache`]: de-duplicated, tag-invalidated query cache
//! - [`api`]: typed endpoints over gateway and cache
//! - [`gate`]: session guard for protected views
//! - [`editor`]: draft buffers with debounced autosave
//! - [`prefs`]: persisted filters and theme

pub mod api;
pub mod cache;
pub mod editor;
pub mod error;
pub mod gate;
pub mod gateway;
pub mod prefs;
pub mod storage;
pub mod token_store;
pub mod transport;

pub use api::ConsoleClient;
pub use cache::{CacheEvent, QueryKey, QueryStatus, ResourceCache, ResourceTag, Subscription};
pub use editor::{ArticleDraft, EditorSession, FileDraft, SaveStatus};
pub use error::{ApiError, ApiResult};
pub use gate::{GateState, SessionGate, SignInRedirect};
pub use gateway::Gateway;
pub use prefs::{FilterStore, ThemePreference};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use token_store::TokenStore;
pub use transport::{ApiRequest, HttpTransport, Method, RawResponse, Transport, TransportError};

/// Editor for articles.
pub type ArticleEditor = EditorSession<ArticleDraft>;

/// Editor for linked-file records.
pub type FileEditor = EditorSession<FileDraft>;

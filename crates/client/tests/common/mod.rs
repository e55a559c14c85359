pub mod fixtures;
pub mod mocks;

use folio_client::storage::{ACCESS_TOKEN_KEY, KeyValueStore, REFRESH_TOKEN_KEY, USER_KEY};
use folio_client::{ConsoleClient, MemoryStore, ResourceCache, TokenStore};
use std::sync::Arc;
use std::time::Duration;

#[allow(unused_imports)]
pub use mocks::{RecordedCall, ScriptedTransport};

/// A client over `transport` whose storage is returned for inspection.
#[allow(dead_code)]
pub fn client(transport: &Arc<ScriptedTransport>, signed_in: bool) -> (ConsoleClient, Arc<MemoryStore>) {
    let storage = Arc::new(MemoryStore::new());
    if signed_in {
        storage.set(ACCESS_TOKEN_KEY, fixtures::ACCESS);
        storage.set(REFRESH_TOKEN_KEY, fixtures::REFRESH);
        storage.set(USER_KEY, &fixtures::user_json().to_string());
    }
    let tokens = TokenStore::load(storage.clone());
    let client = ConsoleClient::with_transport(
        transport.clone(),
        tokens,
        ResourceCache::new(Duration::from_secs(60)),
    );
    (client, storage)
}

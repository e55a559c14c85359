//! Typed endpoint catalogue.
//!
//! [`ConsoleClient`] ties the gateway to the cache. Reads are cache queries
//! with a stable key and the tags they provide; every `*_query` method
//! returns the [`QuerySpec`] so views can subscribe to it. Writes go
//! straight through the gateway and invalidate tags on success.

mod articles;
mod auth;
mod files;
mod media;

pub use articles::{ITEM_ENDPOINT as ARTICLE_ENDPOINT, LIST_ENDPOINT as ARTICLES_ENDPOINT};
pub use auth::ME_ENDPOINT;
pub use files::{ITEM_ENDPOINT as FILE_ENDPOINT, LIST_ENDPOINT as FILES_ENDPOINT};

use crate::cache::{QueryKey, QuerySpec, ResourceCache, ResourceTag};
use crate::error::{ApiError, ApiResult};
use crate::gateway::Gateway;
use crate::storage::KeyValueStore;
use crate::token_store::TokenStore;
use crate::transport::{ApiRequest, HttpTransport, Transport, TransportError};
use folio_core::ConsoleConfig;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

type PatchFn = Box<dyn FnOnce(&mut Value) + Send>;

/// A write: the request, the tags it makes stale, and an optional in-place
/// update applied to one cached entry before the request is sent.
pub(crate) struct Mutation {
    request: ApiRequest,
    invalidates: Vec<ResourceTag>,
    optimistic: Option<(QueryKey, PatchFn)>,
}

impl Mutation {
    pub(crate) fn new(request: ApiRequest) -> Self {
        Self {
            request,
            invalidates: Vec::new(),
            optimistic: None,
        }
    }

    pub(crate) fn invalidates(mut self, tags: impl IntoIterator<Item = ResourceTag>) -> Self {
        self.invalidates.extend(tags);
        self
    }

    pub(crate) fn optimistic(
        mut self,
        key: QueryKey,
        update: impl FnOnce(&mut Value) + Send + 'static,
    ) -> Self {
        self.optimistic = Some((key, Box::new(update)));
        self
    }
}

#[derive(Clone)]
pub struct ConsoleClient {
    gateway: Gateway,
    cache: ResourceCache,
}

impl ConsoleClient {
    pub fn new(gateway: Gateway, cache: ResourceCache) -> Self {
        Self { gateway, cache }
    }

    pub fn with_transport(
        transport: Arc<dyn Transport>,
        tokens: TokenStore,
        cache: ResourceCache,
    ) -> Self {
        Self::new(Gateway::new(transport, tokens), cache)
    }

    /// Client over HTTP with the session restored from `storage`.
    pub fn from_config(
        config: &ConsoleConfig,
        storage: Arc<dyn KeyValueStore>,
    ) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(&config.api)?;
        Ok(Self::with_transport(
            Arc::new(transport),
            TokenStore::load(storage),
            ResourceCache::from_config(&config.cache),
        ))
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn tokens(&self) -> &TokenStore {
        self.gateway.tokens()
    }

    pub fn cache(&self) -> &ResourceCache {
        &self.cache
    }

    pub(crate) fn query_spec<P>(&self, key: QueryKey, request: ApiRequest, provides: P) -> QuerySpec
    where
        P: Fn(&Value) -> Vec<ResourceTag> + Send + Sync + 'static,
    {
        let gateway = self.gateway.clone();
        let request = Arc::new(request);
        QuerySpec::new(key, move || {
            let gateway = gateway.clone();
            let request = request.clone();
            async move { gateway.execute(&request).await }
        })
        .provides(provides)
    }

    pub(crate) async fn fetch<T: DeserializeOwned>(&self, spec: QuerySpec) -> ApiResult<T> {
        decode(self.cache.query(spec).await?)
    }

    pub(crate) async fn mutate(&self, mutation: Mutation) -> ApiResult<Value> {
        let Mutation {
            request,
            invalidates,
            optimistic,
        } = mutation;
        let patch = optimistic.and_then(|(key, update)| self.cache.patch(&key, update));

        match self.gateway.execute(&request).await {
            Ok(payload) => {
                let affected = match &patch {
                    Some(patch) => self.cache.invalidate_after_patch(&invalidates, patch),
                    None => self.cache.invalidate(&invalidates),
                };
                debug!(request = %request, invalidated = affected.len(), "mutation succeeded");
                Ok(payload)
            }
            Err(e) => {
                if let Some(patch) = patch {
                    self.cache.rollback(patch);
                }
                Err(e)
            }
        }
    }
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

pub(crate) fn json_request<T: Serialize>(request: ApiRequest, body: &T) -> ApiResult<ApiRequest> {
    request
        .with_json(body)
        .map_err(|e| ApiError::Decode(format!("failed to encode request body: {e}")))
}

/// Cache key of a single-record query.
pub(crate) fn item_key(endpoint: &str, id: &folio_core::RecordId) -> QueryKey {
    QueryKey::new(endpoint, &serde_json::json!({ "id": id.as_str() }))
}

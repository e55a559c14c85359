//! Tag-indexed cache of query results.
//!
//! Queries are identified by a [`QueryKey`]. Concurrent requests for the same
//! key share one in-flight fetch; a successful result is stored together with
//! the [`ResourceTag`]s it provides. Mutations invalidate tags: every entry
//! carrying one becomes stale, and entries that currently have subscribers
//! are refetched straight away. Entries without subscribers are refetched on
//! their next use and evicted by [`ResourceCache::collect_garbage`] once idle
//! for the grace period.
//!
//! The state lock is never held across an await. Fetches are spawned on the
//! Tokio runtime so they complete even if every waiter goes away; the cache
//! must therefore be used from within a runtime.

mod key;
mod tag;

pub use key::QueryKey;
pub use tag::{ResourceKind, ResourceTag, TagScope, item_ids, list_tags};

use crate::error::{ApiError, ApiResult};
use folio_core::config::CacheConfig;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

pub type FetchFuture = BoxFuture<'static, ApiResult<Value>>;
type SharedFetch = Shared<FetchFuture>;

/// Produces a fresh fetch of a query each time it is called.
pub type Fetcher = Arc<dyn Fn() -> FetchFuture + Send + Sync>;

/// Tags provided by a successful payload.
pub type TagProvider = Arc<dyn Fn(&Value) -> Vec<ResourceTag> + Send + Sync>;

const EVENT_CAPACITY: usize = 64;

/// Everything the cache needs to run and re-run a query.
#[derive(Clone)]
pub struct QuerySpec {
    pub key: QueryKey,
    pub fetch: Fetcher,
    pub provides: TagProvider,
}

impl QuerySpec {
    pub fn new<F, Fut>(key: QueryKey, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ApiResult<Value>> + Send + 'static,
    {
        Self {
            key,
            fetch: Arc::new(move || fetch().boxed()),
            provides: Arc::new(|_| Vec::new()),
        }
    }

    pub fn provides<P>(mut self, provides: P) -> Self
    where
        P: Fn(&Value) -> Vec<ResourceTag> + Send + Sync + 'static,
    {
        self.provides = Arc::new(provides);
        self
    }
}

impl fmt::Debug for QuerySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuerySpec").field("key", &self.key).finish()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QueryStatus {
    #[default]
    Uninitialized,
    Loading,
    Success,
    Error,
}

/// Point-in-time copy of an entry, handed to views.
#[derive(Clone, Debug, Default)]
pub struct EntrySnapshot {
    pub status: QueryStatus,
    /// Last successful payload. Kept while a refetch is loading or failed.
    pub data: Option<Value>,
    pub error: Option<ApiError>,
    pub stale: bool,
    pub subscribers: usize,
}

impl EntrySnapshot {
    /// Decode the cached payload, if any.
    pub fn decode<T: DeserializeOwned>(&self) -> Option<ApiResult<T>> {
        self.data.as_ref().map(|data| {
            serde_json::from_value(data.clone()).map_err(|e| ApiError::Decode(e.to_string()))
        })
    }
}

/// Emitted whenever an entry changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEvent {
    pub key: QueryKey,
    pub status: QueryStatus,
}

struct InFlight {
    id: u64,
    future: SharedFetch,
}

struct Entry {
    data: Option<Value>,
    error: Option<ApiError>,
    status: QueryStatus,
    tags: HashSet<ResourceTag>,
    subscribers: usize,
    stale: bool,
    /// Invalidated while a fetch was running; that fetch's result is stale.
    invalidated_in_flight: bool,
    /// Tags invalidated during the running fetch that the entry did not carry
    /// yet; checked against what the result provides.
    invalidated_tags: HashSet<ResourceTag>,
    /// Bumped whenever a fetch result replaces `data`.
    version: u64,
    in_flight: Option<InFlight>,
    spec: Option<QuerySpec>,
    idle_since: Option<Instant>,
}

impl Entry {
    fn new() -> Self {
        Self {
            data: None,
            error: None,
            status: QueryStatus::Uninitialized,
            tags: HashSet::new(),
            subscribers: 0,
            stale: false,
            invalidated_in_flight: false,
            invalidated_tags: HashSet::new(),
            version: 0,
            in_flight: None,
            spec: None,
            idle_since: Some(Instant::now()),
        }
    }

    fn is_fresh(&self) -> bool {
        self.status == QueryStatus::Success && !self.stale
    }

    fn snapshot(&self) -> EntrySnapshot {
        EntrySnapshot {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
            stale: self.stale,
            subscribers: self.subscribers,
        }
    }
}

#[derive(Default)]
struct State {
    entries: HashMap<QueryKey, Entry>,
    next_fetch: u64,
}

impl State {
    fn next_fetch_id(&mut self) -> u64 {
        self.next_fetch += 1;
        self.next_fetch
    }
}

struct Inner {
    state: Mutex<State>,
    events: broadcast::Sender<CacheEvent>,
    gc_grace: Duration,
}

/// Shared handle to the cache. Clones share state.
#[derive(Clone)]
pub struct ResourceCache {
    inner: Arc<Inner>,
}

impl Default for ResourceCache {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}

impl ResourceCache {
    pub fn new(gc_grace: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State::default()),
                events,
                gc_grace,
            }),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.gc_grace())
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.inner.state.lock().unwrap_or_else(|poisoned| {
            warn!("cache state mutex was poisoned, recovering with into_inner()");
            poisoned.into_inner()
        })
    }

    fn emit(&self, key: &QueryKey, status: QueryStatus) {
        // No receivers is fine.
        let _ = self.inner.events.send(CacheEvent {
            key: key.clone(),
            status,
        });
    }

    /// Observe entry transitions.
    pub fn events(&self) -> broadcast::Receiver<CacheEvent> {
        self.inner.events.subscribe()
    }

    /// Start a fetch for `entry`. Caller holds the state lock.
    fn start_fetch(&self, entry: &mut Entry, spec: &QuerySpec, fetch_id: u64) -> SharedFetch {
        let cache = self.clone();
        let key = spec.key.clone();
        let provides = spec.provides.clone();
        let fetch = (spec.fetch)();
        let future = async move {
            let result = fetch.await;
            cache.complete(&key, fetch_id, &result, &provides);
            result
        }
        .boxed()
        .shared();

        debug!(key = %spec.key, fetch_id, "fetching");
        entry.status = QueryStatus::Loading;
        entry.in_flight = Some(InFlight {
            id: fetch_id,
            future: future.clone(),
        });
        self.emit(&spec.key, QueryStatus::Loading);
        tokio::spawn(future.clone());
        future
    }

    fn complete(
        &self,
        key: &QueryKey,
        fetch_id: u64,
        result: &ApiResult<Value>,
        provides: &TagProvider,
    ) {
        let mut guard = self.state();
        let state = &mut *guard;
        let Some(entry) = state.entries.get_mut(key) else {
            debug!(key = %key, "discarding result for evicted entry");
            return;
        };
        if entry.in_flight.as_ref().map(|f| f.id) != Some(fetch_id) {
            debug!(key = %key, fetch_id, "discarding superseded result");
            return;
        }
        entry.in_flight = None;
        let invalidated_tags = std::mem::take(&mut entry.invalidated_tags);
        match result {
            Ok(data) => {
                entry.tags = provides(data).into_iter().collect();
                if invalidated_tags.iter().any(|t| entry.tags.contains(t)) {
                    entry.invalidated_in_flight = true;
                }
                entry.data = Some(data.clone());
                entry.version += 1;
                entry.error = None;
                entry.status = QueryStatus::Success;
            }
            Err(e) => {
                debug!(key = %key, error = %e, "fetch failed");
                entry.error = Some(e.clone());
                entry.status = QueryStatus::Error;
            }
        }
        entry.stale = std::mem::take(&mut entry.invalidated_in_flight);
        if entry.subscribers == 0 {
            entry.idle_since = Some(Instant::now());
        }
        self.emit(key, entry.status);

        if entry.stale
            && entry.subscribers > 0
            && let Some(spec) = entry.spec.clone()
        {
            let id = state.next_fetch_id();
            if let Some(entry) = state.entries.get_mut(key) {
                self.start_fetch(entry, &spec, id);
            }
        }
    }

    /// Resolve a query: cached value when fresh, otherwise join the running
    /// fetch or start one.
    pub async fn query(&self, spec: QuerySpec) -> ApiResult<Value> {
        let future = {
            let mut guard = self.state();
            let state = &mut *guard;
            let entry = state
                .entries
                .entry(spec.key.clone())
                .or_insert_with(Entry::new);
            entry.spec = Some(spec.clone());
            if let Some(in_flight) = &entry.in_flight {
                debug!(key = %spec.key, "joining in-flight fetch");
                in_flight.future.clone()
            } else if entry.is_fresh()
                && let Some(data) = &entry.data
            {
                debug!(key = %spec.key, "cache hit");
                return Ok(data.clone());
            } else {
                state.next_fetch += 1;
                self.start_fetch(entry, &spec, state.next_fetch)
            }
        };
        future.await
    }

    /// Register a view's interest in a query.
    ///
    /// Starts a fetch unless the entry is fresh or already loading. The entry
    /// keeps being refetched on invalidation until the subscription drops.
    pub fn subscribe(&self, spec: QuerySpec) -> Subscription {
        {
            let mut guard = self.state();
            let state = &mut *guard;
            let entry = state
                .entries
                .entry(spec.key.clone())
                .or_insert_with(Entry::new);
            entry.spec = Some(spec.clone());
            entry.subscribers += 1;
            entry.idle_since = None;
            if entry.in_flight.is_none() && !entry.is_fresh() {
                state.next_fetch += 1;
                self.start_fetch(entry, &spec, state.next_fetch);
            }
        }
        Subscription {
            cache: self.clone(),
            key: spec.key,
        }
    }

    fn release(&self, key: &QueryKey) {
        let mut state = self.state();
        if let Some(entry) = state.entries.get_mut(key) {
            entry.subscribers = entry.subscribers.saturating_sub(1);
            if entry.subscribers == 0 {
                entry.idle_since = Some(Instant::now());
            }
        }
    }

    /// Fetch again regardless of freshness; joins a fetch already running.
    ///
    /// Returns `None` for a key the cache has never seen.
    pub async fn refetch(&self, key: &QueryKey) -> Option<ApiResult<Value>> {
        let future = {
            let mut guard = self.state();
            let state = &mut *guard;
            let entry = state.entries.get_mut(key)?;
            match &entry.in_flight {
                Some(in_flight) => in_flight.future.clone(),
                None => {
                    let spec = entry.spec.clone()?;
                    state.next_fetch += 1;
                    self.start_fetch(entry, &spec, state.next_fetch)
                }
            }
        };
        Some(future.await)
    }

    fn in_flight(&self, key: &QueryKey) -> Option<SharedFetch> {
        let state = self.state();
        state
            .entries
            .get(key)
            .and_then(|e| e.in_flight.as_ref().map(|f| f.future.clone()))
    }

    /// Mark every entry carrying one of `tags` stale and refetch the
    /// subscribed ones. Returns the affected keys.
    pub fn invalidate(&self, tags: &[ResourceTag]) -> Vec<QueryKey> {
        if tags.is_empty() {
            return Vec::new();
        }
        let mut guard = self.state();
        self.invalidate_locked(&mut guard, tags, None)
    }

    /// Invalidate `tags` after the write behind `patch` succeeded.
    ///
    /// The patched entry is left alone only while it still holds the patched
    /// payload. If a fetch replaced it, or one is still running, that data may
    /// predate the write and the entry is invalidated like any other.
    pub fn invalidate_after_patch(
        &self,
        tags: &[ResourceTag],
        patch: &OptimisticPatch,
    ) -> Vec<QueryKey> {
        if tags.is_empty() {
            return Vec::new();
        }
        let mut guard = self.state();
        let current = guard
            .entries
            .get(&patch.key)
            .is_some_and(|entry| entry.in_flight.is_none() && entry.version == patch.version);
        if !current {
            debug!(key = %patch.key, "optimistic patch superseded; invalidating entry");
        }
        let except = current.then_some(&patch.key);
        self.invalidate_locked(&mut guard, tags, except)
    }

    fn invalidate_locked(
        &self,
        state: &mut State,
        tags: &[ResourceTag],
        except: Option<&QueryKey>,
    ) -> Vec<QueryKey> {
        let mut affected = Vec::new();
        let mut refetch = Vec::new();
        for (key, entry) in state.entries.iter_mut() {
            if Some(key) == except {
                continue;
            }
            if !tags.iter().any(|t| entry.tags.contains(t)) {
                // The running fetch may come back carrying one of these tags.
                if entry.in_flight.is_some() {
                    entry.invalidated_tags.extend(tags.iter().cloned());
                }
                continue;
            }
            entry.stale = true;
            affected.push(key.clone());
            if entry.in_flight.is_some() {
                entry.invalidated_in_flight = true;
            } else if entry.subscribers > 0 {
                refetch.push(key.clone());
            }
        }
        debug!(
            tags = ?tags.iter().map(ToString::to_string).collect::<Vec<_>>(),
            affected = affected.len(),
            refetching = refetch.len(),
            "invalidated tags"
        );
        for key in refetch {
            let id = state.next_fetch_id();
            if let Some(entry) = state.entries.get_mut(&key)
                && let Some(spec) = entry.spec.clone()
            {
                self.start_fetch(entry, &spec, id);
            }
        }
        affected
    }

    /// Apply `update` to the cached payload of `key` in place.
    ///
    /// Returns the pre-update snapshot for [`rollback`](Self::rollback), or
    /// `None` when nothing is cached under `key`.
    pub fn patch(&self, key: &QueryKey, update: impl FnOnce(&mut Value)) -> Option<OptimisticPatch> {
        let mut state = self.state();
        let entry = state.entries.get_mut(key)?;
        let version = entry.version;
        let data = entry.data.as_mut()?;
        let snapshot = data.clone();
        update(data);
        debug!(key = %key, "applied optimistic patch");
        self.emit(key, entry.status);
        Some(OptimisticPatch {
            key: key.clone(),
            snapshot,
            version,
        })
    }

    /// Restore the payload captured by `patch`.
    ///
    /// A fetch result that landed after the patch already replaced the
    /// patched payload and is kept as is.
    pub fn rollback(&self, patch: OptimisticPatch) {
        let mut state = self.state();
        let Some(entry) = state.entries.get_mut(&patch.key) else {
            return;
        };
        if entry.version != patch.version {
            debug!(key = %patch.key, "optimistic patch already superseded by a fetch");
            return;
        }
        debug!(key = %patch.key, "rolling back optimistic patch");
        entry.data = Some(patch.snapshot);
        self.emit(&patch.key, entry.status);
    }

    pub fn snapshot(&self, key: &QueryKey) -> Option<EntrySnapshot> {
        self.state().entries.get(key).map(Entry::snapshot)
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.state().entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry. Fetches still running finish into the void.
    pub fn reset(&self) {
        let keys: Vec<QueryKey> = {
            let mut state = self.state();
            state.entries.drain().map(|(key, _)| key).collect()
        };
        info!(entries = keys.len(), "cache reset");
        for key in &keys {
            self.emit(key, QueryStatus::Uninitialized);
        }
    }

    /// Evict idle entries whose grace period has elapsed. Returns how many
    /// were removed.
    pub fn collect_garbage(&self) -> usize {
        let grace = self.inner.gc_grace;
        let now = Instant::now();
        let mut evicted = Vec::new();
        self.state().entries.retain(|key, entry| {
            let idle = entry.subscribers == 0
                && entry.in_flight.is_none()
                && entry
                    .idle_since
                    .is_some_and(|since| now.duration_since(since) >= grace);
            if idle {
                evicted.push(key.clone());
            }
            !idle
        });
        for key in &evicted {
            debug!(key = %key, "evicted idle entry");
            self.emit(key, QueryStatus::Uninitialized);
        }
        evicted.len()
    }

    /// Run [`collect_garbage`](Self::collect_garbage) every `interval` until
    /// the last handle to the cache is dropped.
    pub fn spawn_gc(&self, interval: Duration) -> JoinHandle<()> {
        let weak = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                let evicted = ResourceCache { inner }.collect_garbage();
                if evicted > 0 {
                    debug!(evicted, "cache sweep");
                }
            }
        })
    }
}

/// Snapshot taken before an optimistic update.
#[derive(Debug)]
pub struct OptimisticPatch {
    key: QueryKey,
    snapshot: Value,
    version: u64,
}

impl OptimisticPatch {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }
}

/// A view's hold on a cache entry. Dropping it unsubscribes.
pub struct Subscription {
    cache: ResourceCache,
    key: QueryKey,
}

impl Subscription {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn snapshot(&self) -> EntrySnapshot {
        self.cache.snapshot(&self.key).unwrap_or_default()
    }

    /// Wait until no fetch is running for this entry, then snapshot it.
    pub async fn settled(&self) -> EntrySnapshot {
        while let Some(future) = self.cache.in_flight(&self.key) {
            let _ = future.await;
        }
        self.snapshot()
    }

    /// Retry after an error, or reload on demand.
    pub async fn refetch(&self) -> Option<ApiResult<Value>> {
        self.cache.refetch(&self.key).await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cache.release(&self.key);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("key", &self.key).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_spec(key: &str, calls: Arc<AtomicUsize>) -> QuerySpec {
        QuerySpec::new(QueryKey::bare(key), move || {
            let calls = calls.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(json!({"items": [{"id": 1}], "n": n}))
            }
        })
        .provides(|v| list_tags(ResourceKind::Articles, v))
    }

    #[tokio::test]
    async fn test_query_caches_result() {
        let cache = ResourceCache::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let spec = counting_spec("list", calls.clone());

        assert_eq!(cache.query(spec.clone()).await.unwrap()["n"], 1);
        assert_eq!(cache.query(spec).await.unwrap()["n"], 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidated_unsubscribed_entry_refetches_on_next_use() {
        let cache = ResourceCache::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let spec = counting_spec("list", calls.clone());
        cache.query(spec.clone()).await.unwrap();

        let affected = cache.invalidate(&[ResourceKind::Articles.item(&1u64.into())]);
        assert_eq!(affected, vec![spec.key.clone()]);
        assert!(cache.snapshot(&spec.key).unwrap().stale);
        // nothing subscribed: no eager refetch
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert_eq!(cache.query(spec).await.unwrap()["n"], 2);
    }

    #[tokio::test]
    async fn test_unrelated_tags_do_not_invalidate() {
        let cache = ResourceCache::default();
        let spec = counting_spec("list", Arc::new(AtomicUsize::new(0)));
        cache.query(spec.clone()).await.unwrap();

        assert!(cache.invalidate(&[ResourceKind::PublicFiles.list()]).is_empty());
        assert!(cache.invalidate(&[]).is_empty());
        assert!(!cache.snapshot(&spec.key).unwrap().stale);
    }

    #[tokio::test]
    async fn test_patch_and_rollback() {
        let cache = ResourceCache::default();
        let spec = QuerySpec::new(QueryKey::bare("file"), || async {
            Ok(json!({"id": 3, "is_published": false}))
        });
        cache.query(spec.clone()).await.unwrap();

        let patch = cache
            .patch(&spec.key, |v| v["is_published"] = json!(true))
            .unwrap();
        assert_eq!(
            cache.snapshot(&spec.key).unwrap().data.unwrap()["is_published"],
            true
        );
        cache.rollback(patch);
        assert_eq!(
            cache.snapshot(&spec.key).unwrap().data.unwrap()["is_published"],
            false
        );

        assert!(cache.patch(&QueryKey::bare("missing"), |_| {}).is_none());
    }

    #[tokio::test]
    async fn test_rollback_keeps_newer_fetch_result() {
        let cache = ResourceCache::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let spec = counting_spec("item", calls.clone());
        cache.query(spec.clone()).await.unwrap();

        let patch = cache.patch(&spec.key, |v| v["n"] = json!(99)).unwrap();
        cache.refetch(&spec.key).await.unwrap().unwrap();
        cache.rollback(patch);

        let data = cache.snapshot(&spec.key).unwrap().data.unwrap();
        assert_eq!(data["n"], 2);
    }

    #[tokio::test]
    async fn test_patched_entry_kept_only_while_current() {
        let cache = ResourceCache::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let spec = counting_spec("item", calls.clone());
        cache.query(spec.clone()).await.unwrap();
        let tags = [ResourceKind::Articles.list()];

        let patch = cache.patch(&spec.key, |v| v["n"] = json!(99)).unwrap();
        assert!(cache.invalidate_after_patch(&tags, &patch).is_empty());
        assert!(!cache.snapshot(&spec.key).unwrap().stale);

        cache.refetch(&spec.key).await.unwrap().unwrap();
        assert_eq!(cache.invalidate_after_patch(&tags, &patch), vec![spec.key.clone()]);
        assert!(cache.snapshot(&spec.key).unwrap().stale);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidation_during_first_fetch_marks_result_stale() {
        let cache = ResourceCache::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let spec = QuerySpec::new(QueryKey::bare("list"), move || {
            let calls = counter.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(json!({"items": [{"id": 1}], "n": n}))
            }
        })
        .provides(|v| list_tags(ResourceKind::Articles, v));

        let subscription = cache.subscribe(spec.clone());
        // no tags yet: the entry has never completed a fetch
        cache.invalidate(&[ResourceKind::Articles.list()]);
        // unrelated tags do not matter once the result lands
        cache.invalidate(&[ResourceKind::PublicFiles.list()]);

        let settled = subscription.settled().await;
        assert_eq!(settled.data.unwrap()["n"], 2);
        assert!(!settled.stale);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_reset_drops_entries() {
        let cache = ResourceCache::default();
        cache
            .query(counting_spec("a", Arc::new(AtomicUsize::new(0))))
            .await
            .unwrap();
        assert_eq!(cache.len(), 1);
        cache.reset();
        assert!(cache.is_empty());
    }
}

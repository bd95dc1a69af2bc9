use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use drive_ox::{DriveRequestError, FileQuery};
use futures_util::future::{AbortHandle, Aborted, abortable};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::debug;

use crate::error::QueryError;

/// Structured cache key; the contract between queries, mutations and the
/// cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Session,
    Sessions,
    Files(FileQuery),
    UploadStats(u32),
    CategoryStorage,
}

/// Cache change notifications delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    /// The entry for a key was written.
    Updated(QueryKey),
    /// The entry for a key was marked stale; subscribers should refetch.
    Invalidated(QueryKey),
}

/// One cached entry. The value survives invalidation as a placeholder
/// until the next successful fetch replaces it.
struct Entry {
    /// Cached JSON value.
    value: Value,
    /// Set by [`QueryCache::invalidate`]; cleared on the next write.
    stale: bool,
}

/// Book-keeping behind the cache lock.
struct Inner {
    /// Entries keyed by query.
    entries: HashMap<QueryKey, Entry>,
    /// Abort handles of in-flight fetches, per key.
    inflight: HashMap<QueryKey, AbortHandle>,
}

/// Key-addressed store owning the canonical in-memory copy of all fetched
/// data.
///
/// Values are stored as `serde_json::Value`, which keeps optimistic
/// snapshots and rollback a verbatim replace rather than a typed diff.
/// The lock is never held across an await point.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Mutex<Inner>>,
    events: broadcast::Sender<CacheEvent>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(Mutex::new(Inner {
                entries: HashMap::new(),
                inflight: HashMap::new(),
            })),
            events,
        }
    }

    /// Raw cached value for a key, stale or not.
    pub fn get_value(&self, key: &QueryKey) -> Option<Value> {
        self.lock().entries.get(key).map(|e| e.value.clone())
    }

    /// Typed read of the cached value, stale or not.
    pub fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Result<Option<T>, QueryError> {
        match self.get_value(key) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// True when the key holds a fresh (non-stale) entry.
    pub fn contains(&self, key: &QueryKey) -> bool {
        self.lock().entries.get(key).is_some_and(|e| !e.stale)
    }

    /// Store a typed value under the key, clearing staleness.
    pub fn set<T: Serialize>(&self, key: &QueryKey, value: &T) -> Result<(), QueryError> {
        self.set_value(key.clone(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Store a raw value under the key, clearing staleness.
    pub fn set_value(&self, key: QueryKey, value: Value) {
        debug!(?key, "cache set");
        self.lock()
            .entries
            .insert(key.clone(), Entry { value, stale: false });
        let _ = self.events.send(CacheEvent::Updated(key));
    }

    /// Apply an in-place patch to the cached value, if present.
    ///
    /// Returns whether a value existed to patch.
    pub fn modify(&self, key: &QueryKey, patch: impl FnOnce(&mut Value)) -> bool {
        let patched = {
            let mut inner = self.lock();
            match inner.entries.get_mut(key) {
                Some(entry) => {
                    patch(&mut entry.value);
                    true
                }
                None => false,
            }
        };
        if patched {
            let _ = self.events.send(CacheEvent::Updated(key.clone()));
        }
        patched
    }

    /// Restore a key to a previously captured snapshot, verbatim.
    ///
    /// `None` means the key held no entry at snapshot time, so the entry
    /// is removed.
    pub fn restore(&self, key: &QueryKey, snapshot: Option<Value>) {
        debug!(?key, present = snapshot.is_some(), "cache restore");
        {
            let mut inner = self.lock();
            match snapshot {
                Some(value) => {
                    inner
                        .entries
                        .insert(key.clone(), Entry { value, stale: false });
                }
                None => {
                    inner.entries.remove(key);
                }
            }
        }
        let _ = self.events.send(CacheEvent::Updated(key.clone()));
    }

    /// Remove the entry for a key entirely.
    pub fn remove(&self, key: &QueryKey) -> Option<Value> {
        self.lock().entries.remove(key).map(|e| e.value)
    }

    /// Mark the key stale and notify subscribers to refetch.
    ///
    /// The cached value stays in place as a placeholder until the next
    /// successful fetch overwrites it.
    pub fn invalidate(&self, key: &QueryKey) {
        debug!(?key, "cache invalidate");
        if let Some(entry) = self.lock().entries.get_mut(key) {
            entry.stale = true;
        }
        let _ = self.events.send(CacheEvent::Invalidated(key.clone()));
    }

    /// Abort the in-flight fetch registered for the key, if any.
    pub fn cancel(&self, key: &QueryKey) {
        let handle = self.lock().inflight.remove(key);
        if let Some(handle) = handle {
            debug!(?key, "cancelling in-flight fetch");
            handle.abort();
        }
    }

    /// Subscribe to cache events.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    /// Return the fresh cached value for the key, or run the fetch and
    /// store its result.
    ///
    /// The fetch is registered under the key so [`QueryCache::cancel`] can
    /// abort it; an aborted fetch resolves to [`QueryError::Cancelled`]
    /// and leaves the cache untouched. Concurrent fetches for the same key
    /// are not deduplicated; the last write wins.
    pub async fn fetch_with<T, F>(&self, key: &QueryKey, fut: F) -> Result<T, QueryError>
    where
        T: Serialize + DeserializeOwned,
        F: Future<Output = Result<T, DriveRequestError>>,
    {
        if self.contains(key) {
            if let Some(value) = self.get_value(key) {
                return Ok(serde_json::from_value(value)?);
            }
        }

        let (fut, handle) = abortable(fut);
        self.lock().inflight.insert(key.clone(), handle);
        let result = fut.await;
        self.lock().inflight.remove(key);

        match result {
            Ok(Ok(value)) => {
                self.set(key, &value)?;
                Ok(value)
            }
            Ok(Err(err)) => Err(err.into()),
            Err(Aborted) => {
                debug!(?key, "fetch aborted");
                Err(QueryError::Cancelled)
            }
        }
    }

    /// Lock the inner state; poisoning is unrecoverable here.
    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("QueryCache")
            .field("entries", &inner.entries.len())
            .field("inflight", &inner.inflight.len())
            .finish()
    }
}

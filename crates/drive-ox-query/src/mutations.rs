use std::sync::Arc;

use drive_ox::{CreateFileRequest, Drive, FileRecord, UpdateFilePayload};
use serde_json::Value;
use tracing::debug;

use crate::cache::{QueryCache, QueryKey};
use crate::error::QueryError;

/// Collaborator seam for user-visible notifications.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
}

/// Notifier that drops every message; the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn success(&self, _message: &str) {}
}

/// One optimistic cache transaction.
///
/// `begin` cancels the in-flight refetch for the key, snapshots the cached
/// value and applies the patch; exactly one of [`commit`](Self::commit) or
/// [`rollback`](Self::rollback) consumes the transaction, and both settle
/// the key by invalidating it so the next read reconciles with server
/// truth.
#[must_use = "an unresolved transaction leaves the optimistic patch in place"]
pub struct OptimisticTxn {
    cache: QueryCache,
    key: QueryKey,
    snapshot: Option<Value>,
}

impl OptimisticTxn {
    /// Cancel, snapshot, patch, in that order.
    pub fn begin(cache: &QueryCache, key: QueryKey, patch: impl FnOnce(&mut Value)) -> Self {
        cache.cancel(&key);
        let snapshot = cache.get_value(&key);
        if snapshot.is_some() {
            cache.modify(&key, patch);
        }
        debug!(key = ?key, patched = snapshot.is_some(), "optimistic patch applied");
        Self {
            cache: cache.clone(),
            key,
            snapshot,
        }
    }

    /// Keep the optimistic value and settle.
    pub fn commit(self) {
        self.cache.invalidate(&self.key);
    }

    /// Restore the snapshot verbatim (replace, not diff) and settle.
    pub fn rollback(self) {
        debug!(key = ?self.key, "rolling back optimistic patch");
        self.cache.restore(&self.key, self.snapshot);
        self.cache.invalidate(&self.key);
    }
}

/// Optimistic mutation hooks for files and sessions.
///
/// Each mutation takes the caller's cache key for the affected listing so
/// per-view caches patch independently.
#[derive(Clone)]
pub struct FileMutations {
    cache: QueryCache,
    client: Drive,
    notifier: Arc<dyn Notifier>,
}

impl FileMutations {
    pub fn new(cache: QueryCache, client: Drive) -> Self {
        Self {
            cache,
            client,
            notifier: Arc::new(SilentNotifier),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// `PATCH /api/files/{id}` with an optimistic merge into every cached
    /// page under `key`.
    pub async fn update_file(
        &self,
        key: QueryKey,
        id: &str,
        payload: &UpdateFilePayload,
    ) -> Result<FileRecord, QueryError> {
        let patch_value = serde_json::to_value(payload)?;
        let txn = OptimisticTxn::begin(&self.cache, key, |pages| {
            merge_into_pages(pages, id, &patch_value);
        });

        match self.client.update_file(id, payload).await {
            Ok(record) => {
                txn.commit();
                Ok(record)
            }
            Err(err) => {
                txn.rollback();
                Err(err.into())
            }
        }
    }

    /// `POST /api/files/delete` with an optimistic removal of the ids from
    /// every cached page under `key`. Success emits one notification.
    pub async fn delete_files(&self, key: QueryKey, ids: &[String]) -> Result<(), QueryError> {
        let txn = OptimisticTxn::begin(&self.cache, key, |pages| {
            remove_from_pages(pages, ids);
        });

        match self.client.delete_files(ids).await {
            Ok(()) => {
                self.notifier.success("Files deleted successfully");
                txn.commit();
                Ok(())
            }
            Err(err) => {
                txn.rollback();
                Err(err.into())
            }
        }
    }

    /// `DELETE /api/users/sessions/{hash}` with an optimistic removal from
    /// the cached session list.
    pub async fn delete_session(&self, hash: &str) -> Result<(), QueryError> {
        let hash_owned = hash.to_string();
        let txn = OptimisticTxn::begin(&self.cache, QueryKey::Sessions, move |sessions| {
            remove_session(sessions, &hash_owned);
        });

        match self.client.delete_session(hash).await {
            Ok(()) => {
                txn.commit();
                Ok(())
            }
            Err(err) => {
                txn.rollback();
                Err(err.into())
            }
        }
    }

    /// `POST /api/files`. No optimistic patch: the server assigns the
    /// record's identity, so the listing is just invalidated on both
    /// outcomes.
    pub async fn create_file(
        &self,
        key: QueryKey,
        request: &CreateFileRequest,
    ) -> Result<FileRecord, QueryError> {
        let result = self.client.create_file(request).await;
        self.cache.invalidate(&key);
        Ok(result?)
    }
}

impl std::fmt::Debug for FileMutations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileMutations")
            .field("cache", &self.cache)
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

/// Merge the payload's set fields into the record matching `id`, across
/// all pages.
fn merge_into_pages(pages: &mut Value, id: &str, patch: &Value) {
    let Some(patch_obj) = patch.as_object() else {
        return;
    };
    for_each_file(pages, |file| {
        if file.get("id").and_then(Value::as_str) == Some(id) {
            if let Some(obj) = file.as_object_mut() {
                for (field, value) in patch_obj {
                    obj.insert(field.clone(), value.clone());
                }
            }
        }
    });
}

/// Remove every record whose id appears in `ids`, across all pages.
fn remove_from_pages(pages: &mut Value, ids: &[String]) {
    let Some(pages) = pages.as_array_mut() else {
        return;
    };
    for page in pages {
        if let Some(files) = page.get_mut("files").and_then(Value::as_array_mut) {
            files.retain(|file| {
                file.get("id")
                    .and_then(Value::as_str)
                    .is_none_or(|id| !ids.iter().any(|d| d == id))
            });
        }
    }
}

/// Remove the session whose hash matches, from the cached session list.
fn remove_session(sessions: &mut Value, hash: &str) {
    if let Some(list) = sessions.as_array_mut() {
        list.retain(|session| {
            session.get("hash").and_then(Value::as_str) != Some(hash)
        });
    }
}

/// Visit every file object in a cached page sequence.
fn for_each_file(pages: &mut Value, mut visit: impl FnMut(&mut Value)) {
    if let Some(pages) = pages.as_array_mut() {
        for page in pages {
            if let Some(files) = page.get_mut("files").and_then(Value::as_array_mut) {
                for file in files {
                    visit(file);
                }
            }
        }
    }
}

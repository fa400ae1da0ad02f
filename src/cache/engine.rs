//! Cache Engine Module
//!
//! Namespaced TTL cache over a shared [`StorageAdapter`].

use std::path::PathBuf;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, DEFAULT_NAMESPACE};
use crate::error::{CacheError, Result};
use crate::storage::{FileStorage, MemoryStorage, StorageAdapter};

// == Cache Engine ==
/// TTL cache whose keys all live under one fixed namespace.
///
/// Expiry is always judged against the wall clock at call time, so `get` and
/// `is_expired` may change their answer without any write.
#[derive(Clone)]
pub struct CacheEngine {
    storage: Arc<dyn StorageAdapter>,
    namespace: String,
}

impl std::fmt::Debug for CacheEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheEngine")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl CacheEngine {
    // == Constructor ==
    /// Creates an engine over `storage` scoped to `namespace`.
    ///
    /// Fails with [`CacheError::Configuration`] if the namespace is empty.
    pub fn new(storage: Arc<dyn StorageAdapter>, namespace: impl Into<String>) -> Result<Self> {
        let namespace = namespace.into();
        if namespace.trim().is_empty() {
            return Err(CacheError::Configuration(
                "The cache need a storage namespace".to_string(),
            ));
        }

        Ok(Self { storage, namespace })
    }

    /// Creates an engine over fresh in-memory storage.
    pub fn session(namespace: impl Into<String>) -> Result<Self> {
        Self::new(Arc::new(MemoryStorage::new()), namespace)
    }

    /// Creates an engine persisted as JSON under `dir`.
    pub fn persistent(dir: impl Into<PathBuf>, namespace: impl Into<String>) -> Result<Self> {
        Self::new(Arc::new(FileStorage::new(dir)), namespace)
    }

    /// Creates a session engine under the default namespace.
    pub fn session_default() -> Result<Self> {
        Self::session(DEFAULT_NAMESPACE)
    }

    /// The namespace every key of this engine lives under.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    // == Put ==
    /// Stores `value` under `key`, expiring `ttl_seconds` from now.
    ///
    /// Any existing entry at that key is replaced.
    pub async fn put(&self, key: &str, value: Value, ttl_seconds: u64) -> Result<()> {
        let entry = CacheEntry::new(value, ttl_seconds);
        self.storage.set_item(&self.namespace, key, entry).await?;
        debug!(namespace = %self.namespace, key, ttl_seconds, "Cached value");
        Ok(())
    }

    /// Serializes `value` and stores it like [`CacheEngine::put`].
    pub async fn put_as<T: Serialize>(&self, key: &str, value: &T, ttl_seconds: u64) -> Result<()> {
        self.put(key, serde_json::to_value(value)?, ttl_seconds).await
    }

    // == Is Cached ==
    /// Returns true if an entry exists under `key`, expired or not.
    pub async fn is_cached(&self, key: &str) -> Result<bool> {
        self.storage.item_exists(&self.namespace, key).await
    }

    // == Is Expired ==
    /// Returns true if `key` is not cached at all, or its entry is stale.
    ///
    /// Both cases mean the value cannot be trusted.
    pub async fn is_expired(&self, key: &str) -> Result<bool> {
        match self.storage.get_item(&self.namespace, key).await? {
            Some(entry) => Ok(entry.is_expired()),
            None => Ok(true),
        }
    }

    // == Get ==
    /// Returns the value under `key`.
    ///
    /// Fails with [`CacheError::NotCached`] if absent and [`CacheError::Expired`]
    /// if stale. Reading never deletes an expired entry.
    pub async fn get(&self, key: &str) -> Result<Value> {
        let entry = self.entry(key).await?;
        if entry.is_expired() {
            return Err(CacheError::Expired(key.to_string()));
        }
        Ok(entry.value)
    }

    /// Returns the value under `key` deserialized as `T`.
    pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        Ok(serde_json::from_value(self.get(key).await?)?)
    }

    /// Returns the remaining lifetime of `key` in seconds, 0 once expired.
    pub async fn ttl_remaining(&self, key: &str) -> Result<u64> {
        Ok(self.entry(key).await?.ttl_remaining())
    }

    async fn entry(&self, key: &str) -> Result<CacheEntry> {
        self.storage
            .get_item(&self.namespace, key)
            .await?
            .ok_or_else(|| CacheError::NotCached(key.to_string()))
    }

    // == Remove ==
    /// Deletes the entry under `key`; returns whether a deletion happened.
    pub async fn remove(&self, key: &str) -> Result<bool> {
        self.storage.remove_item(&self.namespace, key).await
    }

    // == Remove All ==
    /// Deletes every entry of the namespace.
    pub async fn remove_all(&self) -> Result<()> {
        self.storage.clear_namespace(&self.namespace).await?;
        debug!(namespace = %self.namespace, "Cleared namespace");
        Ok(())
    }

    // == Clean ==
    /// Deletes every expired entry and returns how many were removed.
    ///
    /// Stops at the first failed deletion with [`CacheError::CleanFailure`];
    /// entries deleted before that point stay deleted. The scan is not isolated
    /// from concurrent writers.
    pub async fn clean(&self) -> Result<usize> {
        let items = self.storage.get_items(&self.namespace).await?;
        let mut removed = 0;

        for (key, entry) in items {
            if !entry.is_expired() {
                continue;
            }

            match self.remove(&key).await {
                Ok(true) => removed += 1,
                Ok(false) => {
                    warn!(namespace = %self.namespace, key = %key, "Expired entry vanished during clean");
                    return Err(CacheError::CleanFailure(key));
                }
                Err(err) => {
                    warn!(namespace = %self.namespace, key = %key, error = %err, "Failed to remove expired entry");
                    return Err(CacheError::CleanFailure(key));
                }
            }
        }

        debug!(namespace = %self.namespace, removed, "Cleaned expired entries");
        Ok(removed)
    }

    // == Count ==
    /// Returns the number of entries in the namespace, expired or not.
    pub async fn count_values_cached(&self) -> Result<usize> {
        self.storage.count_items(&self.namespace).await
    }
}

//! Storage Module
//!
//! Namespace-scoped key/value backends holding [`CacheEntry`] records.
//!
//! The cache engine treats a backend as passive and shared: it provides atomic
//! single-key reads and writes, but nothing spans several keys.

mod file;
mod memory;

use async_trait::async_trait;

use crate::cache::CacheEntry;
use crate::error::Result;

pub use file::FileStorage;
pub use memory::MemoryStorage;

// == Storage Adapter ==
/// Backend contract consumed by [`crate::cache::CacheEngine`].
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    /// Returns true if an entry exists under (namespace, key).
    async fn item_exists(&self, namespace: &str, key: &str) -> Result<bool>;

    /// Reads the entry under (namespace, key), if any.
    async fn get_item(&self, namespace: &str, key: &str) -> Result<Option<CacheEntry>>;

    /// Writes the entry under (namespace, key), replacing any previous one.
    async fn set_item(&self, namespace: &str, key: &str, entry: CacheEntry) -> Result<()>;

    /// Removes the entry under (namespace, key).
    ///
    /// Returns `false` when nothing was removed.
    async fn remove_item(&self, namespace: &str, key: &str) -> Result<bool>;

    /// Removes every entry of the namespace. Clearing an empty namespace is a no-op.
    async fn clear_namespace(&self, namespace: &str) -> Result<()>;

    /// Snapshots every (key, entry) pair of the namespace.
    async fn get_items(&self, namespace: &str) -> Result<Vec<(String, CacheEntry)>>;

    /// Counts the entries of the namespace.
    async fn count_items(&self, namespace: &str) -> Result<usize>;
}

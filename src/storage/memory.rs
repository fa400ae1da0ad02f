//! In-memory storage backend
//!
//! Session-lifetime storage: everything is lost when the backend is dropped.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::CacheEntry;
use crate::error::Result;
use crate::storage::StorageAdapter;

type Namespace = HashMap<String, CacheEntry>;

// == Memory Storage ==
/// HashMap-backed storage partitioned by namespace.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    namespaces: RwLock<HashMap<String, Namespace>>,
}

impl MemoryStorage {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageAdapter for MemoryStorage {
    async fn item_exists(&self, namespace: &str, key: &str) -> Result<bool> {
        let namespaces = self.namespaces.read().await;
        Ok(namespaces
            .get(namespace)
            .is_some_and(|items| items.contains_key(key)))
    }

    async fn get_item(&self, namespace: &str, key: &str) -> Result<Option<CacheEntry>> {
        let namespaces = self.namespaces.read().await;
        Ok(namespaces
            .get(namespace)
            .and_then(|items| items.get(key))
            .cloned())
    }

    async fn set_item(&self, namespace: &str, key: &str, entry: CacheEntry) -> Result<()> {
        let mut namespaces = self.namespaces.write().await;
        namespaces
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), entry);
        Ok(())
    }

    async fn remove_item(&self, namespace: &str, key: &str) -> Result<bool> {
        let mut namespaces = self.namespaces.write().await;
        Ok(namespaces
            .get_mut(namespace)
            .and_then(|items| items.remove(key))
            .is_some())
    }

    async fn clear_namespace(&self, namespace: &str) -> Result<()> {
        self.namespaces.write().await.remove(namespace);
        Ok(())
    }

    async fn get_items(&self, namespace: &str) -> Result<Vec<(String, CacheEntry)>> {
        let namespaces = self.namespaces.read().await;
        Ok(namespaces
            .get(namespace)
            .map(|items| {
                items
                    .iter()
                    .map(|(key, entry)| (key.clone(), entry.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn count_items(&self, namespace: &str) -> Result<usize> {
        let namespaces = self.namespaces.read().await;
        Ok(namespaces.get(namespace).map_or(0, HashMap::len))
    }
}

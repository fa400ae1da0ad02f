//! Persistent storage backend
//!
//! Stores each namespace as one JSON document (`<dir>/<namespace>.json`) so the
//! cache survives process restarts.

use std::collections::HashMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex, OnceLock, PoisonError};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::fs;
use tokio::sync::Mutex;

use crate::cache::CacheEntry;
use crate::error::{CacheError, Result};
use crate::storage::StorageAdapter;

type Namespace = HashMap<String, CacheEntry>;

/// One lock per cache directory, shared by every `FileStorage` of the process.
static DIR_LOCKS: OnceLock<StdMutex<HashMap<PathBuf, Arc<Mutex<()>>>>> = OnceLock::new();

fn dir_lock(dir: &Path) -> Arc<Mutex<()>> {
    // Canonical paths make `cache`, `./cache` and symlinks share a lock.
    // Creating the directory first lets canonicalize succeed on a fresh dir.
    let _ = std::fs::create_dir_all(dir);
    let key = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());

    let mut locks = DIR_LOCKS
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    locks.entry(key).or_default().clone()
}

// == File Storage ==
/// JSON-file storage rooted at a directory.
///
/// Writes go to a uniquely named temporary file that is renamed over the
/// namespace file, so a reader sees either the previous document or the new
/// one. Read-modify-write cycles are serialized across every instance opened
/// on the same directory within this process.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl FileStorage {
    /// Creates a backend storing namespaces under `dir`, creating the
    /// directory when possible.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let lock = dir_lock(&dir);
        Self { dir, lock }
    }

    /// Directory holding the namespace files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn namespace_path(&self, namespace: &str) -> Result<PathBuf> {
        if namespace.is_empty()
            || namespace == "."
            || namespace == ".."
            || namespace.contains(['/', '\\'])
        {
            return Err(CacheError::Configuration(format!(
                "Namespace '{}' cannot be used as a file name",
                namespace
            )));
        }
        Ok(self.dir.join(format!("{}.json", namespace)))
    }

    async fn load(&self, namespace: &str) -> Result<Namespace> {
        let path = self.namespace_path(namespace)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Namespace::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn store(&self, namespace: &str, items: &Namespace) -> Result<()> {
        let path = self.namespace_path(namespace)?;
        let bytes = serde_json::to_vec(items)?;
        let dir = self.dir.clone();

        tokio::task::spawn_blocking(move || -> Result<()> {
            std::fs::create_dir_all(&dir)?;
            let mut tmp = NamedTempFile::new_in(&dir)?;
            tmp.write_all(&bytes)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| CacheError::Storage(format!("Cache write task failed: {}", e)))?
    }
}

#[async_trait]
impl StorageAdapter for FileStorage {
    async fn item_exists(&self, namespace: &str, key: &str) -> Result<bool> {
        let _guard = self.lock.lock().await;
        Ok(self.load(namespace).await?.contains_key(key))
    }

    async fn get_item(&self, namespace: &str, key: &str) -> Result<Option<CacheEntry>> {
        let _guard = self.lock.lock().await;
        Ok(self.load(namespace).await?.remove(key))
    }

    async fn set_item(&self, namespace: &str, key: &str, entry: CacheEntry) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut items = self.load(namespace).await?;
        items.insert(key.to_string(), entry);
        self.store(namespace, &items).await
    }

    async fn remove_item(&self, namespace: &str, key: &str) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let mut items = self.load(namespace).await?;
        if items.remove(key).is_none() {
            return Ok(false);
        }
        self.store(namespace, &items).await?;
        Ok(true)
    }

    async fn clear_namespace(&self, namespace: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let path = self.namespace_path(namespace)?;
        match fs::remove_file(&path).await {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }

    async fn get_items(&self, namespace: &str) -> Result<Vec<(String, CacheEntry)>> {
        let _guard = self.lock.lock().await;
        Ok(self.load(namespace).await?.into_iter().collect())
    }

    async fn count_items(&self, namespace: &str) -> Result<usize> {
        let _guard = self.lock.lock().await;
        Ok(self.load(namespace).await?.len())
    }
}

//! Configuration Module
//!
//! Handles loading cache and transport configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::cache::{CacheEngine, DEFAULT_NAMESPACE};
use crate::error::Result;
use crate::tasks::spawn_clean_task;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace of the cache engine
    pub namespace: String,
    /// Directory of the persistent cache; None keeps the cache in memory
    pub cache_dir: Option<PathBuf>,
    /// Root URL of the API
    pub base_url: String,
    /// Background clean task interval
    pub clean_interval: Duration,
    /// Timeout applied to every live HTTP call
    pub http_timeout: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_CACHE_NAMESPACE` - Cache namespace (default: "Cache")
    /// - `API_CACHE_DIR` - Persistent cache directory (default: unset, in-memory)
    /// - `API_CACHE_BASE_URL` - API root URL (default: "http://localhost")
    /// - `API_CACHE_CLEAN_INTERVAL` - Clean frequency in seconds (default: 60)
    /// - `API_CACHE_HTTP_TIMEOUT` - HTTP timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            namespace: env::var("API_CACHE_NAMESPACE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.namespace),
            cache_dir: env::var("API_CACHE_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            base_url: env::var("API_CACHE_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.base_url),
            clean_interval: env::var("API_CACHE_CLEAN_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.clean_interval),
            http_timeout: env::var("API_CACHE_HTTP_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
        }
    }

    /// Builds the configured engine: persistent when `cache_dir` is set,
    /// in-memory otherwise.
    pub fn build_engine(&self) -> Result<CacheEngine> {
        match &self.cache_dir {
            Some(dir) => CacheEngine::persistent(dir.clone(), self.namespace.clone()),
            None => CacheEngine::session(self.namespace.clone()),
        }
    }

    /// Starts the background clean of `cache` every `clean_interval`.
    pub fn spawn_clean_task(&self, cache: &CacheEngine) -> JoinHandle<()> {
        spawn_clean_task(cache.clone(), self.clean_interval)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            cache_dir: None,
            base_url: "http://localhost".to_string(),
            clean_interval: Duration::from_secs(60),
            http_timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.namespace, "Cache");
        assert!(config.cache_dir.is_none());
        assert_eq!(config.base_url, "http://localhost");
        assert_eq!(config.clean_interval, Duration::from_secs(60));
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("API_CACHE_NAMESPACE");
        env::remove_var("API_CACHE_DIR");
        env::remove_var("API_CACHE_BASE_URL");
        env::remove_var("API_CACHE_CLEAN_INTERVAL");
        env::remove_var("API_CACHE_HTTP_TIMEOUT");

        let config = Config::from_env();
        assert_eq!(config.namespace, "Cache");
        assert!(config.cache_dir.is_none());
        assert_eq!(config.base_url, "http://localhost");
        assert_eq!(config.clean_interval, Duration::from_secs(60));
    }

    #[test]
    fn test_empty_namespace_is_rejected_at_build() {
        let config = Config {
            namespace: String::new(),
            ..Config::default()
        };
        assert!(config.build_engine().is_err());
    }

    #[tokio::test]
    async fn test_configured_clean_interval() {
        let config = Config {
            clean_interval: Duration::from_millis(100),
            ..Config::default()
        };
        let engine = config.build_engine().unwrap();
        engine.put("stale", json!(1), 0).await.unwrap();
        engine.put("fresh", json!(2), 60).await.unwrap();

        let handle = config.spawn_clean_task(&engine);
        tokio::time::sleep(Duration::from_millis(350)).await;
        handle.abort();

        assert!(!engine.is_cached("stale").await.unwrap());
        assert!(engine.is_cached("fresh").await.unwrap());
    }

    #[tokio::test]
    async fn test_build_persistent_engine() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config {
            namespace: "configured".to_string(),
            cache_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        };

        let engine = config.build_engine().unwrap();
        engine.put("k", json!(1), 60).await.unwrap();

        assert_eq!(engine.namespace(), "configured");
        assert!(dir.path().join("configured.json").exists());
    }
}

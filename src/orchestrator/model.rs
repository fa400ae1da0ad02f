//! Cache-aware request orchestration
//!
//! Decides, per request, between serving a cached response and issuing a live
//! call, and writes successful live responses back into the cache.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::cache::CacheEngine;
use crate::error::{CacheError, Result};
use crate::models::{build_query, ApiResponse, RequestDescriptor};
use crate::orchestrator::RequestStats;
use crate::transport::Transport;

// == Orchestrator Config ==
/// Immutable wiring of one orchestrator.
#[derive(Clone)]
pub struct OrchestratorConfig {
    /// API root, e.g. `https://api.example.com/v1`
    pub base_url: String,
    /// Resource segment placed between the base URL and the action
    pub resource: String,
    /// Cache consulted for descriptors with a TTL
    pub cache: CacheEngine,
    /// Transport for live calls
    pub transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for OrchestratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrchestratorConfig")
            .field("base_url", &self.base_url)
            .field("resource", &self.resource)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

// == Request Outcome ==
/// How one request was answered.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    /// Served from a valid cache entry; no live call happened
    Cached(ApiResponse),
    /// Live call succeeded
    Live(ApiResponse),
    /// Live call failed; nothing was cached
    Failed(ApiResponse),
}

impl RequestOutcome {
    /// True for cached and successful live responses.
    pub fn is_success(&self) -> bool {
        !matches!(self, RequestOutcome::Failed(_))
    }

    /// True if no live call was needed.
    pub fn is_from_cache(&self) -> bool {
        matches!(self, RequestOutcome::Cached(_))
    }

    /// The response payload, whatever its origin.
    pub fn response(&self) -> &ApiResponse {
        match self {
            RequestOutcome::Cached(r) | RequestOutcome::Live(r) | RequestOutcome::Failed(r) => r,
        }
    }

    /// Consumes the outcome, returning its payload.
    pub fn into_response(self) -> ApiResponse {
        match self {
            RequestOutcome::Cached(r) | RequestOutcome::Live(r) | RequestOutcome::Failed(r) => r,
        }
    }
}

// == Request Orchestrator ==
/// Serves requests of one API resource through the cache.
///
/// Concurrent requests for the same key are not deduplicated: each checks the
/// cache on its own, and when both miss both call live and the last response to
/// arrive wins the cache slot.
#[derive(Debug, Clone)]
pub struct RequestOrchestrator {
    config: OrchestratorConfig,
    stats: Arc<Mutex<RequestStats>>,
}

impl RequestOrchestrator {
    // == Constructor ==
    /// Creates an orchestrator, rejecting an empty base URL or resource.
    pub fn new(config: OrchestratorConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(CacheError::Configuration(
                "The base url of the API is not set".to_string(),
            ));
        }
        if config.resource.trim().is_empty() {
            return Err(CacheError::Configuration(
                "The orchestrator needs a resource name".to_string(),
            ));
        }

        Ok(Self {
            config,
            stats: Arc::new(Mutex::new(RequestStats::new())),
        })
    }

    /// The wiring this orchestrator was built with.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// The cache this orchestrator reads and writes.
    pub fn cache(&self) -> &CacheEngine {
        &self.config.cache
    }

    /// Snapshot of the request counters.
    pub async fn stats(&self) -> RequestStats {
        self.stats.lock().await.clone()
    }

    // == URL ==
    /// Full URL of a descriptor: `{base_url}/{resource}/{action}`, plus the
    /// serialized parameters as query string for GET-style verbs.
    ///
    /// Query values are percent-encoded; the cache key keeps them raw.
    pub fn build_url(&self, descriptor: &RequestDescriptor) -> String {
        let url = format!(
            "{}/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.resource,
            descriptor.action
        );

        if descriptor.method.uses_query_string() && !descriptor.params.is_empty() {
            let query = build_query(&descriptor.params);
            if !query.is_empty() {
                return format!("{}?{}", url, query);
            }
        }
        url
    }

    // == Request ==
    /// Answers `descriptor` from the cache or through a live call.
    ///
    /// - no TTL: always live, the cache is neither read nor written
    /// - TTL and a valid entry (unless `force_refresh`): served from the cache
    /// - otherwise live; a success is cached under the descriptor's key
    ///
    /// A malformed descriptor fails before the cache or transport is touched.
    pub async fn request(
        &self,
        descriptor: &RequestDescriptor,
        force_refresh: bool,
    ) -> Result<RequestOutcome> {
        descriptor.validate()?;

        let Some(ttl_seconds) = descriptor.ttl_seconds else {
            return Ok(self.call_live(descriptor, None).await);
        };

        let key = descriptor.build_cache_key();
        if force_refresh {
            debug!(key = %key, "Forced refresh, bypassing cache");
            self.stats.lock().await.record_forced();
        } else if !self.config.cache.is_expired(&key).await? {
            match self.config.cache.get_as::<ApiResponse>(&key).await {
                Ok(cached) => {
                    debug!(key = %key, "Cache hit");
                    self.stats.lock().await.record_hit();
                    return Ok(RequestOutcome::Cached(cached));
                }
                // Expired or removed since the check
                Err(CacheError::Expired(_)) | Err(CacheError::NotCached(_)) => {
                    debug!(key = %key, "Cache entry vanished after validity check");
                    self.stats.lock().await.record_miss();
                }
                // Something other than a response sits under the key; the
                // live response replaces it
                Err(CacheError::Serialization(err)) => {
                    warn!(key = %key, error = %err, "Cached value is not a response");
                    self.stats.lock().await.record_miss();
                }
                Err(err) => return Err(err),
            }
        } else {
            debug!(key = %key, "Cache miss");
            self.stats.lock().await.record_miss();
        }

        Ok(self.call_live(descriptor, Some((key, ttl_seconds))).await)
    }

    /// Callback form of [`RequestOrchestrator::request`]: `on_success` or
    /// `on_failure` receives the response data and status.
    pub async fn execute<S, F>(
        &self,
        descriptor: &RequestDescriptor,
        on_success: S,
        on_failure: F,
        force_refresh: bool,
    ) -> Result<()>
    where
        S: FnOnce(Value, u16),
        F: FnOnce(Value, u16),
    {
        match self.request(descriptor, force_refresh).await? {
            RequestOutcome::Cached(r) | RequestOutcome::Live(r) => on_success(r.data, r.status),
            RequestOutcome::Failed(r) => on_failure(r.data, r.status),
        }
        Ok(())
    }

    async fn call_live(
        &self,
        descriptor: &RequestDescriptor,
        cache_slot: Option<(String, u64)>,
    ) -> RequestOutcome {
        let url = self.build_url(descriptor);
        let body = (!descriptor.method.uses_query_string())
            .then(|| Value::Object(descriptor.params.clone()));

        self.stats
            .lock()
            .await
            .record_live_call(cache_slot.is_some());
        debug!(method = %descriptor.method, url = %url, "Issuing live call");

        match self
            .config
            .transport
            .call(descriptor.method, &url, body.as_ref())
            .await
        {
            Ok(response) => {
                if let Some((key, ttl_seconds)) = cache_slot {
                    // The response is still delivered when the write-back fails.
                    if let Err(err) = self.config.cache.put_as(&key, &response, ttl_seconds).await {
                        warn!(key = %key, error = %err, "Failed to cache live response");
                    }
                }
                RequestOutcome::Live(response)
            }
            Err(failure) => {
                debug!(url = %url, status = failure.status, "Live call failed");
                self.stats.lock().await.record_failure();
                RequestOutcome::Failed(failure)
            }
        }
    }
}

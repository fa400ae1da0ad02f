//! Model registry
//!
//! Holds the shared wiring (base URL, cache, transport) and hands out one
//! orchestrator per registered API resource.

use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::CacheEngine;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::orchestrator::{OrchestratorConfig, RequestOrchestrator};
use crate::transport::{HttpTransport, Transport};

// == Model Registry ==
/// Factory of [`RequestOrchestrator`]s sharing one cache and transport.
pub struct ModelRegistry {
    base_url: String,
    cache: Option<CacheEngine>,
    transport: Arc<dyn Transport>,
    /// Model name -> API resource segment
    models: HashMap<String, String>,
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("base_url", &self.base_url)
            .field("cache", &self.cache)
            .field("models", &self.models)
            .finish_non_exhaustive()
    }
}

impl ModelRegistry {
    /// Creates a registry without a cache; one must be set before use.
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.into(),
            cache: None,
            transport,
            models: HashMap::new(),
        }
    }

    /// Builds a registry from configuration: configured engine, HTTP transport.
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = HttpTransport::with_timeout(config.http_timeout)?;
        Ok(Self::new(config.base_url.clone(), Arc::new(transport)).with_cache(config.build_engine()?))
    }

    /// Sets the cache used by orchestrators created afterwards.
    pub fn with_cache(mut self, cache: CacheEngine) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Replaces the base URL used by orchestrators created afterwards.
    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cache(&self) -> Option<&CacheEngine> {
        self.cache.as_ref()
    }

    // == Register ==
    /// Registers `name` as a model served under the `resource` URL segment.
    ///
    /// Re-registering a name replaces its resource.
    pub fn register(&mut self, name: impl Into<String>, resource: impl Into<String>) -> Result<()> {
        let name = name.into();
        let resource = resource.into();
        if resource.trim().is_empty() {
            return Err(CacheError::Configuration(format!(
                "The model {} needs an API resource name",
                name
            )));
        }

        self.models.insert(name, resource);
        Ok(())
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    // == Lookup ==
    /// Creates the orchestrator of a registered model.
    pub fn orchestrator(&self, name: &str) -> Result<RequestOrchestrator> {
        let resource = self.models.get(name).ok_or_else(|| {
            CacheError::Configuration(format!("The model '{}' is not registered", name))
        })?;
        self.create(resource.clone())
    }

    /// Creates an orchestrator for an arbitrary resource segment.
    pub fn create(&self, resource: impl Into<String>) -> Result<RequestOrchestrator> {
        let cache = self.cache.clone().ok_or_else(|| {
            CacheError::Configuration("Set a cache before creating orchestrators".to_string())
        })?;

        RequestOrchestrator::new(OrchestratorConfig {
            base_url: self.base_url.clone(),
            resource: resource.into(),
            cache,
            transport: self.transport.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApiResponse, HttpVerb, RequestDescriptor};
    use crate::transport::TransportResult;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct EchoTransport;

    #[async_trait]
    impl Transport for EchoTransport {
        async fn call(&self, _verb: HttpVerb, url: &str, _body: Option<&Value>) -> TransportResult {
            Ok(ApiResponse::new(json!(url), 200))
        }
    }

    fn create_registry() -> ModelRegistry {
        ModelRegistry::new("http://api.test", Arc::new(EchoTransport))
            .with_cache(CacheEngine::session("registry").unwrap())
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = create_registry();
        registry.register("User", "users").unwrap();

        assert!(registry.is_registered("User"));
        let orchestrator = registry.orchestrator("User").unwrap();
        assert_eq!(orchestrator.config().resource, "users");
        assert_eq!(orchestrator.config().base_url, "http://api.test");
    }

    #[test]
    fn test_unknown_model() {
        let registry = create_registry();
        assert!(matches!(
            registry.orchestrator("Ghost"),
            Err(CacheError::Configuration(_))
        ));
    }

    #[test]
    fn test_register_rejects_empty_resource() {
        let mut registry = create_registry();
        assert!(matches!(
            registry.register("User", ""),
            Err(CacheError::Configuration(_))
        ));
        assert!(!registry.is_registered("User"));
    }

    #[test]
    fn test_missing_cache_is_configuration_error() {
        let registry = ModelRegistry::new("http://api.test", Arc::new(EchoTransport));
        assert!(matches!(
            registry.create("users"),
            Err(CacheError::Configuration(_))
        ));
    }

    #[test]
    fn test_set_base_url_applies_to_later_orchestrators() {
        let mut registry = create_registry();
        registry.register("User", "users").unwrap();
        let before = registry.orchestrator("User").unwrap();

        registry.set_base_url("https://staging.api.test/v2");

        assert_eq!(registry.base_url(), "https://staging.api.test/v2");
        let after = registry.orchestrator("User").unwrap();
        let descriptor = RequestDescriptor::new(HttpVerb::Get, "list");
        assert_eq!(
            after.build_url(&descriptor),
            "https://staging.api.test/v2/users/list"
        );
        assert_eq!(before.build_url(&descriptor), "http://api.test/users/list");
    }

    #[tokio::test]
    async fn test_orchestrators_share_cache() {
        let mut registry = create_registry();
        registry.register("User", "users").unwrap();

        let first = registry.orchestrator("User").unwrap();
        let second = registry.orchestrator("User").unwrap();
        let descriptor = RequestDescriptor::new(HttpVerb::Get, "list").with_ttl(60);

        let live = first.request(&descriptor, false).await.unwrap();
        let cached = second.request(&descriptor, false).await.unwrap();

        assert!(cached.is_from_cache());
        assert_eq!(cached.response(), live.response());
        assert_eq!(live.response().data, json!("http://api.test/users/list"));
        assert_eq!(registry.cache().unwrap().namespace(), "registry");
    }
}

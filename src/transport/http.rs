//! HTTP transport backed by reqwest

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::models::{ApiResponse, HttpVerb};
use crate::transport::{Transport, TransportResult};

// == HTTP Transport ==
/// Live transport over a shared reqwest client.
///
/// 2xx responses succeed; any other status, or a call that never got a
/// response, is a failure.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with reqwest defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport whose calls time out after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CacheError::Configuration(format!("Cannot build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Wraps an already configured client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

fn method_for(verb: HttpVerb) -> Method {
    match verb {
        HttpVerb::Get => Method::GET,
        HttpVerb::Head => Method::HEAD,
        HttpVerb::Delete => Method::DELETE,
        HttpVerb::Options => Method::OPTIONS,
        HttpVerb::Post => Method::POST,
        HttpVerb::Put => Method::PUT,
        HttpVerb::Patch => Method::PATCH,
    }
}

/// Decodes a body as JSON, falling back to plain text; empty bodies are null.
fn decode_body(text: String) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(&self, verb: HttpVerb, url: &str, body: Option<&Value>) -> TransportResult {
        let mut request = self.client.request(method_for(verb), url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            debug!(%verb, url, error = %e, "HTTP call failed before a response");
            ApiResponse::network_error(e.to_string())
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiResponse::network_error(e.to_string()))?;
        let payload = ApiResponse::new(decode_body(text), status.as_u16());

        debug!(%verb, url, status = status.as_u16(), "HTTP call completed");
        if status.is_success() {
            Ok(payload)
        } else {
            Err(payload)
        }
    }
}

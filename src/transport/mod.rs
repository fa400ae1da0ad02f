//! Transport Module
//!
//! The seam through which live API calls are issued. Retries, backoff and
//! timeouts belong to the transport, never to the cache.

mod http;

use async_trait::async_trait;
use serde_json::Value;

use crate::models::{ApiResponse, HttpVerb};

pub use http::HttpTransport;

/// Outcome of one live call: `Ok` on success, `Err` carrying the failure payload.
pub type TransportResult = std::result::Result<ApiResponse, ApiResponse>;

// == Transport ==
/// Issues one live API call.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Calls `url` with `verb`; `body` is set only for body-carrying verbs.
    async fn call(&self, verb: HttpVerb, url: &str, body: Option<&Value>) -> TransportResult;
}

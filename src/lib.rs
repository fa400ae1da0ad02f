//! API Cache - A client-side TTL cache for remote API responses
//!
//! Stores responses keyed by request signature, serves them until their TTL
//! expires, and falls back to a live call on expiry or on demand.

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod storage;
pub mod tasks;
pub mod transport;

pub use cache::CacheEngine;
pub use config::Config;
pub use error::{CacheError, Result};
pub use models::{ApiResponse, HttpVerb, RequestDescriptor};
pub use orchestrator::{ModelRegistry, RequestOrchestrator, RequestOutcome};
pub use tasks::spawn_clean_task;

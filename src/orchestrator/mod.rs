//! Orchestrator Module
//!
//! Cache-aware request orchestration on top of the cache engine and transport.

mod model;
mod registry;
mod stats;

pub use model::{OrchestratorConfig, RequestOrchestrator, RequestOutcome};
pub use registry::ModelRegistry;
pub use stats::RequestStats;

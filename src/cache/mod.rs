//! Cache Module
//!
//! Provides the namespaced TTL cache engine and its stored entry type.

mod engine;
mod entry;


// Re-export public types
pub use engine::CacheEngine;
pub use entry::CacheEntry;

// == Public Constants ==
/// Namespace used when none is configured
pub const DEFAULT_NAMESPACE: &str = "Cache";

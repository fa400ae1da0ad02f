//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the cache.
//!
//! # Tasks
//! - Clean: Removes expired cache entries at configured intervals

mod cleanup;

pub use cleanup::spawn_clean_task;

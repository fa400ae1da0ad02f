//! Cache Entry Module
//!
//! Defines the stored record for a cached value and its absolute expiration.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Cache Entry ==
/// A cached value paired with the instant it stops being trustworthy.
///
/// Entries are never mutated in place: a new `put` replaces the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The stored value
    pub value: Value,
    /// Absolute expiration instant
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry expiring `ttl_seconds` from now.
    ///
    /// A TTL too large to represent saturates to the maximum UTC instant.
    pub fn new(value: Value, ttl_seconds: u64) -> Self {
        Self {
            value,
            expires_at: expiration_from_now(ttl_seconds),
        }
    }

    /// Creates an entry with an explicit expiration instant.
    pub fn with_expiration(value: Value, expires_at: DateTime<Utc>) -> Self {
        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks the entry against the wall clock at call time.
    ///
    /// Boundary condition: an entry is expired once now >= `expires_at`, so a
    /// zero TTL is stale immediately after creation.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Checks the entry against a given instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    // == Time To Live ==
    /// Returns the remaining lifetime in whole seconds, 0 once expired.
    pub fn ttl_remaining(&self) -> u64 {
        let remaining = self.expires_at - Utc::now();
        u64::try_from(remaining.num_seconds()).unwrap_or(0)
    }
}

// == Utility Functions ==
/// Computes `now + ttl_seconds`, saturating on overflow.
fn expiration_from_now(ttl_seconds: u64) -> DateTime<Utc> {
    let now = Utc::now();
    i64::try_from(ttl_seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

//! Cache Entry Module
//!
//! Defines a single cached image object and its TTL check.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::body::Bytes;

// == Cache Entry ==
/// A cached object payload with the metadata needed to serve it.
///
/// Entries are immutable once stored; a re-fetch replaces the entry wholesale.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Logical object key
    pub key: String,
    /// Object bytes (cheap to clone)
    pub data: Bytes,
    /// MIME type derived from the key's extension
    pub content_type: String,
    /// Byte length of `data`
    pub size: usize,
    /// Insertion timestamp (Unix milliseconds)
    pub inserted_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry stamped with the given insertion time.
    ///
    /// `size` is always taken from `data`, so the two can never disagree.
    pub fn new(
        key: impl Into<String>,
        data: Bytes,
        content_type: impl Into<String>,
        inserted_at: u64,
    ) -> Self {
        let size = data.len();
        Self {
            key: key.into(),
            data,
            content_type: content_type.into(),
            size,
            inserted_at,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry is past its TTL at `now_ms`.
    ///
    /// Boundary condition: an entry inserted at `t` is expired at any time
    /// `>= t + ttl`, so once the TTL has fully elapsed it is never served.
    pub fn is_expired_at(&self, now_ms: u64, ttl: Duration) -> bool {
        now_ms >= self.inserted_at.saturating_add(duration_ms(ttl))
    }

    /// Age of the entry in milliseconds at `now_ms`.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.inserted_at)
    }
}

// == Utility Functions ==
/// Whole milliseconds in `d`, saturating at `u64::MAX`.
pub fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Returns current Unix timestamp in milliseconds.
///
/// A clock set before the epoch reads as 0 rather than panicking.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(duration_ms)
        .unwrap_or(0)
}

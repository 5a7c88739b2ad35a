//! Cache Module
//!
//! In-process image cache with TTL expiration and a byte budget enforced by
//! oldest-insertion-first eviction.

mod entry;
mod order;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, duration_ms, CacheEntry};
pub use order::InsertionOrder;
pub use stats::CacheStats;
pub use store::{CacheStore, CleanupReport};

// == Public Constants ==
/// Default byte budget across all cached entries
pub const DEFAULT_MAX_CACHE_TOTAL_SIZE: usize = 50 * 1024 * 1024; // 50 MiB

/// Default largest payload that will be cached
pub const DEFAULT_MAX_CACHEABLE_FILE_SIZE: usize = 1024 * 1024; // 1 MiB

/// Default entry lifetime in seconds
pub const DEFAULT_CACHE_TTL_SECS: u64 = 30 * 60;

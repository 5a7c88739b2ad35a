//! Cache Store Module
//!
//! Bounded byte cache combining HashMap storage with insertion-order eviction
//! and TTL expiration.

use std::collections::HashMap;
use std::time::Duration;

use axum::body::Bytes;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheEntry, CacheStats, InsertionOrder};

// == Cleanup Report ==
/// Number of entries reclaimed by one `cleanup` pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Removed because their TTL elapsed
    pub expired: usize,
    /// Removed, oldest first, to get back under the byte budget
    pub evicted: usize,
}

impl CleanupReport {
    pub fn total(&self) -> usize {
        self.expired + self.evicted
    }
}

// == Cache Store ==
/// In-process image cache bounded by a total byte budget, a per-object size
/// ceiling, and a TTL.
///
/// Eviction is TTL first, then oldest insertion first. Hits never refresh an
/// entry's eviction priority.
#[derive(Debug)]
pub struct CacheStore {
    /// Key to entry storage
    entries: HashMap<String, CacheEntry>,
    /// Keys ordered by insertion time
    order: InsertionOrder,
    /// Performance statistics
    stats: CacheStats,
    /// Sum of `size` over all stored entries
    total_bytes: usize,
    /// Byte budget restored by `cleanup`
    max_total_size: usize,
    /// Largest payload accepted by `insert`
    max_file_size: usize,
    /// Entry lifetime
    ttl: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `max_total_size` - Byte budget across all entries
    /// * `max_file_size` - Largest single payload that will be cached
    /// * `ttl` - Lifetime of an entry after insertion
    pub fn new(max_total_size: usize, max_file_size: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            stats: CacheStats::new(),
            total_bytes: 0,
            max_total_size,
            max_file_size,
            ttl,
        }
    }

    // == Lookup ==
    /// Returns the entry for `key` if present and not expired.
    pub fn lookup(&mut self, key: &str) -> Option<CacheEntry> {
        self.lookup_at(key, current_timestamp_ms())
    }

    /// `lookup` evaluated at an explicit time (Unix milliseconds).
    ///
    /// Expired entries count as a miss and are removed on the way out.
    pub fn lookup_at(&mut self, key: &str, now_ms: u64) -> Option<CacheEntry> {
        let expired = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired_at(now_ms, self.ttl),
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            self.sync_occupancy();
            return None;
        }

        self.stats.record_hit();
        self.entries.get(key).cloned()
    }

    // == Insert ==
    /// Caches `data` under `key`, stamped with the current time.
    ///
    /// Returns false when the payload exceeds the per-object ceiling.
    pub fn insert(&mut self, key: &str, data: Bytes, content_type: &str) -> bool {
        self.insert_at(key, data, content_type, current_timestamp_ms())
    }

    /// `insert` with an explicit insertion timestamp.
    ///
    /// Oversize payloads are a no-op apart from dropping any older entry for
    /// the same key. Otherwise `cleanup` runs before the entry is stored, and
    /// an existing entry for `key` is replaced wholesale.
    pub fn insert_at(&mut self, key: &str, data: Bytes, content_type: &str, now_ms: u64) -> bool {
        if data.len() > self.max_file_size {
            self.remove_entry(key);
            self.stats.record_oversize();
            self.sync_occupancy();
            return false;
        }

        self.cleanup_at(now_ms);
        self.remove_entry(key);

        let entry = CacheEntry::new(key, data, content_type, now_ms);
        self.total_bytes += entry.size;
        self.order.record(key, now_ms);
        self.entries.insert(key.to_string(), entry);

        self.stats.record_insertion();
        self.sync_occupancy();
        true
    }

    // == Cleanup ==
    /// Reclaims expired entries, then evicts oldest entries while over budget.
    pub fn cleanup(&mut self) -> CleanupReport {
        self.cleanup_at(current_timestamp_ms())
    }

    /// `cleanup` evaluated at an explicit time (Unix milliseconds).
    pub fn cleanup_at(&mut self, now_ms: u64) -> CleanupReport {
        let ttl = self.ttl;
        let expired_keys: Vec<String> = self
            .entries
            .values()
            .filter(|entry| entry.is_expired_at(now_ms, ttl))
            .map(|entry| entry.key.clone())
            .collect();

        let mut report = CleanupReport {
            expired: expired_keys.len(),
            evicted: 0,
        };
        for key in &expired_keys {
            self.remove_entry(key);
        }
        self.stats.record_expirations(report.expired);

        while self.total_bytes > self.max_total_size {
            let Some(oldest) = self.order.pop_oldest() else {
                break;
            };
            if let Some(entry) = self.entries.remove(&oldest) {
                self.total_bytes -= entry.size;
                self.stats.record_eviction();
                report.evicted += 1;
            }
        }

        self.sync_occupancy();
        report
    }

    // == Stats ==
    /// Returns a snapshot of the current statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    /// Current sum of cached payload sizes.
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    /// Returns true if an entry (expired or not) is physically stored for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    pub fn max_total_size(&self) -> usize {
        self.max_total_size
    }

    // == Length ==
    /// Returns the number of stored entries, including not-yet-purged expired ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove_entry(&mut self, key: &str) {
        if let Some(entry) = self.entries.remove(key) {
            self.total_bytes -= entry.size;
            self.order.remove(key);
        }
    }

    fn sync_occupancy(&mut self) {
        self.stats.set_occupancy(self.entries.len(), self.total_bytes);
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const KIB: usize = 1024;
    const TTL: Duration = Duration::from_secs(1800);

    fn bytes(len: usize) -> Bytes {
        Bytes::from(vec![0xAB; len])
    }

    fn store() -> CacheStore {
        CacheStore::new(10 * KIB, 4 * KIB, TTL)
    }

    #[test]
    fn test_store_new() {
        let store = store();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.total_bytes(), 0);
    }

    #[test]
    fn test_store_insert_and_lookup() {
        let mut store = store();

        assert!(store.insert_at("hero/sunset.jpg", bytes(2 * KIB), "image/jpeg", 1_000));
        let entry = store.lookup_at("hero/sunset.jpg", 2_000).unwrap();

        assert_eq!(entry.size, 2 * KIB);
        assert_eq!(entry.content_type, "image/jpeg");
        assert_eq!(entry.inserted_at, 1_000);
        assert_eq!(store.total_bytes(), 2 * KIB);
    }

    #[test]
    fn test_store_lookup_missing() {
        let mut store = store();
        assert!(store.lookup_at("nope.png", 0).is_none());
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_wall_clock_roundtrip() {
        let mut store = store();

        assert!(store.insert("a.webp", bytes(100), "image/webp"));
        let entry = store.lookup("a.webp").unwrap();
        assert_eq!(entry.data, bytes(100));
    }

    #[test]
    fn test_store_replace_entry() {
        let mut store = store();

        store.insert_at("a.jpg", bytes(KIB), "image/jpeg", 1_000);
        store.insert_at("a.jpg", bytes(3 * KIB), "image/jpeg", 2_000);

        let entry = store.lookup_at("a.jpg", 2_500).unwrap();
        assert_eq!(entry.size, 3 * KIB);
        assert_eq!(entry.inserted_at, 2_000);
        assert_eq!(store.len(), 1);
        assert_eq!(store.total_bytes(), 3 * KIB);
    }

    #[test]
    fn test_store_oversize_is_noop() {
        let mut store = store();

        assert!(!store.insert_at("big.png", bytes(4 * KIB + 1), "image/png", 1_000));
        assert!(store.is_empty());
        assert_eq!(store.stats().rejected_oversize, 1);
    }

    #[test]
    fn test_store_exact_ceiling_is_cached() {
        let mut store = store();
        assert!(store.insert_at("edge.png", bytes(4 * KIB), "image/png", 1_000));
        assert!(store.contains("edge.png"));
    }

    #[test]
    fn test_store_oversize_drops_stale_version() {
        let mut store = store();

        store.insert_at("grew.jpg", bytes(KIB), "image/jpeg", 1_000);
        store.insert_at("grew.jpg", bytes(8 * KIB), "image/jpeg", 2_000);

        assert!(!store.contains("grew.jpg"));
        assert_eq!(store.total_bytes(), 0);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = store();
        store.insert_at("a.jpg", bytes(KIB), "image/jpeg", 1_000);

        let ttl_ms = TTL.as_millis() as u64;
        assert!(store.lookup_at("a.jpg", 1_000 + ttl_ms - 1).is_some());
        assert!(store.lookup_at("a.jpg", 1_000 + ttl_ms).is_none());

        // Expired lookup purges the entry
        assert!(!store.contains("a.jpg"));
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_cleanup_removes_expired_first() {
        let mut store = store();
        let ttl_ms = TTL.as_millis() as u64;

        store.insert_at("old.jpg", bytes(KIB), "image/jpeg", 0);
        store.insert_at("new.jpg", bytes(KIB), "image/jpeg", ttl_ms / 2);

        let report = store.cleanup_at(ttl_ms);
        assert_eq!(report, CleanupReport { expired: 1, evicted: 0 });
        assert!(!store.contains("old.jpg"));
        assert!(store.contains("new.jpg"));
    }

    #[test]
    fn test_cleanup_evicts_oldest_insertion_first() {
        // Budget of 10 KiB, four 3 KiB entries
        let mut store = store();

        store.insert_at("a.jpg", bytes(3 * KIB), "image/jpeg", 1);
        store.insert_at("b.jpg", bytes(3 * KIB), "image/jpeg", 2);
        store.insert_at("c.jpg", bytes(3 * KIB), "image/jpeg", 3);
        store.insert_at("d.jpg", bytes(3 * KIB), "image/jpeg", 4);
        // Insert runs cleanup before storing, so the budget may be exceeded
        // by the newest entry until the next cleanup.
        assert_eq!(store.total_bytes(), 12 * KIB);

        let report = store.cleanup_at(5);
        assert_eq!(report.evicted, 1);
        assert!(!store.contains("a.jpg"));
        assert!(store.contains("b.jpg"));
        assert!(store.total_bytes() <= 10 * KIB);
    }

    #[test]
    fn test_hits_do_not_refresh_eviction_priority() {
        let mut store = store();

        store.insert_at("a.jpg", bytes(4 * KIB), "image/jpeg", 1);
        store.insert_at("b.jpg", bytes(4 * KIB), "image/jpeg", 2);
        for now in 3..10 {
            assert!(store.lookup_at("a.jpg", now).is_some());
        }
        store.insert_at("c.jpg", bytes(4 * KIB), "image/jpeg", 10);
        store.cleanup_at(11);

        // a.jpg was hit repeatedly but is still the oldest insertion
        assert!(!store.contains("a.jpg"));
        assert!(store.contains("b.jpg"));
        assert!(store.contains("c.jpg"));
    }

    #[test]
    fn test_insert_cleanup_reclaims_before_storing() {
        let mut store = store();

        store.insert_at("a.jpg", bytes(4 * KIB), "image/jpeg", 1);
        store.insert_at("b.jpg", bytes(4 * KIB), "image/jpeg", 2);
        store.insert_at("c.jpg", bytes(4 * KIB), "image/jpeg", 3);
        // 12 KiB > 10 KiB: the next insert's cleanup evicts a.jpg first
        store.insert_at("d.jpg", bytes(KIB), "image/jpeg", 4);

        assert!(!store.contains("a.jpg"));
        assert_eq!(store.total_bytes(), 9 * KIB);
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_stats() {
        let mut store = store();

        store.insert_at("a.jpg", bytes(KIB), "image/jpeg", 1);
        store.lookup_at("a.jpg", 2);
        store.lookup_at("b.jpg", 2);

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.insertions, 1);
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.total_bytes, KIB);
    }
}

//! Cache Cleanup Task
//!
//! Background task that periodically drops expired entries and trims the cache
//! back under its byte budget.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{duration_ms, CacheStore};

/// Shortest interval between cleanup passes.
pub const MIN_CLEANUP_INTERVAL_SECS: u64 = 1;

fn cleanup_period(cleanup_interval_secs: u64) -> Duration {
    Duration::from_secs(cleanup_interval_secs.max(MIN_CLEANUP_INTERVAL_SECS))
}

/// Spawns a background task that periodically cleans up the cache.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between cleanup runs. The cache lock is only held for the cleanup pass
/// itself.
///
/// # Arguments
/// * `cache` - shared handle to the cache, see [`crate::proxy::ImageProxy::cache`]
/// * `cleanup_interval_secs` - Interval in seconds between cleanup runs,
///   raised to [`MIN_CLEANUP_INTERVAL_SECS`] when smaller
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_cleanup_task(
    cache: Arc<Mutex<CacheStore>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    spawn_cleanup_task_every(cache, cleanup_period(cleanup_interval_secs))
}

fn spawn_cleanup_task_every(cache: Arc<Mutex<CacheStore>>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            interval_ms = duration_ms(interval),
            "Starting cache cleanup task"
        );

        loop {
            tokio::time::sleep(interval).await;

            let (report, entries, bytes) = {
                let mut cache_guard = cache.lock().await;
                let report = cache_guard.cleanup();
                (report, cache_guard.len(), cache_guard.total_bytes())
            };

            if report.total() > 0 {
                info!(
                    expired = report.expired,
                    evicted = report.evicted,
                    entries,
                    bytes,
                    "Cache cleanup removed entries"
                );
            } else {
                debug!(entries, bytes, "Cache cleanup: nothing to remove");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;

    fn shared_cache(ttl: Duration) -> Arc<Mutex<CacheStore>> {
        Arc::new(Mutex::new(CacheStore::new(4096, 1024, ttl)))
    }

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let cache = shared_cache(Duration::from_millis(50));
        cache
            .lock()
            .await
            .insert("hero/old.jpg", Bytes::from_static(b"old"), "image/jpeg");

        let handle = spawn_cleanup_task_every(cache.clone(), Duration::from_millis(100));
        tokio::time::sleep(Duration::from_millis(350)).await;

        {
            let cache_guard = cache.lock().await;
            assert!(!cache_guard.contains("hero/old.jpg"));
            assert_eq!(cache_guard.total_bytes(), 0);
            assert_eq!(cache_guard.stats().expirations, 1);
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_fresh_entries() {
        let cache = shared_cache(Duration::from_secs(3600));
        cache
            .lock()
            .await
            .insert("hero/new.jpg", Bytes::from_static(b"new"), "image/jpeg");

        let handle = spawn_cleanup_task_every(cache.clone(), Duration::from_millis(50));
        tokio::time::sleep(Duration::from_millis(200)).await;

        {
            let mut cache_guard = cache.lock().await;
            let entry = cache_guard.lookup("hero/new.jpg");
            assert_eq!(entry.map(|e| e.data), Some(Bytes::from_static(b"new")));
        }

        handle.abort();
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        assert_eq!(cleanup_period(0), Duration::from_secs(1));
        assert_eq!(cleanup_period(60), Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let handle = spawn_cleanup_task(shared_cache(Duration::from_secs(60)), 1);

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}

//! Timeout guard for backing store calls.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use tracing::warn;

use super::{BackingStore, Result, StoreError};
use crate::cache::duration_ms;

// == Timeout Guard ==
/// Wraps another accessor so that no call outlives `limit`.
///
/// A call that runs past the limit is dropped and reported as
/// `StoreError::Timeout`.
pub struct TimeoutStore {
    inner: Arc<dyn BackingStore>,
    limit: Duration,
}

impl TimeoutStore {
    pub fn new(inner: Arc<dyn BackingStore>, limit: Duration) -> Self {
        Self { inner, limit }
    }

    async fn bounded<T>(
        &self,
        op: &'static str,
        key: &str,
        call: impl std::future::Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.limit, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    store = self.inner.name(),
                    op,
                    key,
                    limit_ms = duration_ms(self.limit),
                    "Backing store call timed out"
                );
                Err(StoreError::Timeout(duration_ms(self.limit)))
            }
        }
    }
}

// == BackingStore Implementation ==
#[async_trait]
impl BackingStore for TimeoutStore {
    async fn exists(&self, key: &str) -> Result<bool> {
        self.bounded("exists", key, self.inner.exists(key)).await
    }

    async fn download_bytes(&self, key: &str) -> Result<Bytes> {
        self.bounded("download", key, self.inner.download_bytes(key)).await
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryBackingStore;

    #[tokio::test]
    async fn test_fast_calls_pass_through() {
        let inner = InMemoryBackingStore::new().with_object("a.jpg", Bytes::from_static(b"abc"));
        let store = TimeoutStore::new(Arc::new(inner), Duration::from_secs(1));

        assert!(store.exists("a.jpg").await.unwrap());
        assert_eq!(store.download_bytes("a.jpg").await.unwrap(), Bytes::from_static(b"abc"));
        assert_eq!(store.name(), "memory");
    }

    #[tokio::test]
    async fn test_errors_pass_through() {
        let store = TimeoutStore::new(Arc::new(InMemoryBackingStore::new()), Duration::from_secs(1));

        let err = store.download_bytes("missing.jpg").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_slow_calls_time_out() {
        let inner = InMemoryBackingStore::new()
            .with_object("slow.jpg", Bytes::from_static(b"abc"))
            .with_delay(Duration::from_secs(5));
        let store = TimeoutStore::new(Arc::new(inner), Duration::from_millis(200));

        assert_eq!(store.exists("slow.jpg").await, Err(StoreError::Timeout(200)));
        assert_eq!(
            store.download_bytes("slow.jpg").await,
            Err(StoreError::Timeout(200))
        );
    }
}

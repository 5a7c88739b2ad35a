//! In-memory backing store for tests and local demos.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use tokio::sync::RwLock;

use super::{BackingStore, Result, StoreError};

// == In-Memory Store ==
/// Map-backed accessor with optional latency and failure injection.
#[derive(Debug, Default)]
pub struct InMemoryBackingStore {
    objects: RwLock<HashMap<String, Bytes>>,
    failure: RwLock<Option<StoreError>>,
    delay: RwLock<Option<Duration>>,
    exists_calls: AtomicU64,
    download_calls: AtomicU64,
}

impl InMemoryBackingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert used while setting up a store.
    pub fn with_object(mut self, key: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.objects.get_mut().insert(key.into(), data.into());
        self
    }

    /// Delays every call by `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        *self.delay.get_mut() = Some(delay);
        self
    }

    /// Stores or replaces an object.
    pub async fn put(&self, key: impl Into<String>, data: impl Into<Bytes>) {
        self.objects.write().await.insert(key.into(), data.into());
    }

    pub async fn remove(&self, key: &str) {
        self.objects.write().await.remove(key);
    }

    /// Changes the per-call delay of a store that is already shared.
    pub async fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.write().await = delay;
    }

    /// Makes every subsequent call fail with `error`, or clears the failure.
    pub async fn set_failure(&self, error: Option<StoreError>) {
        *self.failure.write().await = error;
    }

    /// Number of `exists` calls served so far.
    pub fn exists_calls(&self) -> u64 {
        self.exists_calls.load(Ordering::Relaxed)
    }

    /// Number of `download_bytes` calls served so far.
    pub fn download_calls(&self) -> u64 {
        self.download_calls.load(Ordering::Relaxed)
    }

    async fn before_call(&self) -> Result<()> {
        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match self.failure.read().await.as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

// == BackingStore Implementation ==
#[async_trait]
impl BackingStore for InMemoryBackingStore {
    async fn exists(&self, key: &str) -> Result<bool> {
        self.exists_calls.fetch_add(1, Ordering::Relaxed);
        self.before_call().await?;
        Ok(self.objects.read().await.contains_key(key))
    }

    async fn download_bytes(&self, key: &str) -> Result<Bytes> {
        self.download_calls.fetch_add(1, Ordering::Relaxed);
        self.before_call().await?;
        self.objects
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

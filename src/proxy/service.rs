//! Image proxy service.
//!
//! Orchestrates one image request: sanitize the path, consult the cache, fall
//! back to the backing store, populate the cache, and describe the response.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::cache::{current_timestamp_ms, duration_ms, CacheStats, CacheStore};
use crate::error::{ProxyError, Result};
use crate::proxy::etag::{compute_etag, etag_matches};
use crate::proxy::mime::content_type_for_key;
use crate::proxy::path::resolve_key;
use crate::storage::BackingStore;

/// `Cache-Control` sent with cache hits.
pub const HIT_CACHE_CONTROL: &str = "public, max-age=86400";
/// `Cache-Control` sent with freshly fetched objects.
pub const MISS_CACHE_CONTROL: &str = "public, max-age=86400, immutable";

// == Cache Status ==
/// Whether a response was served from the in-process cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

// == Image Response ==
/// A successful answer to an image request: the full object or a 304.
#[derive(Debug, Clone)]
pub struct ImageResponse {
    pub key: String,
    pub cache_status: CacheStatus,
    pub content_type: String,
    pub etag: String,
    /// Full payload; not sent when `not_modified` is set
    pub data: Bytes,
    pub not_modified: bool,
}

impl ImageResponse {
    fn new(
        key: String,
        cache_status: CacheStatus,
        content_type: String,
        etag: String,
        data: Bytes,
        if_none_match: Option<&str>,
    ) -> Self {
        let not_modified = if_none_match.is_some_and(|value| etag_matches(value, &etag));
        Self {
            key,
            cache_status,
            content_type,
            etag,
            data,
            not_modified,
        }
    }

    pub fn status(&self) -> StatusCode {
        if self.not_modified {
            StatusCode::NOT_MODIFIED
        } else {
            StatusCode::OK
        }
    }

    /// Bytes that go on the wire.
    pub fn body_len(&self) -> usize {
        if self.not_modified {
            0
        } else {
            self.data.len()
        }
    }

    fn outcome(&self) -> &'static str {
        if self.not_modified {
            "NOT_MODIFIED"
        } else {
            self.cache_status.as_str()
        }
    }
}

impl IntoResponse for ImageResponse {
    fn into_response(self) -> Response {
        let cache_control = match self.cache_status {
            CacheStatus::Hit => HIT_CACHE_CONTROL,
            CacheStatus::Miss => MISS_CACHE_CONTROL,
        };
        let etag = HeaderValue::from_str(&self.etag)
            .unwrap_or_else(|_| HeaderValue::from_static("\"invalid\""));

        let status = self.status();

        let mut response = if self.not_modified {
            Response::new(Body::empty())
        } else {
            let content_type = HeaderValue::from_str(&self.content_type)
                .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
            let len = self.data.len();
            let mut response = Response::new(Body::from(self.data));
            let headers = response.headers_mut();
            headers.insert(header::CONTENT_TYPE, content_type);
            headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
            response
        };
        *response.status_mut() = status;

        let headers = response.headers_mut();
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(cache_control));
        headers.insert(header::ETAG, etag);
        headers.insert("x-cache", HeaderValue::from_static(self.cache_status.as_str()));
        if self.cache_status == CacheStatus::Miss {
            headers.insert(header::VARY, HeaderValue::from_static("Accept-Encoding"));
        }
        headers.insert(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        );
        headers.insert(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("default-src 'none'"),
        );

        response
    }
}

// == Proxy Options ==
#[derive(Debug, Clone)]
pub struct ProxyOptions {
    /// Key prefix every request resolves under
    pub namespace: String,
    /// Requests slower than this are flagged in the logs
    pub slow_request_threshold: Duration,
}

impl Default for ProxyOptions {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            slow_request_threshold: Duration::from_millis(1000),
        }
    }
}

// == Image Proxy ==
/// Serves image objects from the cache or the backing store.
///
/// The cache lock is never held while the backing store is awaited. Two
/// concurrent misses on one key may both fetch; the later insert wins.
pub struct ImageProxy {
    cache: Arc<Mutex<CacheStore>>,
    store: Arc<dyn BackingStore>,
    options: ProxyOptions,
}

impl ImageProxy {
    pub fn new(cache: CacheStore, store: Arc<dyn BackingStore>, options: ProxyOptions) -> Self {
        Self {
            cache: Arc::new(Mutex::new(cache)),
            store,
            options,
        }
    }

    /// Shared handle to the cache, for the background cleanup task.
    pub fn cache(&self) -> Arc<Mutex<CacheStore>> {
        self.cache.clone()
    }

    pub async fn stats(&self) -> CacheStats {
        self.cache.lock().await.stats()
    }

    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    // == Serve ==
    /// Answers a request for `raw_path` (the still-encoded part after
    /// `/images/`), honouring an optional `If-None-Match` header value.
    pub async fn serve(&self, raw_path: &str, if_none_match: Option<&str>) -> Result<ImageResponse> {
        let started = Instant::now();
        let result = self.serve_inner(raw_path, if_none_match).await;
        self.record(raw_path, &result, started.elapsed());
        result
    }

    async fn serve_inner(&self, raw_path: &str, if_none_match: Option<&str>) -> Result<ImageResponse> {
        let key = resolve_key(&self.options.namespace, raw_path)?;

        let cached = self.cache.lock().await.lookup(&key);
        if let Some(entry) = cached {
            debug!(key = %key, age_ms = entry.age_ms(current_timestamp_ms()), "Cache hit");
            let etag = compute_etag(&entry.key, entry.size, entry.inserted_at);
            return Ok(ImageResponse::new(
                key,
                CacheStatus::Hit,
                entry.content_type,
                etag,
                entry.data,
                if_none_match,
            ));
        }

        match self.store.exists(&key).await {
            Ok(true) => {}
            Ok(false) => return Err(ProxyError::ObjectNotFound(key)),
            Err(err) => return Err(ProxyError::from_exists_error(&key, err)),
        }

        let data = self
            .store
            .download_bytes(&key)
            .await
            .map_err(|err| ProxyError::from_download_error(&key, err))?;
        let fetched_at = current_timestamp_ms();
        let content_type = content_type_for_key(&key);

        // Oversize payloads are skipped by the store itself
        self.cache
            .lock()
            .await
            .insert_at(&key, data.clone(), content_type, fetched_at);

        let etag = compute_etag(&key, data.len(), fetched_at);
        Ok(ImageResponse::new(
            key,
            CacheStatus::Miss,
            content_type.to_string(),
            etag,
            data,
            if_none_match,
        ))
    }

    fn record(&self, path: &str, result: &Result<ImageResponse>, elapsed: Duration) {
        let elapsed_ms = duration_ms(elapsed);
        let slow = elapsed > self.options.slow_request_threshold;

        match result {
            Ok(response) => {
                let outcome = response.outcome();
                let bytes = response.body_len();
                if slow {
                    warn!(path, outcome, bytes, elapsed_ms, slow, "Slow image request");
                } else {
                    info!(path, outcome, bytes, elapsed_ms, "Served image");
                }
            }
            Err(err @ ProxyError::BackingStoreFailure(_)) => {
                error!(path, outcome = "ERROR", bytes = 0, elapsed_ms, slow, error = %err, "Image request failed");
            }
            Err(err) => {
                if slow {
                    warn!(path, outcome = "ERROR", bytes = 0, elapsed_ms, slow, error = %err, "Slow image request");
                } else {
                    info!(path, outcome = "ERROR", bytes = 0, elapsed_ms, error = %err, "Image request rejected");
                }
            }
        }
    }
}

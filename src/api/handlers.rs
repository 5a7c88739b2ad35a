//! API Handlers
//!
//! HTTP request handlers for the image and operational endpoints.

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, State},
    http::{header, HeaderMap},
    Json,
};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::Result;
use crate::models::{HealthResponse, StatsResponse};
use crate::proxy::{ImageProxy, ImageResponse, ProxyOptions};
use crate::storage::{self, BackingStore, FsBackingStore, HttpBackingStore, TimeoutStore};

/// Route prefix under which images are served.
pub const IMAGE_ROUTE_PREFIX: &str = "/images";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Image proxy owning the cache and the backing store
    pub proxy: Arc<ImageProxy>,
}

impl AppState {
    /// Creates a new AppState around an existing proxy.
    pub fn new(proxy: ImageProxy) -> Self {
        Self {
            proxy: Arc::new(proxy),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Picks the HTTP object store when `BACKING_STORE_URL` is set and the
    /// filesystem store otherwise; either way every call is bounded by the
    /// configured timeout.
    pub fn from_config(config: &Config) -> storage::Result<Self> {
        let timeout = config.backing_store_timeout();
        let backend: Arc<dyn BackingStore> = match &config.backing_store_url {
            Some(url) => Arc::new(HttpBackingStore::new(url.clone(), timeout)?),
            None => Arc::new(FsBackingStore::new(config.backing_store_dir.clone())),
        };
        let store = Arc::new(TimeoutStore::new(backend, timeout));

        let cache = CacheStore::new(
            config.max_cache_total_size,
            config.max_cacheable_file_size,
            config.cache_ttl(),
        );
        let options = ProxyOptions {
            namespace: config.image_namespace.clone(),
            slow_request_threshold: config.slow_request_threshold(),
        };

        Ok(Self::new(ImageProxy::new(cache, store, options)))
    }
}

/// Handler for GET /images/*path
///
/// Uses the original, still percent-encoded URI so the proxy decodes the path
/// exactly once.
pub async fn image_handler(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Result<ImageResponse> {
    let raw_path = uri
        .path()
        .strip_prefix(IMAGE_ROUTE_PREFIX)
        .unwrap_or_default();
    let if_none_match = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok());

    state.proxy.serve(raw_path, if_none_match).await
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.proxy.stats().await))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

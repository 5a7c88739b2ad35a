//! Configuration Module
//!
//! Handles loading and managing proxy configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{
    DEFAULT_CACHE_TTL_SECS, DEFAULT_MAX_CACHEABLE_FILE_SIZE, DEFAULT_MAX_CACHE_TOTAL_SIZE,
};
use crate::tasks::MIN_CLEANUP_INTERVAL_SECS;

/// Proxy configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Byte budget across all cached entries
    pub max_cache_total_size: usize,
    /// Largest single object that will be cached, in bytes
    pub max_cacheable_file_size: usize,
    /// Cache entry TTL in seconds
    pub cache_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Base URL of the HTTP object store; takes precedence over `backing_store_dir`
    pub backing_store_url: Option<String>,
    /// Root directory of the filesystem object store
    pub backing_store_dir: PathBuf,
    /// Per-call backing store timeout in milliseconds
    pub backing_store_timeout_ms: u64,
    /// Requests slower than this many milliseconds are flagged
    pub slow_request_threshold_ms: u64,
    /// Key prefix every request resolves under
    pub image_namespace: String,
}

fn parse_env<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_CACHE_TOTAL_SIZE` - Cache byte budget (default: 50 MiB)
    /// - `MAX_CACHEABLE_FILE_SIZE` - Per-object cache ceiling (default: 1 MiB)
    /// - `CACHE_TTL` - Entry TTL in seconds (default: 1800)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds, at least 1 (default: 60)
    /// - `BACKING_STORE_URL` - HTTP object store base URL (default: unset)
    /// - `BACKING_STORE_DIR` - Filesystem object store root (default: ./images)
    /// - `BACKING_STORE_TIMEOUT_MS` - Backing store call timeout (default: 10000)
    /// - `SLOW_REQUEST_THRESHOLD_MS` - Slow request threshold (default: 1000)
    /// - `IMAGE_NAMESPACE` - Key prefix for all requests (default: empty)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_cache_total_size: parse_env("MAX_CACHE_TOTAL_SIZE", defaults.max_cache_total_size),
            max_cacheable_file_size: parse_env(
                "MAX_CACHEABLE_FILE_SIZE",
                defaults.max_cacheable_file_size,
            ),
            cache_ttl: parse_env("CACHE_TTL", defaults.cache_ttl),
            server_port: parse_env("SERVER_PORT", defaults.server_port),
            cleanup_interval: parse_env("CLEANUP_INTERVAL", defaults.cleanup_interval)
                .max(MIN_CLEANUP_INTERVAL_SECS),
            backing_store_url: env::var("BACKING_STORE_URL")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            backing_store_dir: env::var("BACKING_STORE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.backing_store_dir),
            backing_store_timeout_ms: parse_env(
                "BACKING_STORE_TIMEOUT_MS",
                defaults.backing_store_timeout_ms,
            ),
            slow_request_threshold_ms: parse_env(
                "SLOW_REQUEST_THRESHOLD_MS",
                defaults.slow_request_threshold_ms,
            ),
            image_namespace: env::var("IMAGE_NAMESPACE").unwrap_or(defaults.image_namespace),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn backing_store_timeout(&self) -> Duration {
        Duration::from_millis(self.backing_store_timeout_ms)
    }

    pub fn slow_request_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_request_threshold_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_cache_total_size: DEFAULT_MAX_CACHE_TOTAL_SIZE,
            max_cacheable_file_size: DEFAULT_MAX_CACHEABLE_FILE_SIZE,
            cache_ttl: DEFAULT_CACHE_TTL_SECS,
            server_port: 3000,
            cleanup_interval: 60,
            backing_store_url: None,
            backing_store_dir: PathBuf::from("./images"),
            backing_store_timeout_ms: 10_000,
            slow_request_threshold_ms: 1_000,
            image_namespace: String::new(),
        }
    }
}

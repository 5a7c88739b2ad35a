//! Backing Store Module
//!
//! The narrow contract the proxy needs from the remote object store, plus the
//! accessors that implement it.
//!
//! # Accessors
//! - `HttpBackingStore` - objects served by an HTTP object store
//! - `FsBackingStore` - objects stored as files under a directory
//! - `InMemoryBackingStore` - map-backed store for tests and demos
//! - `TimeoutStore` - bounds every call of another accessor

mod fs;
mod http;
mod memory;
mod timeout;

use async_trait::async_trait;
use axum::body::Bytes;
use thiserror::Error;

pub use fs::FsBackingStore;
pub use http::HttpBackingStore;
pub use memory::InMemoryBackingStore;
pub use timeout::TimeoutStore;

// == Store Error ==
/// Failures reported by a backing store accessor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The object does not exist
    #[error("Object not found: {0}")]
    NotFound(String),

    /// The store refused access to the object
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// The call did not complete within the accessor timeout
    #[error("Backing store timed out after {0} ms")]
    Timeout(u64),

    /// Transport or protocol failure talking to the store
    #[error("Backing store error: {0}")]
    Transport(String),
}

/// Convenience Result type for accessor calls.
pub type Result<T> = std::result::Result<T, StoreError>;

// == Backing Store Trait ==
/// Remote object store holding the authoritative image bytes.
///
/// Implementations hold no state the proxy relies on; every call may fail.
#[async_trait]
pub trait BackingStore: Send + Sync {
    /// Reports whether an object exists under `key`.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Downloads the full object stored under `key`.
    async fn download_bytes(&self, key: &str) -> Result<Bytes>;

    /// Short accessor name for logs.
    fn name(&self) -> &'static str;
}

//! Image Proxy - a caching HTTP front for an image object store
//!
//! Serves `GET /images/*path` from a TTL and byte-budget bounded in-memory
//! cache, falling back to a pluggable backing store on a miss.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod proxy;
pub mod storage;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use proxy::ImageProxy;
pub use tasks::spawn_cleanup_task;

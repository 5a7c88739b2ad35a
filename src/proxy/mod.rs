//! Image Proxy Module
//!
//! Request-level logic for serving images: path sanitation, content types,
//! ETags, and the cache-aside service tying them together.

pub mod etag;
pub mod mime;
pub mod path;
mod service;

pub use etag::{compute_etag, etag_matches};
pub use mime::content_type_for_key;
pub use path::{resolve_key, sanitize_path};
pub use service::{
    CacheStatus, ImageProxy, ImageResponse, ProxyOptions, HIT_CACHE_CONTROL, MISS_CACHE_CONTROL,
};

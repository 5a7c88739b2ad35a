//! API Module
//!
//! HTTP handlers and routing for the image proxy.
//!
//! # Endpoints
//! - `GET /images/*path` - Serve an image
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

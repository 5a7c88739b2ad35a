//! API Routes
//!
//! Configures the Axum router with all image proxy endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{health_handler, image_handler, stats_handler, AppState};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /images/*path` - Serve an image from the cache or the backing store
/// - `GET /stats` - Get cache statistics
/// - `GET /health` - Health check endpoint
///
/// `GET /images/` is routed to the image handler as well so that an empty path
/// is rejected as a bad request rather than falling through to a 404.
///
/// # Middleware
/// - CORS: Allows any origin with GET and HEAD
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::HEAD])
        .allow_headers(Any);

    Router::new()
        .route("/images/", get(image_handler))
        .route("/images/*path", get(image_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

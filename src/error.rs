//! Error types for the image proxy
//!
//! Maps every request failure onto a small taxonomy with a fixed HTTP status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::storage::StoreError;

// == Proxy Error Enum ==
/// Failure classes surfaced to HTTP clients.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProxyError {
    /// Traversal attempt, undecodable, or empty path
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// The backing store has no such object
    #[error("Image not found: {0}")]
    ObjectNotFound(String),

    /// The backing store refused access
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Timeout, transport, or other backing store failure
    #[error("Backing store failure: {0}")]
    BackingStoreFailure(String),
}

impl ProxyError {
    /// HTTP status for this failure class.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            ProxyError::ObjectNotFound(_) => StatusCode::NOT_FOUND,
            ProxyError::AccessDenied(_) => StatusCode::FORBIDDEN,
            ProxyError::BackingStoreFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Maps a failed existence check.
    ///
    /// A store that cannot confirm the object reads as not found, except for
    /// permission failures and timeouts.
    pub fn from_exists_error(key: &str, err: StoreError) -> Self {
        match err {
            StoreError::AccessDenied(_) => ProxyError::AccessDenied(key.to_string()),
            StoreError::Timeout(_) => ProxyError::BackingStoreFailure(err.to_string()),
            StoreError::NotFound(_) | StoreError::Transport(_) => {
                ProxyError::ObjectNotFound(key.to_string())
            }
        }
    }

    /// Maps a failed download of an object that was reported to exist.
    pub fn from_download_error(key: &str, err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ProxyError::ObjectNotFound(key.to_string()),
            StoreError::AccessDenied(_) => ProxyError::AccessDenied(key.to_string()),
            StoreError::Timeout(_) | StoreError::Transport(_) => {
                ProxyError::BackingStoreFailure(err.to_string())
            }
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Internal details stay in the logs
        let message = match &self {
            ProxyError::BackingStoreFailure(_) => "Failed to fetch image".to_string(),
            other => other.to_string(),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the image proxy.
pub type Result<T> = std::result::Result<T, ProxyError>;

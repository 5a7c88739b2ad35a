//! Response models for the image proxy API
//!
//! DTOs serialized as JSON by the operational endpoints and error responses.

pub mod responses;

// Re-export commonly used types
pub use responses::{ErrorResponse, HealthResponse, StatsResponse};

//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cache cleanup: drops expired entries and enforces the byte budget

mod cleanup;

pub use cleanup::{spawn_cleanup_task, MIN_CLEANUP_INTERVAL_SECS};

//! Shared types for the seating core
//!
//! Data models, error codes and small utilities used by `seating-core`
//! and by any front-end talking to it.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};

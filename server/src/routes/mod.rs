//! HTTP routes for the inkpress server.
//!
//! Routes are organized by domain:
//! - `health`: Liveness and listener count
//! - `progress`: Snapshot queries and producer updates
//! - `generate`: Generation jobs and their posts

pub mod generate;
pub mod health;
pub mod progress;

pub use generate::*;
pub use health::*;
pub use progress::*;

use serde::Serialize;

/// Response wrapper for API calls.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

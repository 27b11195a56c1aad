//! Error types for the key-value store
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the store and its front ends.
///
/// Cache misses and lost removal races are not errors; only rejected input,
/// bad configuration and a missing runtime end up here.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found (front ends only, the store reports misses as `None`)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key is empty, blank or too long
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Value is missing or too large
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Capacity, interval or other construction parameter is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Malformed request or console command
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No tokio runtime available to host the background reaper
    #[error("Runtime unavailable: {0}")]
    Runtime(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidKey(_)
            | CacheError::InvalidValue(_)
            | CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::InvalidConfig(_) | CacheError::Runtime(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the store.
pub type Result<T> = std::result::Result<T, CacheError>;

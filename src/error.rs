//! Error types for the listing server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

/// Message returned for both a missing property and one owned by someone else.
pub const NOT_FOUND_OR_UNAUTHORIZED: &str = "Property not found or unauthorized";

// == API Error Enum ==
/// Errors surfaced to HTTP callers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Bad enum, range, type or unknown field
    #[error("{0}")]
    Validation(String),

    /// Missing, invalid or expired credential
    #[error("{0}")]
    Authentication(String),

    /// The entity is missing or belongs to another user
    #[error("Property not found or unauthorized")]
    NotFoundOrUnauthorized,

    /// Plain absence on a public lookup
    #[error("{0}")]
    NotFound(String),

    /// Store failure not otherwise classified
    #[error("{0}")]
    Unexpected(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFoundOrUnauthorized | ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {}", self);
        }

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Store Error Enum ==
/// Failures reported by a store backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// A unique index rejected the write
    #[error("Duplicate value for {field}: {value}")]
    DuplicateKey { field: &'static str, value: String },

    /// Backend could not serve the request
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Backend did not answer within the request timeout
    #[error("Store operation timed out")]
    Timeout,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { field, value } => {
                ApiError::Validation(format!("{} '{}' is already in use", field, value))
            }
            other => ApiError::Unexpected(other.to_string()),
        }
    }
}

// == Cache Error Enum ==
/// Failures reported by a cache backend. Never surfaced to HTTP callers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    /// Key exceeds the backend's limit
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Value exceeds the backend's limit
    #[error("Value too large: {0} bytes")]
    ValueTooLarge(usize),

    /// Cache is full and eviction failed
    #[error("Cache full: {0}")]
    CacheFull(String),

    /// Backend unreachable
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    /// Backend did not answer within the request timeout
    #[error("Cache operation timed out")]
    Timeout,
}

// == Result Type Alias ==
/// Convenience Result type for request handling.
pub type Result<T> = std::result::Result<T, ApiError>;

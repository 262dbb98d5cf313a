//! # HTTP API Errors
//!
//! A POST without a usable JSON body answers 404 `{"error": "Not found"}`,
//! the same as an unknown route. Existing clients rely on that status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::records::RecordError;
use crate::store::StoreError;

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Request-level errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown route, or a POST body that is absent, not JSON, or empty
    #[error("Not found")]
    NotFound,

    /// Well-formed body without a required field
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Record store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Record(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Store(e) => {
                tracing::error!(event = "store_error", error = %e, fatal = e.is_fatal());
            }
            ApiError::Record(e) => {
                tracing::warn!(event = "record_rejected", error = %e);
            }
            ApiError::NotFound => {}
        }

        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        assert_eq!(ApiError::NotFound.to_string(), "Not found");
        assert_eq!(ApiError::NotFound.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_missing_field_is_server_fault() {
        let err = ApiError::from(RecordError::MissingField("size".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "missing required field: size");
    }

    #[test]
    fn test_store_error_is_server_fault() {
        let err = ApiError::from(StoreError::Poisoned);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

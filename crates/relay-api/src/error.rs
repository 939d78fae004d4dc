//! HTTP error mapping for control-plane responses.
//!
//! Registry errors translate to statuses here: not-found → 404,
//! validation and any other failure → 400. Method-not-allowed is left
//! to the router's standard 405 handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use relay_core::CoreError;
use serde::Serialize;

/// Error response body: `{"error": {"message": "..."}}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error details.
    pub error: ErrorDetail,
}

/// Detailed error information.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// Human-readable error description.
    pub message: String,
}

/// API-level error carrying its HTTP status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Creates a 400 validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: message.into() }
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        let status = match &error {
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::InvalidInput(_) | CoreError::Store(_) => StatusCode::BAD_REQUEST,
        };
        Self { status, message: error.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse { error: ErrorDetail { message: self.message } };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_expected_statuses() {
        let not_found = ApiError::from(CoreError::not_found("bucket b1"));
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);

        let invalid = ApiError::from(CoreError::invalid_input("bad url"));
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

        let store = ApiError::from(CoreError::store("io failure"));
        assert_eq!(store.status, StatusCode::BAD_REQUEST);
    }
}

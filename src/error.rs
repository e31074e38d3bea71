// HTTP API error types
use axum::{extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::auth::VerifierError;
use crate::database::store::StoreError;
use crate::database::todo::InvalidTodoId;
use crate::validation::ValidationError;

/// HTTP API error with appropriate status codes and client-friendly messages.
///
/// The taxonomy is deliberately small: unauthenticated, malformed id,
/// invalid payload, not-found, and everything else. Ownership mismatches are
/// collapsed into `NotFound` so a non-owner cannot probe which ids exist.
#[derive(Debug)]
pub enum ApiError {
    // 401 Unauthorized
    Unauthorized,

    // 400 Bad Request - malformed path identifier
    InvalidId,

    // 400 Bad Request - payload failed validation
    Validation { field_errors: HashMap<String, String> },

    // 404 Not Found - doesn't exist OR exists but isn't owned by the caller
    NotFound,

    // 500 Internal Server Error - detail stays server-side
    Internal,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::InvalidId => StatusCode::BAD_REQUEST,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-safe error message
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "Unauthorized",
            ApiError::InvalidId => "Invalid todo ID",
            ApiError::Validation { .. } => "Invalid input data",
            ApiError::NotFound => "Todo not found or access denied",
            ApiError::Internal => "Internal server error",
        }
    }

    /// Convert to the JSON error envelope
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Validation { field_errors } if !field_errors.is_empty() => {
                json!({
                    "success": false,
                    "error": self.message(),
                    "fieldErrors": field_errors,
                })
            }
            _ => json!({
                "success": false,
                "error": self.message(),
            }),
        }
    }
}

impl From<InvalidTodoId> for ApiError {
    fn from(_: InvalidTodoId) -> Self {
        ApiError::InvalidId
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // An unparseable body is invalid input like any other; keep the
        // envelope instead of axum's plain-text rejection
        tracing::debug!("rejected request body: {}", rejection);
        ApiError::Validation { field_errors: HashMap::new() }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation { field_errors: err.field_errors }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound,
            StoreError::Database(e) => {
                // Log the real error but never expose it to the client
                tracing::error!("database error: {}", e);
                ApiError::Internal
            }
        }
    }
}

impl From<VerifierError> for ApiError {
    fn from(err: VerifierError) -> Self {
        // Fail closed: a broken verifier means the caller is unauthenticated
        tracing::warn!("session verification failed, treating as unauthenticated: {}", err);
        ApiError::Unauthorized
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ownership_mismatch_is_indistinguishable_from_missing() {
        let err: ApiError = StoreError::NotFound.into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Todo not found or access denied");
    }

    #[test]
    fn database_errors_surface_as_opaque_500() {
        let err: ApiError = StoreError::Database(sqlx::Error::PoolClosed).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.to_json();
        assert_eq!(body["error"], "Internal server error");
        assert!(body.get("detail").is_none());
    }

    #[test]
    fn validation_envelope_carries_field_errors() {
        let mut field_errors = HashMap::new();
        field_errors.insert("title".to_string(), "Title is required".to_string());
        let err = ApiError::Validation { field_errors };
        let body = err.to_json();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Invalid input data");
        assert_eq!(body["fieldErrors"]["title"], "Title is required");
    }
}

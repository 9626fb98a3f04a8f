//! Service error types with HTTP status code mapping.
//!
//! [`OrderServiceError`] is the central error type for the crate. The
//! persistence adapters classify every failure as either
//! [`OrderServiceError::OrderNotFound`] or [`OrderServiceError::StorageError`];
//! the remaining variants belong to configuration, validation, and the
//! HTTP layer. Each variant maps to a numeric code and HTTP status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::OrderId;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "order not found: 42",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Service-wide error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status               |
/// |-----------|-----------------|---------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request           |
/// | 2000–2999 | Not Found       | 404 Not Found             |
/// | 3000–3999 | Server/Storage  | 500 / 504                 |
#[derive(Debug, thiserror::Error)]
pub enum OrderServiceError {
    /// No order is stored under the given ID.
    #[error("order not found: {0}")]
    OrderNotFound(OrderId),

    /// Any failure originating from the storage backend other than a
    /// missing record: connection loss, constraint violation, or row
    /// data that does not map back onto the domain model.
    #[error("storage error: {0}")]
    StorageError(String),

    /// A storage round-trip did not complete within its deadline.
    #[error("{operation} timed out after {after_ms} ms")]
    Timeout {
        /// Operation that was cut off (e.g. `"save order"`).
        operation: &'static str,
        /// Deadline that expired, in milliseconds.
        after_ms: u64,
    },

    /// Request or domain validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration (e.g. the data source name) could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl OrderServiceError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidConfig(_) => 1002,
            Self::OrderNotFound(_) => 2001,
            Self::Internal(_) => 3000,
            Self::StorageError(_) => 3001,
            Self::Timeout { .. } => 3002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::OrderNotFound(_) => StatusCode::NOT_FOUND,
            Self::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::StorageError(_) | Self::InvalidConfig(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns `true` for the "record does not exist" classification.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::OrderNotFound(_))
    }
}

impl From<sqlx::Error> for OrderServiceError {
    fn from(err: sqlx::Error) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for OrderServiceError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::StorageError(format!("migration failed: {err}"))
    }
}

impl IntoResponse for OrderServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let err = OrderServiceError::OrderNotFound(OrderId::new(7));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), 2001);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "order not found: 7");
    }

    #[test]
    fn storage_and_timeout_are_server_side() {
        let storage = OrderServiceError::StorageError("connection refused".into());
        assert_eq!(storage.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!storage.is_not_found());

        let timeout = OrderServiceError::Timeout {
            operation: "get order",
            after_ms: 1500,
        };
        assert_eq!(timeout.status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(timeout.to_string(), "get order timed out after 1500 ms");
    }

    #[test]
    fn sqlx_errors_become_storage_errors() {
        let err: OrderServiceError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, OrderServiceError::StorageError(_)));
    }

    #[test]
    fn into_response_sets_status() {
        let response = OrderServiceError::InvalidRequest("empty items".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

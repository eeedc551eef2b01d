//! Error types for web handlers.
//!
//! [`AppError`] bridges the domain taxonomy in `station-core` to HTTP
//! responses, implementing Axum's `IntoResponse` trait.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use station_core::StationError;
use std::fmt;

/// Application error type for web handlers.
///
/// Wraps domain errors and provides HTTP-friendly error responses as a
/// `{"code", "message"}` JSON body.
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            source: None,
        }
    }

    /// Create a new error with a source error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            message.into(),
            "BAD_REQUEST".to_string(),
        )
    }

    /// Create a 401 Unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            message.into(),
            "UNAUTHORIZED".to_string(),
        )
    }

    /// Create a 403 Forbidden error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            message.into(),
            "FORBIDDEN".to_string(),
        )
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            message.into(),
            "NOT_FOUND".to_string(),
        )
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Maps the domain taxonomy onto HTTP statuses and stable error codes.
impl From<StationError> for AppError {
    fn from(err: StationError) -> Self {
        match err {
            StationError::NotFound { .. } => {
                Self::new(StatusCode::NOT_FOUND, err.to_string(), "NOT_FOUND".into())
            }
            StationError::DuplicateSeat { .. } => Self::new(
                StatusCode::CONFLICT,
                err.to_string(),
                "DUPLICATE_SEAT".into(),
            ),
            StationError::CapacityExceeded { .. } => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                err.to_string(),
                "CAPACITY_EXCEEDED".into(),
            ),
            StationError::InvalidTimeRange => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                err.to_string(),
                "INVALID_TIME_RANGE".into(),
            ),
            StationError::SameSourceDestination => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                err.to_string(),
                "SAME_SOURCE_DESTINATION".into(),
            ),
            StationError::Validation(_) => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                err.to_string(),
                "VALIDATION_ERROR".into(),
            ),
            StationError::Unauthorized(_) => Self::new(
                StatusCode::UNAUTHORIZED,
                err.to_string(),
                "UNAUTHORIZED".into(),
            ),
            StationError::Forbidden(_) => {
                Self::new(StatusCode::FORBIDDEN, err.to_string(), "FORBIDDEN".into())
            }
            StationError::Storage(_) => {
                Self::internal("An internal error occurred").with_source(anyhow::anyhow!(err))
            }
        }
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: String,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log internal errors
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("An internal error occurred").with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use station_core::ids::JourneyId;

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn test_duplicate_seat_maps_to_conflict() {
        let err = AppError::from(StationError::DuplicateSeat {
            journey_id: JourneyId::new(),
            seats: 1,
        });
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.code, "DUPLICATE_SEAT");
    }

    #[test]
    fn test_capacity_maps_to_unprocessable() {
        let err = AppError::from(StationError::CapacityExceeded {
            cargo: 151,
            available: 150,
        });
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code, "CAPACITY_EXCEEDED");
    }

    #[test]
    fn test_storage_hides_details() {
        let err = AppError::from(StationError::Storage("connection reset".to_string()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "An internal error occurred");
    }
}

//! Domain error to HTTP response mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use super::common::ApiResponse;
use crate::domain::DomainError;

/// Wrapper so handlers can `?` domain errors straight into responses.
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl ApiError {
    /// Request-shape problem detected in the handler itself.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(DomainError::Validation(message.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, self.0.to_string()),
            DomainError::Validation(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),
            DomainError::Conflict(_) => (StatusCode::CONFLICT, self.0.to_string()),
            DomainError::InvalidOrExpiredOtp => (StatusCode::BAD_REQUEST, self.0.to_string()),
            DomainError::IllegalTransition { .. } => (StatusCode::CONFLICT, self.0.to_string()),
            DomainError::Storage(detail) => {
                // Internals stay in the log, not the response body.
                error!(error = %detail, "storage error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(e: DomainError) -> StatusCode {
        ApiError(e).into_response().status()
    }

    #[test]
    fn error_taxonomy_maps_to_expected_statuses() {
        assert_eq!(
            status_of(DomainError::NotFound {
                entity: "booking",
                field: "id",
                value: "1".into()
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(DomainError::Validation("bad".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::Conflict("overlap".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(DomainError::InvalidOrExpiredOtp),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::IllegalTransition {
                from: "ACTIVE",
                to: "CANCELLED"
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(DomainError::Storage("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

//! Unified error handling for the quote admin.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{FieldErrors, QuoteError};

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Quote operation failed.
    #[error("Quote error: {0}")]
    Quote(#[from] QuoteError),

    /// Submitted fields failed validation.
    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(FieldErrors),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// True for store not-found, which is passed through as 404.
    const fn is_store_not_found(&self) -> bool {
        matches!(
            self,
            Self::Database(RepositoryError::NotFound)
                | Self::Quote(QuoteError::Repository(RepositoryError::NotFound))
        )
    }

    fn status(&self) -> StatusCode {
        if self.is_store_not_found() {
            return StatusCode::NOT_FOUND;
        }
        match self {
            Self::Database(_) | Self::Quote(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log server errors with Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Quote admin request error"
            );
        }

        match self {
            Self::Validation(errors) => (status, Json(json!({ "errors": errors }))).into_response(),
            Self::BadRequest(message) => {
                (status, Json(json!({ "error": message }))).into_response()
            }
            // Don't expose internal error details to clients
            _ if status.is_server_error() => (status, "Internal server error").into_response(),
            _ if status == StatusCode::NOT_FOUND => (status, "Not found").into_response(),
            other => (status, other.to_string()).into_response(),
        }
    }
}

/// Tag the current Sentry scope with the shop behind the request.
pub fn set_sentry_shop(shop: &str) {
    sentry::configure_scope(|scope| {
        scope.set_tag("shop", shop);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;
    use crate::models::QuoteInput;
    use crate::services::quotes::validate_quote;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("quote 12".to_string());
        assert_eq!(err.to_string(), "Not found: quote 12");

        let err = AppError::BadRequest("Invalid Content-Type".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid Content-Type");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Quote(QuoteError::Precondition { field: "title" })),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_not_found_maps_to_404() {
        assert_eq!(
            get_status(AppError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Quote(QuoteError::Repository(
                RepositoryError::NotFound
            ))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::Conflict("x".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_validation_body() {
        let errors = validate_quote(&QuoteInput::default()).unwrap();
        let response = AppError::Validation(errors).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["errors"]["title"], "Title is required");
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let response =
            AppError::Quote(QuoteError::Precondition { field: "shopId" }).into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Internal server error");
    }

    #[tokio::test]
    async fn test_bad_request_body() {
        let response = AppError::BadRequest("Invalid Content-Type".to_string()).into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Invalid Content-Type" }));
    }
}

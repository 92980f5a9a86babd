//! Unified error handling for the HTTP layer.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::{AuthError, CustomerError};

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Customer operation failed.
    #[error("Customer error: {0}")]
    Customer(#[from] CustomerError),

    /// Token issuance or validation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Customer(CustomerError::NotFound) => StatusCode::NOT_FOUND,
            Self::Customer(CustomerError::PhoneTaken) => StatusCode::CONFLICT,
            Self::Customer(CustomerError::Internal(_)) | Self::Auth(AuthError::Internal(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Auth(_) | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log server errors with Sentry; the cause chain stays server-side
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            let cause = std::error::Error::source(&self)
                .and_then(std::error::Error::source)
                .map(ToString::to_string);
            tracing::error!(
                error = %self,
                cause = cause.as_deref().unwrap_or(""),
                sentry_event_id = %event_id,
                "Accounts request error"
            );
            return (status, "Internal server error").into_response();
        }

        match self {
            Self::Auth(e) => (
                status,
                Json(json!({ "status": "fail", "reason": e.reason() })),
            )
                .into_response(),
            Self::Unauthorized(_) => (
                status,
                [(header::WWW_AUTHENTICATE, "Basic realm=\"accounts\"")],
                self.to_string(),
            )
                .into_response(),
            _ => (status, self.to_string()).into_response(),
        }
    }
}

//! Request error taxonomy and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tusk_storage::StoreError;

use crate::response;

/// Client-facing request error.
///
/// Every variant except `Internal` renders its display text to the client.
/// `Internal` keeps the underlying failure for the log and answers with a
/// generic message only.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input; the message names the rule that failed.
    #[error("{0}")]
    Validation(String),

    /// No credential token on a protected route.
    #[error("No authentication token provided.")]
    MissingCredential,

    /// The credential token failed verification: bad signature, expired, or
    /// a malformed subject.
    #[error("Invalid authentication token.")]
    InvalidCredential,

    /// Authenticated, but not the owner of the target resource.
    #[error("Unauthorized access.")]
    Forbidden,

    /// Missing resource, or a resource id that cannot exist.
    #[error("Task not found.")]
    NotFound,

    /// Store or credential-service failure; detail goes to the log only.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingCredential | ApiError::InvalidCredential => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(response::error("An error occurred")),
                )
                    .into_response()
            }
            other => {
                let status = other.status();
                (status, Json(response::fail_message(other.to_string()))).into_response()
            }
        }
    }
}

/// Store errors default to `NotFound`/`Internal`; handlers that care about
/// `AlreadyExists` match on it before this conversion runs.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

//! Application error type shared by every HTTP surface.
//!
//! Every failure leaving a handler is an [`AppError`]: an HTTP status, a
//! stable machine-readable `code`, and the underlying [`anyhow::Error`] whose
//! message becomes the response's `error` field.
//!
//! ```json
//! { "error": "Course not found", "code": "not_found" }
//! ```
//!
//! Unexpected failures (database, I/O, hashing) reach handlers through the
//! blanket `From` impl and surface as `500 internal`.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

/// Stable error codes carried in every error body.
pub mod codes {
    pub const BAD_REQUEST: &str = "bad_request";
    pub const VALIDATION_FAILED: &str = "validation_failed";
    pub const UNAUTHENTICATED: &str = "unauthenticated";
    pub const INSUFFICIENT_PERMISSIONS: &str = "insufficient_permissions";
    pub const NOT_FOUND: &str = "not_found";
    pub const CONFLICT: &str = "conflict";
    pub const RANGE_NOT_SATISFIABLE: &str = "range_not_satisfiable";
    pub const PAYLOAD_TOO_LARGE: &str = "payload_too_large";
    pub const INTERNAL: &str = "internal";
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub code: &'static str,
    pub error: Error,
}

/// JSON body written for every [`AppError`].
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Course not found")]
    pub error: String,
    #[schema(example = "not_found")]
    pub code: String,
}

impl AppError {
    pub fn new<E>(status: StatusCode, code: &'static str, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            code,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, codes::INTERNAL, err)
    }

    pub fn database<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, codes::INTERNAL, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, err)
    }

    /// Field-level validation failure on an otherwise well-formed body.
    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            codes::VALIDATION_FAILED,
            err,
        )
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, err)
    }

    /// No usable credential, or the credential's user no longer exists.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            codes::UNAUTHENTICATED,
            anyhow::anyhow!(message.into()),
        )
    }

    /// Authenticated, but lacking the capability an operation needs.
    ///
    /// Answered with 401 like an authentication failure; clients tell the two
    /// apart by `code`.
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            codes::INSUFFICIENT_PERMISSIONS,
            anyhow::anyhow!(message.into()),
        )
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            codes::CONFLICT,
            anyhow::anyhow!(message.into()),
        )
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            codes::PAYLOAD_TOO_LARGE,
            anyhow::anyhow!(message.into()),
        )
    }

    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Internal details stay in the logs.
        let message = if self.is_server_error() {
            tracing::error!(error = ?self.error, code = self.code, "request failed");
            "Internal server error".to_string()
        } else {
            self.error.to_string()
        };

        let body = Json(ErrorResponse {
            error: message,
            code: self.code.to_string(),
        });

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

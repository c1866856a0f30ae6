//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::auth::AccountError;
use crate::db::DatabaseError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
    /// Present for validation errors: the field the message refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Validation failed for {field}: {message}")]
    Validation { field: String, message: String },
    #[error("Invalid credentials")]
    Unauthorized,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, field) = match self {
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail, None)
            }
            ApiError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                "VALIDATION",
                message,
                Some(field),
            ),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Invalid credentials".to_string(),
                None,
            ),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail, None),
            ApiError::Conflict(detail) => (StatusCode::CONFLICT, "CONFLICT", detail, None),
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message, field },
        };
        (status, Json(body)).into_response()
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity_type, id } => {
                ApiError::NotFound(format!("{entity_type} {id} not found"))
            }
            DatabaseError::ConstraintViolation(detail) => ApiError::Conflict(detail),
            DatabaseError::InvalidEnum { field, value } => {
                ApiError::BadRequest(format!("invalid value for {field}: {value}"))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Policy(e) => ApiError::Validation {
                field: "password".into(),
                message: e.to_string(),
            },
            AccountError::InvalidEmail => ApiError::Validation {
                field: "email".into(),
                message: "invalid email address".into(),
            },
            AccountError::InvalidCredentials => ApiError::Unauthorized,
            AccountError::CodeMismatch => {
                ApiError::BadRequest("verification code does not match".into())
            }
            AccountError::NoCodePending => {
                ApiError::BadRequest("no verification code pending".into())
            }
            AccountError::Database(e) => e.into(),
        }
    }
}

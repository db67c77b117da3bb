use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pawtrack_common::ObjectIdError;
use sea_orm::DbErr;
use serde::Serialize;

/// Structured error envelope returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Always `false` for errors.
    #[schema(example = false)]
    pub success: bool,
    /// Machine-readable error code. One of: `VALIDATION_ERROR`,
    /// `INVALID_IDENTIFIER`, `NOT_FOUND`, `STORE_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub error: &'static str,
    /// Human-readable error description.
    #[schema(example = "Name must be between 2 and 30 characters")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    /// Caller-supplied data violates a field contract. Not retryable.
    Validation(String),
    /// A path or filter identifier is not a 24-character hex string.
    InvalidIdentifier(String),
    NotFound(String),
    /// The store itself failed. The detail is logged, never returned.
    Store(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidIdentifier(_) => "INVALID_IDENTIFIER",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Store(_) => "STORE_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        let status = self.status();
        let error = self.code();
        let message = match self {
            AppError::Validation(msg) | AppError::InvalidIdentifier(msg) | AppError::NotFound(msg) => {
                msg
            }
            AppError::Store(detail) => {
                tracing::error!("Store error: {}", detail);
                "An unexpected error occurred".into()
            }
        };
        (
            status,
            ErrorBody {
                success: false,
                error,
                message,
            },
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Store(err.to_string())
    }
}

impl From<ObjectIdError> for AppError {
    fn from(err: ObjectIdError) -> Self {
        AppError::InvalidIdentifier(format!("Invalid identifier: {err}"))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Validation(msg)
            | AppError::InvalidIdentifier(msg)
            | AppError::NotFound(msg)
            | AppError::Store(msg) => write!(f, "{}: {}", self.code(), msg),
        }
    }
}

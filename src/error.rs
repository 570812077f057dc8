use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use sociable_like::LikeError;
use sociable_user::UserError;
use thiserror::Error;

/// Request-level error taxonomy. Every error is terminal for the current
/// request; nothing here retries.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or missing required fields (400).
    #[error("{0}")]
    Validation(String),

    /// Bad credentials (401).
    #[error("Invalid credentials")]
    Authentication,

    /// Missing or invalid session on a write (401).
    #[error("Unauthorized")]
    Unauthorized,

    /// Duplicate unique key (409).
    #[error("{0}")]
    Conflict(String),

    /// Backend unavailable (500).
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<LikeError> for AppError {
    fn from(err: LikeError) -> Self {
        match err {
            LikeError::EmptyPostId | LikeError::EmptyUserId => {
                AppError::Validation(err.to_string())
            }
            LikeError::Storage(e) => AppError::Storage(e.to_string()),
        }
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::UsernameTaken => AppError::Conflict("Username already in use".to_string()),
            UserError::Hashing(e) => AppError::Storage(e),
            UserError::Token(e) => AppError::Storage(e.to_string()),
            UserError::Database(e) => AppError::Storage(e.to_string()),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(_: validator::ValidationErrors) -> Self {
        AppError::Validation("Invalid request payload".to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Authentication => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Storage(e) => {
                tracing::error!(error = %e, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

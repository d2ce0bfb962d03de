// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use notes_common::ErrorResponse;
use thiserror::Error;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {}", .0.join(" "))]
    Validation(Vec<String>),

    #[error("Username is already taken.")]
    DuplicateUser,

    #[error("Invalid credentials.")]
    InvalidCredentials,

    #[error("Account locked. Try again in {minutes} minute(s).")]
    AccountLocked { minutes: i64 },

    #[error("This token has been revoked.")]
    TokenRevoked,

    #[error("Invalid token: {0}")]
    TokenInvalid(String),

    #[error("Invalid session or token mismatch.")]
    SessionMismatch,

    #[error("{0}")]
    MalformedClaims(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Session store error: {0}")]
    SessionStore(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::DuplicateUser
            | AppError::MalformedClaims(_)
            | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials
            | AppError::AccountLocked { .. }
            | AppError::TokenRevoked
            | AppError::TokenInvalid(_)
            | AppError::SessionMismatch => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials => "AUTH_001",
            AppError::AccountLocked { .. } => "AUTH_002",
            AppError::TokenInvalid(_) => "AUTH_003",
            AppError::TokenRevoked => "AUTH_004",
            AppError::SessionMismatch => "AUTH_005",
            AppError::MalformedClaims(_) => "AUTH_006",
            AppError::Validation(_) => "VAL_001",
            AppError::DuplicateUser => "VAL_002",
            AppError::InvalidInput(_) => "VAL_003",
            AppError::NotFound(_) => "NF_001",
            AppError::Configuration(_) => "CFG_001",
            AppError::SessionStore(_) => "SES_001",
            AppError::Storage(_) => "STO_001",
            AppError::Internal(_) => "INT_001",
            AppError::Io(_) => "IO_001",
            AppError::Json(_) => "JSON_001",
        }
    }

    /// Messages that are safe to show to the caller.
    ///
    /// Server-side failures never leak their cause; token failures collapse
    /// into one message except for revocation.
    pub fn public_messages(&self) -> Vec<String> {
        match self {
            AppError::Validation(violations) => violations.clone(),
            AppError::TokenInvalid(_) => vec!["Invalid or expired token.".to_string()],
            AppError::InvalidInput(msg) => vec![msg.clone()],
            AppError::NotFound(_) => vec!["Resource not found.".to_string()],
            AppError::DuplicateUser
            | AppError::InvalidCredentials
            | AppError::AccountLocked { .. }
            | AppError::TokenRevoked
            | AppError::SessionMismatch
            | AppError::MalformedClaims(_) => vec![self.to_string()],
            _ => vec!["An internal server error occurred.".to_string()],
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        } else {
            tracing::debug!(code = self.error_code(), error = %self, "request rejected");
        }

        let body = ErrorResponse {
            code: self.error_code().to_string(),
            errors: self.public_messages(),
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("blocking task failed: {err}"))
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::SessionStore(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

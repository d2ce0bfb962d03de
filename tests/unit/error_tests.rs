// =========================
// tests/unit/error_tests.rs
// =========================
//! Unit tests for the error module
use axum::http::StatusCode;
use notes_backend_lib::error::AppError;

#[test]
fn test_auth_failures_are_unauthorized() {
    for error in [
        AppError::InvalidCredentials,
        AppError::AccountLocked { minutes: 4 },
        AppError::TokenRevoked,
        AppError::TokenInvalid("ExpiredSignature".to_string()),
        AppError::SessionMismatch,
    ] {
        assert_eq!(error.status_code(), StatusCode::UNAUTHORIZED, "{error}");
    }
}

#[test]
fn test_client_errors_are_bad_requests() {
    for error in [
        AppError::Validation(vec!["Password is required.".to_string()]),
        AppError::DuplicateUser,
        AppError::MalformedClaims("Invalid token expiry.".to_string()),
        AppError::InvalidInput("Title is required.".to_string()),
    ] {
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST, "{error}");
    }
}

#[test]
fn test_error_codes_are_stable() {
    assert_eq!(AppError::InvalidCredentials.error_code(), "AUTH_001");
    assert_eq!(AppError::AccountLocked { minutes: 1 }.error_code(), "AUTH_002");
    assert_eq!(AppError::TokenRevoked.error_code(), "AUTH_004");
    assert_eq!(AppError::Configuration("x".to_string()).error_code(), "CFG_001");
}

#[test]
fn test_public_messages() {
    assert_eq!(
        AppError::AccountLocked { minutes: 2 }.public_messages(),
        vec!["Account locked. Try again in 2 minute(s).".to_string()]
    );
    assert_eq!(
        AppError::MalformedClaims("Invalid token.".to_string()).public_messages(),
        vec!["Invalid token.".to_string()]
    );
    assert_eq!(
        AppError::SessionStore("connection refused".to_string()).public_messages(),
        vec!["An internal server error occurred.".to_string()]
    );
}

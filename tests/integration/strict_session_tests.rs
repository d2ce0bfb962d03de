// ========================================
// tests/integration/strict_session_tests.rs
// ========================================
//! Single-session enforcement
use std::sync::Arc;
use axum::http::{Method, StatusCode};
use notes_backend_lib::{
    auth::{MemorySessionStore, SessionStore},
    config::SessionMode,
    error::AppError,
    storage::MemoryStorage,
    AppState,
};
use crate::test_utils::*;

#[tokio::test]
async fn test_strict_mode_requires_matching_user_header() {
    let (_state, app) = memory_app(strict_settings());
    let (token, user_id) = signed_in(&app, "alice1").await;

    let (status, body) = send(&app, build_request(Method::GET, "/notes", Some(&token), None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_messages(&body), vec!["Invalid session or token mismatch.".to_string()]);

    let (status, _) = send(&app, build_request(Method::GET, "/notes", Some(&token), Some(user_id + 1), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, build_request(Method::GET, "/notes", Some(&token), Some(user_id), None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_newer_login_invalidates_older_token() {
    let (_state, app) = memory_app(strict_settings());
    let (old_token, user_id) = signed_in(&app, "alice1").await;

    let (_, body) = login(&app, "alice1", STRONG_PASSWORD).await;
    let new_token = body["token"].as_str().unwrap().to_string();

    let (status, _) = send(&app, build_request(Method::GET, "/notes", Some(&old_token), Some(user_id), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, build_request(Method::GET, "/notes", Some(&new_token), Some(user_id), None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_in_strict_mode_revokes_and_clears_session() {
    let sessions = MemorySessionStore::new();
    let state = Arc::new(
        AppState::with_session_store(
            MemoryStorage::new(),
            strict_settings(),
            Some(Arc::new(sessions.clone())),
        )
        .unwrap(),
    );
    let app = notes_backend_lib::create_router(Arc::clone(&state));
    let (token, user_id) = signed_in(&app, "alice1").await;
    assert_eq!(sessions.get(user_id).await.unwrap().as_deref(), Some(token.as_str()));

    let (status, _) = logout(&app, &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sessions.get(user_id).await.unwrap(), None);

    let (status, body) = send(&app, build_request(Method::GET, "/notes", Some(&token), Some(user_id), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_messages(&body), vec!["This token has been revoked.".to_string()]);
}

#[tokio::test]
async fn test_logout_of_stale_token_keeps_current_session() {
    let (_state, app) = memory_app(strict_settings());
    let (old_token, user_id) = signed_in(&app, "alice1").await;
    let (_, body) = login(&app, "alice1", STRONG_PASSWORD).await;
    let new_token = body["token"].as_str().unwrap().to_string();

    let (status, _) = logout(&app, &old_token).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, build_request(Method::GET, "/notes", Some(&new_token), Some(user_id), None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[test]
fn test_strict_mode_without_store_is_a_configuration_error() {
    let settings = strict_settings();
    assert_eq!(settings.session.mode, SessionMode::Strict);
    let result = AppState::with_session_store(MemoryStorage::new(), settings, None);
    assert!(matches!(result, Err(AppError::Configuration(_))));
}

#[test]
fn test_missing_signing_key_refuses_to_start() {
    let mut settings = test_settings();
    settings.jwt.key = None;
    let result = AppState::new(MemoryStorage::new(), settings);
    assert!(matches!(result, Err(AppError::Configuration(_))));
}

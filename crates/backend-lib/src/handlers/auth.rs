// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! Registration, login and logout endpoints.
use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use notes_common::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest};
use crate::auth::Principal;
use crate::error::AppError;
use crate::storage::Storage;
use crate::AppState;

/// `POST /auth/register`
pub async fn register<S: Storage + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(request) = payload?;
    state.auth.register(request).await?;
    Ok(Json(MessageResponse::new("User registered successfully.")))
}

/// `POST /auth/login`
pub async fn login<S: Storage + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(request) = payload?;
    let response = state.auth.login(request).await?;
    Ok(Json(response))
}

/// `POST /auth/logout`. The bearer token has already been verified.
pub async fn logout<S: Storage + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<MessageResponse>, AppError> {
    state.auth.logout(&principal).await?;
    Ok(Json(MessageResponse::new("Logged out successfully.")))
}

// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the notes API.

pub mod auth;

pub use auth::{require_session, require_token, RequestGate, USER_ID_HEADER};

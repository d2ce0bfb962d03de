// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for Prometheus metric keys
pub const USER_REGISTERED: &str = "auth.user_registered";
pub const LOGIN_SUCCEEDED: &str = "auth.login.succeeded";
pub const LOGIN_FAILED: &str = "auth.login.failed";
pub const LOGIN_REJECTED_LOCKED: &str = "auth.login.rejected_locked";
pub const ACCOUNT_LOCKED: &str = "auth.account_locked";
pub const TOKEN_REVOKED: &str = "auth.token_revoked";
pub const GATE_REJECTED: &str = "gate.rejected";
pub const NOTE_WRITTEN: &str = "notes.written";

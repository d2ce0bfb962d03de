// ============================
// notes-backend-lib/src/auth/mod.rs
// ============================
//! Authentication: password policy, lockout, tokens, revocation and sessions.

pub mod lockout;
pub mod password;
pub mod policy;
pub mod revocation;
pub mod session;
pub mod token;
pub mod token_generator;
mod service;
mod service_impl;

pub use lockout::{remaining_minutes, FailureOutcome, LockoutPolicy};
pub use password::{hash_password, hash_password_blocking, verify_password, verify_password_blocking};
pub use policy::{validate_password, validate_registration, validate_username};
pub use revocation::{start_revocation_sweeper, RevocationRegistry};
pub use session::{MemorySessionStore, RedisSessionStore, SessionStore};
pub use token::{Claims, IssuedToken, Principal, TokenIssuer};
pub use service::AuthService;
pub use service_impl::DefaultAuth;

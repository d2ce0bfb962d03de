use async_trait::async_trait;
use notes_common::{LoginRequest, LoginResponse, RegisterRequest};
use crate::error::AppError;
use super::Principal;

/// Account lifecycle: registration, login and logout
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account after the password policy and uniqueness checks
    async fn register(&self, request: RegisterRequest) -> Result<(), AppError>;
    /// Verify credentials under the lockout rules and mint a token
    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError>;
    /// Revoke the caller's own, already validated token
    async fn logout(&self, principal: &Principal) -> Result<(), AppError>;
}

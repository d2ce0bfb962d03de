// crates/backend-lib/src/middleware/auth.rs

//! Request gate: nothing reaches note operations without passing it.
use std::sync::Arc;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use metrics::counter;
use notes_common::UserId;
use crate::auth::{Principal, RevocationRegistry, SessionStore, TokenIssuer};
use crate::error::AppError;
use crate::metrics::GATE_REJECTED;

/// Header carrying the caller's numeric user id in strict-session mode
pub const USER_ID_HEADER: &str = "x-user-id";

pub struct RequestGate {
    tokens: Arc<TokenIssuer>,
    revocations: Arc<RevocationRegistry>,
    sessions: Option<Arc<dyn SessionStore>>,
}

impl RequestGate {
    /// `sessions` switches on strict single-session checks
    pub fn new(
        tokens: Arc<TokenIssuer>,
        revocations: Arc<RevocationRegistry>,
        sessions: Option<Arc<dyn SessionStore>>,
    ) -> Self {
        Self { tokens, revocations, sessions }
    }

    /// Verify the bearer token and reject it if its identifier was revoked.
    ///
    /// A token without an identifier passes here; [`Self::authenticate`]
    /// refuses it.
    pub fn verify_bearer(&self, headers: &HeaderMap) -> Result<Principal, AppError> {
        let token = bearer_token(headers)?;
        let claims = self.tokens.verify(token)?;

        if let Some(jti) = claims.jti.as_deref() {
            if self.revocations.is_revoked(jti) {
                return Err(AppError::TokenRevoked);
            }
        }

        Ok(Principal {
            user_id: claims.user_id()?,
            username: claims.name.clone(),
            claims,
            token: token.to_string(),
        })
    }

    /// Signature, expiry, identifier and revocation checks
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Principal, AppError> {
        let principal = self.verify_bearer(headers)?;
        match principal.claims.jti.as_deref() {
            Some(jti) if !jti.is_empty() => Ok(principal),
            _ => Err(AppError::TokenInvalid("token carries no identifier".to_string())),
        }
    }

    /// Strict mode only: the user id header must name the token's subject and
    /// the session store must still hold this exact token.
    pub async fn confirm_session(&self, headers: &HeaderMap, principal: &Principal) -> Result<(), AppError> {
        let Some(sessions) = &self.sessions else {
            return Ok(());
        };

        let claimed: Option<UserId> = headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok());
        if claimed != Some(principal.user_id) {
            return Err(AppError::SessionMismatch);
        }

        match sessions.get(principal.user_id).await? {
            Some(current) if current == principal.token => Ok(()),
            _ => Err(AppError::SessionMismatch),
        }
    }

    /// Every check a note request has to pass
    pub async fn admit(&self, headers: &HeaderMap) -> Result<Principal, AppError> {
        let principal = self.authenticate(headers)?;
        self.confirm_session(headers, &principal).await?;
        Ok(principal)
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::TokenInvalid("missing authorization header".to_string()))?
        .to_str()
        .map_err(|_| AppError::TokenInvalid("authorization header is not ascii".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::TokenInvalid("expected a bearer token".to_string()))
}

fn rejected(err: AppError) -> AppError {
    counter!(GATE_REJECTED).increment(1);
    tracing::debug!(code = err.error_code(), "request gate rejected request");
    err
}

/// Valid, unrevoked bearer token. Used where the handler inspects the claims itself.
pub async fn require_token(
    State(gate): State<Arc<RequestGate>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = gate.verify_bearer(request.headers()).map_err(rejected)?;
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Full gate, including the strict-session check when enabled
pub async fn require_session(
    State(gate): State<Arc<RequestGate>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = gate.admit(request.headers()).await.map_err(rejected)?;
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

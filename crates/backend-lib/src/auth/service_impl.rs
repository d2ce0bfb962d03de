use std::sync::Arc;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use metrics::counter;
use notes_common::{LoginRequest, LoginResponse, RegisterRequest, UserId};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use zeroize::Zeroize;
use crate::config::{HashingSettings, PasswordRequirements, Settings};
use crate::error::AppError;
use crate::metrics as keys;
use crate::storage::Storage;
use super::{
    hash_password_blocking, remaining_minutes, validate_registration, verify_password_blocking,
    AuthService, FailureOutcome, LockoutPolicy, Principal, RevocationRegistry, SessionStore,
    TokenIssuer,
};

pub struct DefaultAuth<S> {
    storage: S,
    tokens: Arc<TokenIssuer>,
    revocations: Arc<RevocationRegistry>,
    /// Present only in strict single-session mode
    sessions: Option<Arc<dyn SessionStore>>,
    requirements: PasswordRequirements,
    lockout: LockoutPolicy,
    hashing: HashingSettings,
    login_guards: DashMap<UserId, Arc<Mutex<()>>>,
}

impl<S: Storage> DefaultAuth<S> {
    pub fn new(
        storage: S,
        settings: &Settings,
        tokens: Arc<TokenIssuer>,
        revocations: Arc<RevocationRegistry>,
        sessions: Option<Arc<dyn SessionStore>>,
    ) -> Self {
        Self {
            storage,
            tokens,
            revocations,
            sessions,
            requirements: settings.password_requirements.clone(),
            lockout: LockoutPolicy::from(&settings.lockout),
            hashing: settings.hashing.clone(),
            login_guards: DashMap::new(),
        }
    }

    fn login_guard(&self, user_id: UserId) -> Arc<Mutex<()>> {
        Arc::clone(self.login_guards.entry(user_id).or_default().value())
    }
}

#[async_trait]
impl<S: Storage> AuthService for DefaultAuth<S> {
    async fn register(&self, request: RegisterRequest) -> Result<(), AppError> {
        let RegisterRequest { username, mut password } = request;

        let violations = validate_registration(&username, &password, &self.requirements);
        if !violations.is_empty() {
            password.zeroize();
            return Err(AppError::Validation(violations));
        }

        // only checked once the format is valid
        if self.storage.find_user_by_username(&username).await?.is_some() {
            password.zeroize();
            return Err(AppError::DuplicateUser);
        }

        let hash = hash_password_blocking(password, self.hashing.clone()).await?;
        // a concurrent registration can still win the race; the store enforces uniqueness
        let user = self.storage.create_user(&username, &hash).await?;

        counter!(keys::USER_REGISTERED).increment(1);
        info!(user_id = user.id, username = %user.username, "user registered");
        Ok(())
    }

    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        let LoginRequest { username, mut password } = request;

        let Some(user) = self.storage.find_user_by_username(&username).await? else {
            password.zeroize();
            counter!(keys::LOGIN_FAILED).increment(1);
            return Err(AppError::InvalidCredentials);
        };

        // attempts on one account run one at a time, from the lock check to the write
        let guard = self.login_guard(user.id);
        let _serialized = guard.lock().await;
        let Some(mut user) = self.storage.find_user_by_username(&username).await? else {
            password.zeroize();
            counter!(keys::LOGIN_FAILED).increment(1);
            return Err(AppError::InvalidCredentials);
        };

        if let Err(locked) = self.lockout.check(&user, Utc::now()) {
            password.zeroize();
            counter!(keys::LOGIN_REJECTED_LOCKED).increment(1);
            warn!(user_id = user.id, "login attempt on locked account");
            return Err(locked);
        }

        let verified = verify_password_blocking(user.password_hash.clone(), password).await?;
        if !verified {
            let now = Utc::now();
            match self.storage.record_failed_login(user.id, &self.lockout, now).await? {
                FailureOutcome::Locked(until) => {
                    counter!(keys::ACCOUNT_LOCKED).increment(1);
                    warn!(user_id = user.id, %until, "account locked after repeated failures");
                },
                FailureOutcome::Counted(attempts) => {
                    debug!(user_id = user.id, attempts, "failed login");
                },
                FailureOutcome::AlreadyLocked(until) => {
                    counter!(keys::LOGIN_REJECTED_LOCKED).increment(1);
                    warn!(user_id = user.id, %until, "account was locked by another attempt");
                    return Err(AppError::AccountLocked {
                        minutes: remaining_minutes(until, now),
                    });
                },
            }
            counter!(keys::LOGIN_FAILED).increment(1);
            return Err(AppError::InvalidCredentials);
        }

        self.lockout.record_success(&mut user);
        self.storage
            .update_login_state(user.id, user.failed_login_attempts, user.lockout_end)
            .await?;

        let issued = self.tokens.issue(user.id, &user.username)?;
        if let Some(sessions) = &self.sessions {
            let ttl = self.tokens.lifetime().to_std().unwrap_or_default();
            sessions.set(user.id, &issued.token, ttl).await?;
        }

        counter!(keys::LOGIN_SUCCEEDED).increment(1);
        info!(user_id = user.id, jti = %issued.jti, "user logged in");
        Ok(LoginResponse {
            token: issued.token,
            user_id: user.id,
            username: user.username,
        })
    }

    async fn logout(&self, principal: &Principal) -> Result<(), AppError> {
        let jti = principal
            .claims
            .jti
            .as_deref()
            .filter(|jti| !jti.is_empty())
            .ok_or_else(|| AppError::MalformedClaims("Invalid token.".to_string()))?;
        // as long as the verifier would still accept the token, clock skew included
        let accepted_until = self
            .tokens
            .accepted_until(&principal.claims)
            .ok_or_else(|| AppError::MalformedClaims("Invalid token expiry.".to_string()))?;
        self.revocations.revoke(jti, accepted_until);

        if let Some(sessions) = &self.sessions {
            let current = sessions.get(principal.user_id).await?;
            if current.as_deref() == Some(principal.token.as_str()) {
                sessions.clear(principal.user_id).await?;
            }
        }

        counter!(keys::TOKEN_REVOKED).increment(1);
        info!(user_id = principal.user_id, jti, "user logged out");
        Ok(())
    }
}

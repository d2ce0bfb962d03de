// ============================
// notes-backend-lib/src/auth/token.rs
// ============================
//! Signed bearer tokens (HS256 JWT).
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use notes_common::UserId;
use serde::{Deserialize, Serialize};
use crate::config::JwtSettings;
use crate::error::AppError;
use super::token_generator::generate_token_id;

/// Below this an HMAC key is brute-forceable
const MIN_RECOMMENDED_KEY_BYTES: usize = 32;

/// Claims carried by every token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id
    pub sub: String,
    /// Username at issuance
    pub name: String,
    /// Unique token identifier, the revocation handle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Subject parsed as a user id
    pub fn user_id(&self) -> Result<UserId, AppError> {
        self.sub
            .parse()
            .map_err(|_| AppError::TokenInvalid("subject is not a user id".to_string()))
    }
}

/// A freshly minted token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub jti: String,
    pub expires_at: DateTime<Utc>,
}

/// The caller identity established by the request gate
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: UserId,
    pub username: String,
    pub claims: Claims,
    /// The raw bearer token as presented
    pub token: String,
}

/// Mints and verifies tokens with one shared secret
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    lifetime: Duration,
    /// Clock skew tolerated past `exp`
    leeway: Duration,
}

impl TokenIssuer {
    /// Fails when no signing key is configured; the service must not start
    /// without one.
    pub fn new(settings: &JwtSettings) -> Result<Self, AppError> {
        let key = settings
            .key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::Configuration("JWT signing key is missing".to_string()))?;
        if key.len() < MIN_RECOMMENDED_KEY_BYTES {
            tracing::warn!(
                bytes = key.len(),
                "JWT signing key is shorter than {MIN_RECOMMENDED_KEY_BYTES} bytes"
            );
        }

        let minutes = i64::try_from(settings.expires_in_minutes)
            .map_err(|_| AppError::Configuration("jwt.expires_in_minutes is too large".to_string()))?;
        let lifetime = Duration::try_minutes(minutes)
            .ok_or_else(|| AppError::Configuration("jwt.expires_in_minutes is too large".to_string()))?;

        let leeway_secs = i64::try_from(settings.clock_skew_secs)
            .map_err(|_| AppError::Configuration("jwt.clock_skew_secs is too large".to_string()))?;
        let leeway = Duration::try_seconds(leeway_secs)
            .ok_or_else(|| AppError::Configuration("jwt.clock_skew_secs is too large".to_string()))?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = settings.clock_skew_secs;
        validation.set_issuer(&[settings.issuer.as_str()]);
        validation.set_audience(&[settings.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(key.as_bytes()),
            decoding: DecodingKey::from_secret(key.as_bytes()),
            validation,
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
            lifetime,
            leeway,
        })
    }

    /// Validity window of issued tokens
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Last instant at which [`Self::verify`] still accepts a token with these
    /// claims. A revocation has to last at least this long.
    pub fn accepted_until(&self, claims: &Claims) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(claims.exp, 0)?.checked_add_signed(self.leeway)
    }

    /// Mint a token for a user
    pub fn issue(&self, user_id: UserId, username: &str) -> Result<IssuedToken, AppError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| AppError::Configuration("jwt.expires_in_minutes is too large".to_string()))?;
        let jti = generate_token_id();
        let claims = Claims {
            sub: user_id.to_string(),
            name: username.to_string(),
            jti: Some(jti.clone()),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("failed to sign token: {e}")))?;

        Ok(IssuedToken {
            token,
            jti,
            expires_at,
        })
    }

    /// Check signature, issuer, audience and expiry (with clock skew)
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::TokenInvalid(e.to_string()))
    }
}

// ============================
// notes-backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use scrypt::{password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng}, Params, Scrypt};
use zeroize::Zeroize;
use crate::config::HashingSettings;
use crate::error::AppError;

/// Output length of the derived key
const HASH_LEN: usize = 32;

fn scrypt_params(settings: &HashingSettings) -> anyhow::Result<Params> {
    Params::new(settings.scrypt_log_n, settings.scrypt_r, settings.scrypt_p, HASH_LEN)
        .map_err(|e| anyhow::anyhow!("invalid scrypt parameters: {e}"))
}

/// Hash a password using scrypt
pub fn hash_password(plain: &str, settings: &HashingSettings) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt
        .hash_password_customized(plain.as_bytes(), None, None, scrypt_params(settings)?, &salt)?
        .to_string();
    Ok(hash)
}

/// Verify a password against a hash
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
}

/// Securely hash a password and zeroize the original
pub fn hash_password_secure(plain: &mut String, settings: &HashingSettings) -> anyhow::Result<String> {
    let hash = hash_password(plain, settings);
    plain.zeroize();
    hash
}

/// Hash on the blocking pool; scrypt is deliberately expensive.
pub async fn hash_password_blocking(mut plain: String, settings: HashingSettings) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password_secure(&mut plain, &settings))
        .await?
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Verify on the blocking pool, zeroizing the candidate afterwards.
pub async fn verify_password_blocking(hash: String, mut plain: String) -> Result<bool, AppError> {
    Ok(tokio::task::spawn_blocking(move || {
        let ok = verify_password(&hash, &plain);
        plain.zeroize();
        ok
    })
    .await?)
}

// ============================
// notes-backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use figment::{Figment, providers::{Env, Format, Json, Serialized, Toml, Yaml}};
use anyhow::{bail, Result};

/// Environment variable prefix; nested keys are separated by `__`
pub const ENV_PREFIX: &str = "NOTES_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// One year; longer token lifetimes or lockouts are configuration mistakes
pub const MAX_DURATION_MINUTES: u64 = 365 * 24 * 60;

/// Upper bound for the verifier's clock skew tolerance
pub const MAX_CLOCK_SKEW_SECS: u64 = 60 * 60;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Data directory path
    pub data_dir: PathBuf,
    /// Log level
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Which credential/note store to use
    pub storage: StorageKind,
    /// Origin allowed to call the API from a browser
    pub allowed_origin: String,
    /// Token signing and validation
    pub jwt: JwtSettings,
    /// Password complexity requirements
    pub password_requirements: PasswordRequirements,
    /// Account lockout after repeated failures
    pub lockout: LockoutSettings,
    /// Password hashing cost
    pub hashing: HashingSettings,
    /// Session enforcement
    pub session: SessionSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// JSON document under `data_dir`
    File,
    /// Process memory, lost on restart
    Memory,
}

/// Signed token parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtSettings {
    /// Shared HMAC secret. There is deliberately no default.
    pub key: Option<String>,
    pub issuer: String,
    pub audience: String,
    /// Token validity window
    pub expires_in_minutes: u64,
    /// Tolerated drift between issuer and verifier clocks
    pub clock_skew_secs: u64,
}

/// Password complexity requirements
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordRequirements {
    /// Minimum password length
    pub min_length: usize,
    /// Require uppercase letters
    pub require_uppercase: bool,
    /// Require lowercase letters
    pub require_lowercase: bool,
    /// Require digits
    pub require_digit: bool,
    /// Require special characters
    pub require_special: bool,
    /// Minimum username length
    pub username_min_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LockoutSettings {
    /// Consecutive failures that lock the account
    pub max_failed_attempts: u32,
    /// How long a locked account rejects logins
    pub lockout_minutes: u64,
}

/// scrypt cost parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HashingSettings {
    pub scrypt_log_n: u8,
    pub scrypt_r: u32,
    pub scrypt_p: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// Signature, expiry and revocation checks only
    Stateless,
    /// Additionally require the session store to hold the presented token
    Strict,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub mode: SessionMode,
    /// Redis connection string for the strict-session store
    pub redis_url: Option<String>,
    /// Interval of the revocation sweeper, 0 disables it
    pub revocation_sweep_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            data_dir: PathBuf::from("data"),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            storage: StorageKind::File,
            allowed_origin: "http://localhost:5173".to_string(),
            jwt: JwtSettings::default(),
            password_requirements: PasswordRequirements::default(),
            lockout: LockoutSettings::default(),
            hashing: HashingSettings::default(),
            session: SessionSettings::default(),
        }
    }
}

impl Default for JwtSettings {
    fn default() -> Self {
        Self {
            key: None,
            issuer: "notes-api".to_string(),
            audience: "notes-app".to_string(),
            expires_in_minutes: 60,
            clock_skew_secs: 5 * 60,
        }
    }
}

impl Default for PasswordRequirements {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
            require_special: true,
            username_min_length: 4,
        }
    }
}

impl Default for LockoutSettings {
    fn default() -> Self {
        Self {
            max_failed_attempts: 5,
            lockout_minutes: 5,
        }
    }
}

impl Default for HashingSettings {
    fn default() -> Self {
        Self {
            scrypt_log_n: 17,
            scrypt_r: 8,
            scrypt_p: 1,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            mode: SessionMode::Stateless,
            redis_url: None,
            revocation_sweep_secs: 300,
        }
    }
}

impl Settings {
    /// Load settings from the default files in the working directory and the environment
    pub fn load() -> Result<Self> {
        let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("config.toml"))
            .merge(Yaml::file("config.yaml"))
            .merge(Json::file("config.json"))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from an explicit file, still honouring environment overrides
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let figment = Figment::from(Serialized::defaults(Settings::default()));
        let figment = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
            Some("json") => figment.merge(Json::file(path)),
            _ => figment.merge(Toml::file(path)),
        };
        let settings: Settings = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the service cannot run with.
    ///
    /// A missing signing key is not checked here; the token issuer refuses to
    /// start without one.
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            bail!("unknown log level: {}", self.log_level);
        }
        if self.jwt.expires_in_minutes == 0 || self.jwt.expires_in_minutes > MAX_DURATION_MINUTES {
            bail!("jwt.expires_in_minutes must be between 1 and {MAX_DURATION_MINUTES}");
        }
        if self.jwt.clock_skew_secs > MAX_CLOCK_SKEW_SECS {
            bail!("jwt.clock_skew_secs must be at most {MAX_CLOCK_SKEW_SECS}");
        }
        if self.jwt.issuer.trim().is_empty() || self.jwt.audience.trim().is_empty() {
            bail!("jwt.issuer and jwt.audience must be set");
        }
        if self.lockout.max_failed_attempts == 0 {
            bail!("lockout.max_failed_attempts must be positive");
        }
        if self.lockout.lockout_minutes == 0 || self.lockout.lockout_minutes > MAX_DURATION_MINUTES {
            bail!("lockout.lockout_minutes must be between 1 and {MAX_DURATION_MINUTES}");
        }
        if self.password_requirements.min_length == 0 {
            bail!("password_requirements.min_length must be positive");
        }
        if self.hashing.scrypt_log_n == 0 || self.hashing.scrypt_log_n >= 64 {
            bail!("hashing.scrypt_log_n must be between 1 and 63");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config/config_tests.rs"]
mod tests;

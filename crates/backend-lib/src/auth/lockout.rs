// ============================
// crates/backend-lib/src/auth/lockout.rs
// ============================
//! Per-account lockout after repeated failed logins.
//!
//! The counters live on the [`User`] record; this module only decides how
//! they move. Failures are applied by the storage backend through
//! [`crate::storage::Storage::record_failed_login`] so concurrent attempts
//! never count against a stale copy.

use chrono::{DateTime, Duration, Utc};
use crate::config::LockoutSettings;
use crate::error::AppError;
use crate::storage::User;

/// Default number of failed attempts before lockout
const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default lockout duration (5 minutes)
const DEFAULT_LOCKOUT_MINUTES: i64 = 5;

/// Outcome of a failed verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOutcome {
    /// Counter incremented, account still usable
    Counted(u32),
    /// Threshold reached, account locked until the given instant
    Locked(DateTime<Utc>),
    /// A concurrent attempt locked the account first; nothing was counted
    AlreadyLocked(DateTime<Utc>),
}

/// Lockout rules for authentication attempts
#[derive(Debug, Clone)]
pub struct LockoutPolicy {
    /// Maximum number of failed attempts before lockout
    max_attempts: u32,
    /// Duration of lockout period
    lockout_duration: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, Duration::minutes(DEFAULT_LOCKOUT_MINUTES))
    }
}

impl From<&LockoutSettings> for LockoutPolicy {
    fn from(settings: &LockoutSettings) -> Self {
        let duration = i64::try_from(settings.lockout_minutes)
            .ok()
            .and_then(Duration::try_minutes)
            .unwrap_or(Duration::MAX);
        Self::new(settings.max_failed_attempts, duration)
    }
}

impl LockoutPolicy {
    pub fn new(max_attempts: u32, lockout_duration: Duration) -> Self {
        Self {
            max_attempts,
            lockout_duration,
        }
    }

    /// Reject the attempt outright while the account is locked.
    ///
    /// No password comparison may happen when this fails.
    pub fn check(&self, user: &User, now: DateTime<Utc>) -> Result<(), AppError> {
        match user.lockout_end {
            Some(end) if end > now => Err(AppError::AccountLocked {
                minutes: remaining_minutes(end, now),
            }),
            _ => Ok(()),
        }
    }

    /// Record a failed password verification
    pub fn record_failure(&self, user: &mut User, now: DateTime<Utc>) -> FailureOutcome {
        if let Some(end) = user.lockout_end.filter(|end| *end > now) {
            return FailureOutcome::AlreadyLocked(end);
        }
        user.failed_login_attempts = user.failed_login_attempts.saturating_add(1);

        if user.failed_login_attempts >= self.max_attempts {
            let until = now
                .checked_add_signed(self.lockout_duration)
                .unwrap_or(DateTime::<Utc>::MAX_UTC);
            user.lockout_end = Some(until);
            user.failed_login_attempts = 0;
            FailureOutcome::Locked(until)
        } else {
            FailureOutcome::Counted(user.failed_login_attempts)
        }
    }

    /// Record a successful authentication
    pub fn record_success(&self, user: &mut User) {
        user.failed_login_attempts = 0;
        user.lockout_end = None;
    }
}

/// Whole minutes left in the lockout, rounded up
pub fn remaining_minutes(lockout_end: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (lockout_end - now).num_milliseconds().max(0);
    (millis + 59_999) / 60_000
}

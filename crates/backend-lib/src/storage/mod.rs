// ============================
// notes-backend-lib/src/storage/mod.rs
// ============================
//! Storage abstraction for user credentials and notes.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use notes_common::{Note, NoteId, UserId};
use serde::{Deserialize, Serialize};
use crate::auth::{FailureOutcome, LockoutPolicy};
use crate::error::AppError;

mod flat_file;
mod memory;

pub use flat_file::FlatFileStorage;
pub use memory::MemoryStorage;

/// Stored account. Never serialized onto the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Unique, case-sensitive, immutable
    pub username: String,
    /// scrypt PHC string
    pub password_hash: String,
    /// Consecutive failed logins since the last success or lockout
    pub failed_login_attempts: u32,
    /// Logins are rejected until this instant
    pub lockout_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Trait for storage backends
#[async_trait]
pub trait Storage: Send + Sync {
    /// Look up an account by exact username
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Create an account, failing with `DuplicateUser` if the name is taken
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, AppError>;

    /// Persist the lockout counters of an account
    async fn update_login_state(
        &self,
        user_id: UserId,
        failed_login_attempts: u32,
        lockout_end: Option<DateTime<Utc>>,
    ) -> Result<(), AppError>;

    /// Count one failed login against the stored record.
    ///
    /// The read, the policy transition and the write happen as one step, so
    /// concurrent failures are each counted and none is lost.
    async fn record_failed_login(
        &self,
        user_id: UserId,
        policy: &LockoutPolicy,
        now: DateTime<Utc>,
    ) -> Result<FailureOutcome, AppError>;

    /// Live notes of a user, newest first
    async fn list_notes(&self, user_id: UserId) -> Result<Vec<Note>, AppError>;

    /// Create a note owned by `user_id`
    async fn create_note(
        &self,
        user_id: UserId,
        title: &str,
        content: Option<&str>,
    ) -> Result<Note, AppError>;

    /// Update a live note owned by `user_id`. Returns false if there is none.
    async fn update_note(
        &self,
        user_id: UserId,
        note_id: NoteId,
        title: &str,
        content: Option<&str>,
    ) -> Result<bool, AppError>;

    /// Soft-delete a live note owned by `user_id`. Returns false if there is none.
    async fn delete_note(&self, user_id: UserId, note_id: NoteId) -> Result<bool, AppError>;
}

/// Newest first, ties broken by id so the order is stable
fn sort_newest_first(notes: &mut [Note]) {
    notes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

//! In-process storage, mainly for tests and throwaway deployments.
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use notes_common::{Note, NoteId, UserId};
use crate::auth::{FailureOutcome, LockoutPolicy};
use crate::error::AppError;
use super::{sort_newest_first, Storage, User};

#[derive(Default)]
struct Tables {
    /// Keyed by username, which doubles as the uniqueness constraint
    users: DashMap<String, User>,
    notes: DashMap<NoteId, Note>,
    last_user_id: AtomicI64,
    last_note_id: AtomicI64,
}

/// DashMap-backed implementation of the Storage trait
#[derive(Clone, Default)]
pub struct MemoryStorage {
    tables: Arc<Tables>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self.tables.users.get(username).map(|user| user.clone()))
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, AppError> {
        match self.tables.users.entry(username.to_string()) {
            Entry::Occupied(_) => Err(AppError::DuplicateUser),
            Entry::Vacant(slot) => {
                let user = User {
                    id: self.tables.last_user_id.fetch_add(1, Ordering::SeqCst) + 1,
                    username: username.to_string(),
                    password_hash: password_hash.to_string(),
                    failed_login_attempts: 0,
                    lockout_end: None,
                    created_at: Utc::now(),
                };
                slot.insert(user.clone());
                Ok(user)
            },
        }
    }

    async fn update_login_state(
        &self,
        user_id: UserId,
        failed_login_attempts: u32,
        lockout_end: Option<DateTime<Utc>>,
    ) -> Result<(), AppError> {
        let mut user = self
            .tables
            .users
            .iter_mut()
            .find(|user| user.id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("user {user_id}")))?;
        user.failed_login_attempts = failed_login_attempts;
        user.lockout_end = lockout_end;
        Ok(())
    }

    async fn record_failed_login(
        &self,
        user_id: UserId,
        policy: &LockoutPolicy,
        now: DateTime<Utc>,
    ) -> Result<FailureOutcome, AppError> {
        // the shard stays write-locked until the transition is stored
        let mut user = self
            .tables
            .users
            .iter_mut()
            .find(|user| user.id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("user {user_id}")))?;
        Ok(policy.record_failure(&mut user, now))
    }

    async fn list_notes(&self, user_id: UserId) -> Result<Vec<Note>, AppError> {
        let mut notes: Vec<Note> = self
            .tables
            .notes
            .iter()
            .filter(|note| note.user_id == user_id && !note.is_deleted())
            .map(|note| note.clone())
            .collect();
        sort_newest_first(&mut notes);
        Ok(notes)
    }

    async fn create_note(
        &self,
        user_id: UserId,
        title: &str,
        content: Option<&str>,
    ) -> Result<Note, AppError> {
        let now = Utc::now();
        let note = Note {
            id: self.tables.last_note_id.fetch_add(1, Ordering::SeqCst) + 1,
            user_id,
            title: title.to_string(),
            content: content.map(str::to_string),
            created_at: now,
            updated_at: now,
            deleted_at: None,
            del_by: None,
        };
        self.tables.notes.insert(note.id, note.clone());
        Ok(note)
    }

    async fn update_note(
        &self,
        user_id: UserId,
        note_id: NoteId,
        title: &str,
        content: Option<&str>,
    ) -> Result<bool, AppError> {
        match self.tables.notes.get_mut(&note_id) {
            Some(mut note) if note.user_id == user_id && !note.is_deleted() => {
                note.title = title.to_string();
                note.content = content.map(str::to_string);
                note.updated_at = Utc::now();
                Ok(true)
            },
            _ => Ok(false),
        }
    }

    async fn delete_note(&self, user_id: UserId, note_id: NoteId) -> Result<bool, AppError> {
        match self.tables.notes.get_mut(&note_id) {
            Some(mut note) if note.user_id == user_id && !note.is_deleted() => {
                note.deleted_at = Some(Utc::now());
                note.del_by = Some(user_id);
                Ok(true)
            },
            _ => Ok(false),
        }
    }
}

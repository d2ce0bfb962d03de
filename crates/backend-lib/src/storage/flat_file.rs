//! Flat-file implementation: one JSON document holding every table.
//!
//! Each mutation works on a copy of the tables and only replaces the
//! in-memory state once the copy has been written to disk (temp file +
//! rename), so a failed write leaves both sides unchanged.
use std::{fs, path::{Path, PathBuf}, sync::Arc};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use notes_common::{Note, NoteId, UserId};
use serde::{Deserialize, Serialize};
use tokio::{fs as tokio_fs, sync::Mutex};
use crate::auth::{FailureOutcome, LockoutPolicy};
use crate::error::AppError;
use super::{sort_newest_first, Storage, User};

const DB_FILE: &str = "notes-db.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Tables {
    last_user_id: UserId,
    last_note_id: NoteId,
    users: Vec<User>,
    notes: Vec<Note>,
}

/// Flat-file implementation of the Storage trait
#[derive(Clone)]
pub struct FlatFileStorage {
    path: PathBuf,
    tables: Arc<Mutex<Tables>>,
}

impl FlatFileStorage {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        let path = root.join(DB_FILE);
        let tables = if path.exists() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            Tables::default()
        };
        tracing::debug!(path = %path.display(), users = tables.users.len(), "opened flat-file storage");
        Ok(Self {
            path,
            tables: Arc::new(Mutex::new(tables)),
        })
    }

    async fn persist(&self, tables: &Tables) -> Result<(), AppError> {
        let json = serde_json::to_vec_pretty(tables)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio_fs::write(&tmp, json)
            .await
            .map_err(|e| AppError::Storage(format!("writing {}: {e}", tmp.display())))?;
        tokio_fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| AppError::Storage(format!("replacing {}: {e}", self.path.display())))?;
        Ok(())
    }

    /// Apply `change` to a copy of the tables, persist it, then publish it.
    async fn mutate<T>(
        &self,
        change: impl FnOnce(&mut Tables) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut guard = self.tables.lock().await;
        let mut next = guard.clone();
        let out = change(&mut next)?;
        self.persist(&next).await?;
        *guard = next;
        Ok(out)
    }
}

fn live_note_mut(tables: &mut Tables, user_id: UserId, note_id: NoteId) -> Option<&mut Note> {
    tables
        .notes
        .iter_mut()
        .find(|note| note.id == note_id && note.user_id == user_id && !note.is_deleted())
}

#[async_trait]
impl Storage for FlatFileStorage {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|user| user.username == username).cloned())
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, AppError> {
        self.mutate(|tables| {
            if tables.users.iter().any(|user| user.username == username) {
                return Err(AppError::DuplicateUser);
            }
            tables.last_user_id += 1;
            let user = User {
                id: tables.last_user_id,
                username: username.to_string(),
                password_hash: password_hash.to_string(),
                failed_login_attempts: 0,
                lockout_end: None,
                created_at: Utc::now(),
            };
            tables.users.push(user.clone());
            Ok(user)
        })
        .await
    }

    async fn update_login_state(
        &self,
        user_id: UserId,
        failed_login_attempts: u32,
        lockout_end: Option<DateTime<Utc>>,
    ) -> Result<(), AppError> {
        self.mutate(|tables| {
            let user = tables
                .users
                .iter_mut()
                .find(|user| user.id == user_id)
                .ok_or_else(|| AppError::NotFound(format!("user {user_id}")))?;
            user.failed_login_attempts = failed_login_attempts;
            user.lockout_end = lockout_end;
            Ok(())
        })
        .await
    }

    async fn record_failed_login(
        &self,
        user_id: UserId,
        policy: &LockoutPolicy,
        now: DateTime<Utc>,
    ) -> Result<FailureOutcome, AppError> {
        self.mutate(|tables| {
            let user = tables
                .users
                .iter_mut()
                .find(|user| user.id == user_id)
                .ok_or_else(|| AppError::NotFound(format!("user {user_id}")))?;
            Ok(policy.record_failure(user, now))
        })
        .await
    }

    async fn list_notes(&self, user_id: UserId) -> Result<Vec<Note>, AppError> {
        let tables = self.tables.lock().await;
        let mut notes: Vec<Note> = tables
            .notes
            .iter()
            .filter(|note| note.user_id == user_id && !note.is_deleted())
            .cloned()
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
        self.mutate(|tables| {
            tables.last_note_id += 1;
            let now = Utc::now();
            let note = Note {
                id: tables.last_note_id,
                user_id,
                title: title.to_string(),
                content: content.map(str::to_string),
                created_at: now,
                updated_at: now,
                deleted_at: None,
                del_by: None,
            };
            tables.notes.push(note.clone());
            Ok(note)
        })
        .await
    }

    async fn update_note(
        &self,
        user_id: UserId,
        note_id: NoteId,
        title: &str,
        content: Option<&str>,
    ) -> Result<bool, AppError> {
        self.mutate(|tables| {
            Ok(match live_note_mut(tables, user_id, note_id) {
                Some(note) => {
                    note.title = title.to_string();
                    note.content = content.map(str::to_string);
                    note.updated_at = Utc::now();
                    true
                },
                None => false,
            })
        })
        .await
    }

    async fn delete_note(&self, user_id: UserId, note_id: NoteId) -> Result<bool, AppError> {
        self.mutate(|tables| {
            Ok(match live_note_mut(tables, user_id, note_id) {
                Some(note) => {
                    note.deleted_at = Some(Utc::now());
                    note.del_by = Some(user_id);
                    true
                },
                None => false,
            })
        })
        .await
    }
}

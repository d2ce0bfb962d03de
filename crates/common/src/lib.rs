// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! used for communication between the notes front end and the server.
//! This module defines the JSON request and response bodies of the REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Numeric identifier of a user account
pub type UserId = i64;

/// Numeric identifier of a note
pub type NoteId = i64;

/// Body of `POST /auth/register`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Body of `POST /auth/login`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Successful login
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Signed bearer token
    pub token: String,
    /// Id of the authenticated user
    pub user_id: UserId,
    /// Name of the authenticated user
    pub username: String,
}

/// Plain confirmation message
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error body returned by every failing endpoint
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorResponse {
    /// Stable machine-readable code
    pub code: String,
    /// Human readable messages, one per problem
    pub errors: Vec<String>,
}

/// Body of `POST /notes` and `PUT /notes/{id}`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct NoteRequest {
    /// Optional on create; when present on update it must match the path
    #[serde(default)]
    pub id: Option<NoteId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
}

/// A note as stored and returned by the API
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub user_id: UserId,
    pub title: String,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set when the note has been soft-deleted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    /// User that deleted the note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub del_by: Option<UserId>,
}

impl Note {
    /// Whether the note has been soft-deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

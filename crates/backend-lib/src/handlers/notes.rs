// ============================
// crates/backend-lib/src/handlers/notes.rs
// ============================
//! Note CRUD. Every handler runs behind the full request gate and only ever
//! touches the caller's own notes.
use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use metrics::counter;
use notes_common::{Note, NoteId, NoteRequest};
use tracing::info;
use crate::auth::Principal;
use crate::error::AppError;
use crate::metrics::NOTE_WRITTEN;
use crate::storage::Storage;
use crate::AppState;

fn required_title(request: &NoteRequest) -> Result<&str, AppError> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput("Title is required.".to_string()));
    }
    Ok(title)
}

/// `GET /notes`
pub async fn list_notes<S: Storage + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<Note>>, AppError> {
    let notes = state.storage.list_notes(principal.user_id).await?;
    Ok(Json(notes))
}

/// `POST /notes`
pub async fn create_note<S: Storage + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<NoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Note>), AppError> {
    let Json(request) = payload?;
    let title = required_title(&request)?;

    let note = state
        .storage
        .create_note(principal.user_id, title, request.content.as_deref())
        .await?;

    counter!(NOTE_WRITTEN).increment(1);
    info!(user_id = principal.user_id, note_id = note.id, "note created");
    Ok((StatusCode::CREATED, Json(note)))
}

/// `PUT /notes/{id}`
pub async fn update_note<S: Storage + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<NoteId>,
    payload: Result<Json<NoteRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(request) = payload?;
    if request.id.is_some_and(|body_id| body_id != id) {
        return Err(AppError::InvalidInput("Id mismatch.".to_string()));
    }
    let title = required_title(&request)?;

    let updated = state
        .storage
        .update_note(principal.user_id, id, title, request.content.as_deref())
        .await?;
    if !updated {
        return Err(AppError::NotFound(format!("note {id}")));
    }

    counter!(NOTE_WRITTEN).increment(1);
    info!(user_id = principal.user_id, note_id = id, "note updated");
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /notes/{id}`, a soft delete
pub async fn delete_note<S: Storage + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<NoteId>,
) -> Result<StatusCode, AppError> {
    if !state.storage.delete_note(principal.user_id, id).await? {
        return Err(AppError::NotFound(format!("note {id}")));
    }

    info!(user_id = principal.user_id, note_id = id, "note deleted");
    Ok(StatusCode::NO_CONTENT)
}

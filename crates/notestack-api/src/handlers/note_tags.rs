//! Note/tag association handlers.
//!
//! Linking and unlinking require the requester to own both the note and the
//! tag. The note is checked first; the first failing check decides the
//! response.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use notestack_core::NoteTag;
use serde::Deserialize;
use tracing::info;

use super::{positive_id, required_id, with_tags_all, MessageResponse, NoteResponse};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::ownership::OwnershipGuard;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddNoteTagBody {
    pub note_id: Option<i64>,
    pub tag_id: Option<i64>,
}

pub async fn add_tag_to_note(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Result<Json<AddNoteTagBody>, JsonRejection>,
) -> Result<Json<NoteTag>, ApiError> {
    let Json(body) = body?;
    let note_id = required_id(body.note_id, "note_id")?;
    let tag_id = required_id(body.tag_id, "tag_id")?;

    let guard = OwnershipGuard::new(&state, auth.username());
    guard.note(note_id).await?;
    guard.tag(tag_id).await?;

    let link = state.note_tags.add(note_id, tag_id).await?;

    info!(
        subsystem = "api",
        component = "note_tags",
        op = "add",
        username = auth.username(),
        note_id,
        tag_id,
        "Tag attached to note"
    );
    Ok(Json(link))
}

pub async fn remove_tag_from_note(
    State(state): State<AppState>,
    auth: AuthUser,
    ids: Result<Path<(i64, i64)>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path((note_id, tag_id)) = ids?;
    let note_id = positive_id(note_id, "id")?;
    let tag_id = positive_id(tag_id, "tag_id")?;

    let guard = OwnershipGuard::new(&state, auth.username());
    guard.note(note_id).await?;
    guard.tag(tag_id).await?;

    state.note_tags.remove(note_id, tag_id).await?;
    Ok(MessageResponse::new("tag removed from note"))
}

/// Notes carrying tag `id`, restricted to the requester's own notes and tags.
pub async fn list_notes_for_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<NoteResponse>>, ApiError> {
    let Path(id) = id?;
    let tag_id = positive_id(id, "id")?;

    let notes = state
        .note_tags
        .notes_for_tag(tag_id, auth.username())
        .await?;
    Ok(Json(with_tags_all(&state, notes).await))
}

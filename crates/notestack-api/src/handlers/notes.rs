//! Note lifecycle handlers.

use std::ops::RangeInclusive;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use notestack_core::{CreateNoteRequest, ListNotesRequest, SearchNotesRequest, UpdateNoteRequest};
use serde::Deserialize;
use tracing::{debug, info};

use super::{
    cursor, page_size, positive_id, required_text, with_tags, with_tags_all, MessageResponse,
    NoteResponse,
};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::ownership::OwnershipGuard;
use crate::state::AppState;

/// Allowed `page_size` for note listing and search.
pub const NOTE_PAGE_SIZES: RangeInclusive<i64> = 5..=100;

/// Body for creating a note. Any `owner` field is ignored.
#[derive(Debug, Deserialize)]
pub struct CreateNoteBody {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNoteBody {
    pub title: Option<String>,
    pub content: Option<String>,
    pub pinned: Option<bool>,
    pub archived: Option<bool>,
}

/// Query for `GET /notes`.
///
/// Without `search`, `cursor` is a keyset position (return ids greater than
/// it). With `search`, the same parameter is a row offset into the
/// id-ordered matches.
#[derive(Debug, Deserialize)]
pub struct ListNotesQuery {
    pub cursor: Option<i64>,
    pub page_size: Option<i64>,
    pub search: Option<String>,
}

pub async fn create_note(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Result<Json<CreateNoteBody>, JsonRejection>,
) -> Result<Json<NoteResponse>, ApiError> {
    let Json(body) = body?;
    let title = required_text(body.title, "title")?;
    let content = required_text(body.content, "content")?;

    let note = state
        .notes
        .insert(CreateNoteRequest {
            owner: auth.username().to_string(),
            title,
            content,
        })
        .await?;

    info!(
        subsystem = "api",
        component = "notes",
        op = "create",
        username = auth.username(),
        note_id = note.note_id,
        "Note created"
    );
    Ok(Json(NoteResponse {
        note,
        tags: Vec::new(),
    }))
}

pub async fn get_note(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<NoteResponse>, ApiError> {
    let Path(id) = id?;
    let id = positive_id(id, "id")?;

    let note = OwnershipGuard::new(&state, auth.username()).note(id).await?;
    Ok(Json(with_tags(&state, note).await))
}

pub async fn list_notes(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<ListNotesQuery>, QueryRejection>,
) -> Result<Json<Vec<NoteResponse>>, ApiError> {
    let Query(query) = query?;
    let limit = page_size(query.page_size, NOTE_PAGE_SIZES)?;
    let cursor = cursor(query.cursor, "cursor")?;
    let owner = auth.username().to_string();

    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let notes = match search {
        Some(text) => {
            state
                .notes
                .search(SearchNotesRequest {
                    owner,
                    query: text.to_string(),
                    limit,
                    offset: cursor,
                })
                .await?
        }
        None => {
            state
                .notes
                .list(ListNotesRequest {
                    owner,
                    after_id: cursor,
                    limit,
                })
                .await?
        }
    };

    debug!(
        subsystem = "api",
        component = "notes",
        op = if search.is_some() { "search" } else { "list" },
        username = auth.username(),
        result_count = notes.len(),
        "Listed notes"
    );
    Ok(Json(with_tags_all(&state, notes).await))
}

pub async fn update_note(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateNoteBody>, JsonRejection>,
) -> Result<Json<NoteResponse>, ApiError> {
    let Path(id) = id?;
    let id = positive_id(id, "id")?;
    let Json(body) = body?;
    let title = required_text(body.title, "title")?;
    let content = required_text(body.content, "content")?;

    OwnershipGuard::new(&state, auth.username()).note(id).await?;

    let note = state
        .notes
        .update(UpdateNoteRequest {
            note_id: id,
            title,
            content,
            pinned: body.pinned,
            archived: body.archived,
        })
        .await?;
    Ok(Json(with_tags(&state, note).await))
}

pub async fn delete_note(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = id?;
    let id = positive_id(id, "id")?;

    OwnershipGuard::new(&state, auth.username()).note(id).await?;
    state.notes.delete_with_links(id).await?;

    info!(
        subsystem = "api",
        component = "notes",
        op = "delete",
        username = auth.username(),
        note_id = id,
        "Note deleted"
    );
    Ok(MessageResponse::new("note deleted"))
}

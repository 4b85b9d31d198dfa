//! HTTP handlers and the helpers they share.

pub mod note_tags;
pub mod notes;
pub mod tags;
pub mod users;

use std::ops::RangeInclusive;

use axum::extract::State;
use axum::Json;
use notestack_core::{Note, TagSummary};
use serde::Serialize;
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

/// A note together with the tags attached to it.
#[derive(Debug, Serialize)]
pub struct NoteResponse {
    #[serde(flatten)]
    pub note: Note,
    pub tags: Vec<TagSummary>,
}

/// Body for operations that return no resource.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Json<Self> {
        Json(Self { message })
    }
}

/// Attach the note's tags. A failed lookup is logged and yields no tags.
pub(crate) async fn with_tags(state: &AppState, note: Note) -> NoteResponse {
    let tags = match state.note_tags.tags_for_note(note.note_id).await {
        Ok(tags) => tags,
        Err(e) => {
            warn!(
                subsystem = "api",
                component = "notes",
                note_id = note.note_id,
                error = %e,
                "Failed to load tags for note"
            );
            Vec::new()
        }
    };
    NoteResponse { note, tags }
}

pub(crate) async fn with_tags_all(state: &AppState, notes: Vec<Note>) -> Vec<NoteResponse> {
    let mut out = Vec::with_capacity(notes.len());
    for note in notes {
        out.push(with_tags(state, note).await);
    }
    out
}

pub(crate) fn positive_id(id: i64, field: &str) -> Result<i64, ApiError> {
    if id < 1 {
        return Err(ApiError::BadRequest(format!(
            "{} must be a positive integer",
            field
        )));
    }
    Ok(id)
}

pub(crate) fn required_id(id: Option<i64>, field: &str) -> Result<i64, ApiError> {
    let id = id.ok_or_else(|| ApiError::BadRequest(format!("{} is required", field)))?;
    positive_id(id, field)
}

/// Require a non-blank string field.
pub(crate) fn required_text(value: Option<String>, field: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::BadRequest(format!("{} is required", field))),
    }
}

pub(crate) fn page_size(value: Option<i64>, allowed: RangeInclusive<i64>) -> Result<i64, ApiError> {
    let size = value.ok_or_else(|| ApiError::BadRequest("page_size is required".to_string()))?;
    if !allowed.contains(&size) {
        return Err(ApiError::BadRequest(format!(
            "page_size must be between {} and {}",
            allowed.start(),
            allowed.end()
        )));
    }
    Ok(size)
}

pub(crate) fn cursor(value: Option<i64>, field: &str) -> Result<i64, ApiError> {
    let cursor = value.unwrap_or(0);
    if cursor < 0 {
        return Err(ApiError::BadRequest(format!("{} must not be negative", field)));
    }
    Ok(cursor)
}

/// Liveness probe. Pings the database when one is configured.
pub async fn health(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    if let Some(pool) = &state.pool {
        sqlx::query("SELECT 1")
            .execute(pool)
            .await
            .map_err(|e| ApiError::Internal(format!("database unavailable: {}", e)))?;
        notestack_db::log_pool_metrics(pool);
    }

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "store": state.store_kind(),
    })))
}

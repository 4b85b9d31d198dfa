//! Core traits for notestack storage.
//!
//! These traits define the interfaces that concrete stores must satisfy.
//! `notestack-db` provides PostgreSQL implementations and an in-memory store
//! used by tests and local runs.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// USER REPOSITORY
// =============================================================================

/// Repository for account records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. A taken username or email yields `Error::Duplicate`.
    async fn insert(&self, req: CreateUserRequest) -> Result<User>;

    /// Fetch a user by username.
    async fn fetch(&self, username: &str) -> Result<Option<User>>;
}

// =============================================================================
// NOTE REPOSITORY
// =============================================================================

/// Keyset page request: notes of `owner` with `note_id > after_id`, ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListNotesRequest {
    pub owner: String,
    pub after_id: i64,
    pub limit: i64,
}

/// Text search page request, scoped to `owner`.
///
/// Unlike [`ListNotesRequest`], pagination here is offset based: results are
/// ordered by ascending id and `offset` rows are skipped. Offsets shift when
/// notes are inserted concurrently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchNotesRequest {
    pub owner: String,
    pub query: String,
    pub limit: i64,
    pub offset: i64,
}

/// Repository for note CRUD operations.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a new note; the store assigns id and timestamps.
    async fn insert(&self, req: CreateNoteRequest) -> Result<Note>;

    /// Fetch a note by id.
    async fn fetch(&self, id: i64) -> Result<Option<Note>>;

    /// List one keyset page of the owner's notes.
    async fn list(&self, req: ListNotesRequest) -> Result<Vec<Note>>;

    /// Search the owner's notes by title and content.
    async fn search(&self, req: SearchNotesRequest) -> Result<Vec<Note>>;

    /// Update title/content (and flags when given). `Error::NotFound` if absent.
    async fn update(&self, req: UpdateNoteRequest) -> Result<Note>;

    /// Remove the note's tag links and the note in one transaction.
    ///
    /// `Error::NotFound` if the note does not exist; nothing is removed then.
    async fn delete_with_links(&self, id: i64) -> Result<()>;
}

// =============================================================================
// TAG REPOSITORY
// =============================================================================

/// Keyset page request for tags of `owner` with `tag_id > after_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTagsRequest {
    pub owner: String,
    pub after_id: i64,
    pub limit: i64,
}

/// Repository for tag management.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Insert a new tag. A duplicate `(owner, name)` yields `Error::Duplicate`.
    async fn insert(&self, req: CreateTagRequest) -> Result<Tag>;

    /// Fetch a tag by id.
    async fn fetch(&self, id: i64) -> Result<Option<Tag>>;

    /// List one keyset page of the owner's tags.
    async fn list(&self, req: ListTagsRequest) -> Result<Vec<Tag>>;

    /// Remove the tag's note links and the tag in one transaction.
    async fn delete_with_links(&self, id: i64) -> Result<()>;
}

// =============================================================================
// NOTE-TAG REPOSITORY
// =============================================================================

/// Repository for note/tag associations.
#[async_trait]
pub trait NoteTagRepository: Send + Sync {
    /// Link a tag to a note. An existing link yields `Error::Duplicate`.
    async fn add(&self, note_id: i64, tag_id: i64) -> Result<NoteTag>;

    /// Unlink a tag from a note. Removing a missing link is not an error.
    async fn remove(&self, note_id: i64, tag_id: i64) -> Result<()>;

    /// Tags attached to a note, ordered by tag id.
    async fn tags_for_note(&self, note_id: i64) -> Result<Vec<TagSummary>>;

    /// Notes of `owner` carrying the tag, ordered by note id.
    async fn notes_for_tag(&self, tag_id: i64, owner: &str) -> Result<Vec<Note>>;
}

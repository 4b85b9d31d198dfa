//! In-process store implementing every repository trait.
//!
//! Used by the API integration tests and by `STORE_BACKEND=memory` for local
//! runs. All state sits behind one `RwLock`, so multi-step operations such as
//! note deletion are atomic with respect to other requests. Ids are assigned
//! from per-table counters starting at 1, mirroring `BIGSERIAL`.
//!
//! Search matches a note when the whole query is a case-insensitive substring
//! of its title or content, or when every whitespace-separated query term is.
//! This approximates the PostgreSQL full-text match without stemming.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use notestack_core::{
    CreateNoteRequest, CreateTagRequest, CreateUserRequest, Error, ListNotesRequest,
    ListTagsRequest, Note, NoteRepository, NoteTag, NoteTagRepository, Result,
    SearchNotesRequest, Tag, TagRepository, TagSummary, UpdateNoteRequest, User, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<String, User>,
    notes: BTreeMap<i64, Note>,
    tags: BTreeMap<i64, Tag>,
    /// `(note_id, tag_id)` pairs.
    links: BTreeSet<(i64, i64)>,
    last_note_id: i64,
    last_tag_id: i64,
}

/// Shared in-memory store. Cloning yields another handle to the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of note/tag links currently stored.
    pub async fn link_count(&self) -> usize {
        self.tables.read().await.links.len()
    }
}

fn take_page<T: Clone>(items: impl Iterator<Item = T>, offset: i64, limit: i64) -> Vec<T> {
    items
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

fn matches_query(note: &Note, query: &str) -> bool {
    let haystacks: Vec<String> = [&note.title, &note.content]
        .into_iter()
        .flatten()
        .map(|text| text.to_lowercase())
        .collect();
    let query = query.to_lowercase();
    let contains = |needle: &str| haystacks.iter().any(|text| text.contains(needle));

    let mut terms = query.split_whitespace().peekable();
    if terms.peek().is_none() {
        return false;
    }
    contains(query.as_str()) || terms.all(contains)
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, req: CreateUserRequest) -> Result<User> {
        let mut tables = self.tables.write().await;

        if tables.users.contains_key(&req.username) {
            return Err(Error::Duplicate("username already taken".to_string()));
        }
        if tables.users.values().any(|u| u.email == req.email) {
            return Err(Error::Duplicate("email already registered".to_string()));
        }

        let now = Utc::now();
        let user = User {
            username: req.username,
            hashed_password: req.hashed_password,
            email: req.email,
            password_changed_at: now,
            created_at: now,
        };
        tables.users.insert(user.username.clone(), user.clone());
        Ok(user)
    }

    async fn fetch(&self, username: &str) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(username).cloned())
    }
}

#[async_trait]
impl NoteRepository for MemoryStore {
    async fn insert(&self, req: CreateNoteRequest) -> Result<Note> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&req.owner) {
            return Err(Error::NotFound(format!("user {} not found", req.owner)));
        }

        tables.last_note_id += 1;
        let now = Utc::now();
        let note = Note {
            note_id: tables.last_note_id,
            owner: req.owner,
            title: Some(req.title),
            content: Some(req.content),
            pinned: false,
            archived: false,
            created_at: now,
            updated_at: now,
        };
        tables.notes.insert(note.note_id, note.clone());
        Ok(note)
    }

    async fn fetch(&self, id: i64) -> Result<Option<Note>> {
        Ok(self.tables.read().await.notes.get(&id).cloned())
    }

    async fn list(&self, req: ListNotesRequest) -> Result<Vec<Note>> {
        let tables = self.tables.read().await;
        let notes = tables
            .notes
            .range(req.after_id.saturating_add(1)..)
            .map(|(_, note)| note)
            .filter(|note| note.owner == req.owner)
            .cloned();
        Ok(take_page(notes, 0, req.limit))
    }

    async fn search(&self, req: SearchNotesRequest) -> Result<Vec<Note>> {
        let tables = self.tables.read().await;
        let notes = tables
            .notes
            .values()
            .filter(|note| note.owner == req.owner && matches_query(note, &req.query))
            .cloned();
        Ok(take_page(notes, req.offset, req.limit))
    }

    async fn update(&self, req: UpdateNoteRequest) -> Result<Note> {
        let mut tables = self.tables.write().await;
        let note = tables
            .notes
            .get_mut(&req.note_id)
            .ok_or_else(|| Error::NotFound(format!("note {} not found", req.note_id)))?;

        note.title = Some(req.title);
        note.content = Some(req.content);
        if let Some(pinned) = req.pinned {
            note.pinned = pinned;
        }
        if let Some(archived) = req.archived {
            note.archived = archived;
        }
        note.updated_at = Utc::now();
        Ok(note.clone())
    }

    async fn delete_with_links(&self, id: i64) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.notes.remove(&id).is_none() {
            return Err(Error::NotFound(format!("note {} not found", id)));
        }
        tables.links.retain(|(note_id, _)| *note_id != id);
        Ok(())
    }
}

#[async_trait]
impl TagRepository for MemoryStore {
    async fn insert(&self, req: CreateTagRequest) -> Result<Tag> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&req.owner) {
            return Err(Error::NotFound(format!("user {} not found", req.owner)));
        }
        if tables
            .tags
            .values()
            .any(|t| t.owner == req.owner && t.name == req.name)
        {
            return Err(Error::Duplicate(format!("tag '{}' already exists", req.name)));
        }

        tables.last_tag_id += 1;
        let tag = Tag {
            tag_id: tables.last_tag_id,
            owner: req.owner,
            name: req.name,
        };
        tables.tags.insert(tag.tag_id, tag.clone());
        Ok(tag)
    }

    async fn fetch(&self, id: i64) -> Result<Option<Tag>> {
        Ok(self.tables.read().await.tags.get(&id).cloned())
    }

    async fn list(&self, req: ListTagsRequest) -> Result<Vec<Tag>> {
        let tables = self.tables.read().await;
        let tags = tables
            .tags
            .range(req.after_id.saturating_add(1)..)
            .map(|(_, tag)| tag)
            .filter(|tag| tag.owner == req.owner)
            .cloned();
        Ok(take_page(tags, 0, req.limit))
    }

    async fn delete_with_links(&self, id: i64) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.tags.remove(&id).is_none() {
            return Err(Error::NotFound(format!("tag {} not found", id)));
        }
        tables.links.retain(|(_, tag_id)| *tag_id != id);
        Ok(())
    }
}

#[async_trait]
impl NoteTagRepository for MemoryStore {
    async fn add(&self, note_id: i64, tag_id: i64) -> Result<NoteTag> {
        let mut tables = self.tables.write().await;

        if !tables.notes.contains_key(&note_id) {
            return Err(Error::NotFound(format!("note {} not found", note_id)));
        }
        if !tables.tags.contains_key(&tag_id) {
            return Err(Error::NotFound(format!("tag {} not found", tag_id)));
        }
        if !tables.links.insert((note_id, tag_id)) {
            return Err(Error::Duplicate("tag already attached to note".to_string()));
        }
        Ok(NoteTag { note_id, tag_id })
    }

    async fn remove(&self, note_id: i64, tag_id: i64) -> Result<()> {
        self.tables.write().await.links.remove(&(note_id, tag_id));
        Ok(())
    }

    async fn tags_for_note(&self, note_id: i64) -> Result<Vec<TagSummary>> {
        let tables = self.tables.read().await;
        let mut tags: Vec<TagSummary> = tables
            .links
            .range((note_id, i64::MIN)..=(note_id, i64::MAX))
            .filter_map(|(_, tag_id)| tables.tags.get(tag_id))
            .cloned()
            .map(TagSummary::from)
            .collect();
        tags.sort_by_key(|t| t.tag_id);
        Ok(tags)
    }

    async fn notes_for_tag(&self, tag_id: i64, owner: &str) -> Result<Vec<Note>> {
        let tables = self.tables.read().await;
        let tag_owned = tables.tags.get(&tag_id).is_some_and(|t| t.owner == owner);
        if !tag_owned {
            return Ok(Vec::new());
        }

        Ok(tables
            .links
            .iter()
            .filter(|(_, t)| *t == tag_id)
            .filter_map(|(note_id, _)| tables.notes.get(note_id))
            .filter(|note| note.owner == owner)
            .cloned()
            .collect())
    }
}

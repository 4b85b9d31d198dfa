//! Shared application state passed to every handler.

use std::sync::Arc;

use chrono::Duration;
use notestack_core::{NoteRepository, NoteTagRepository, TagRepository, UserRepository};
use notestack_crypto::TokenMaker;
use notestack_db::{Database, MemoryStore};
use sqlx::PgPool;

/// Store handles, token maker and token lifetime. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub notes: Arc<dyn NoteRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub note_tags: Arc<dyn NoteTagRepository>,
    pub tokens: Arc<TokenMaker>,
    pub access_token_duration: Duration,
    /// Present for the PostgreSQL backend; used by the health check.
    pub pool: Option<PgPool>,
}

impl AppState {
    /// State backed by PostgreSQL repositories.
    pub fn from_database(
        db: Database,
        tokens: TokenMaker,
        access_token_duration: Duration,
    ) -> Self {
        Self {
            users: Arc::new(db.users),
            notes: Arc::new(db.notes),
            tags: Arc::new(db.tags),
            note_tags: Arc::new(db.note_tags),
            tokens: Arc::new(tokens),
            access_token_duration,
            pool: Some(db.pool),
        }
    }

    /// State backed by one shared in-memory store.
    pub fn in_memory(
        store: MemoryStore,
        tokens: TokenMaker,
        access_token_duration: Duration,
    ) -> Self {
        Self {
            users: Arc::new(store.clone()),
            notes: Arc::new(store.clone()),
            tags: Arc::new(store.clone()),
            note_tags: Arc::new(store),
            tokens: Arc::new(tokens),
            access_token_duration,
            pool: None,
        }
    }

    /// Label for the active store, reported by the health check.
    pub fn store_kind(&self) -> &'static str {
        if self.pool.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }
}

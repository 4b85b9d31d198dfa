//! # notestack-db
//!
//! Storage layer for notestack.
//!
//! This crate provides:
//! - Connection pool management
//! - PostgreSQL implementations of the `notestack-core` repository traits
//! - Full-text note search with an `ILIKE` fallback
//! - [`MemoryStore`], an in-process implementation of the same traits
//!
//! ## Example
//!
//! ```rust,ignore
//! use notestack_db::{CreateNoteRequest, Database, NoteRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/notestack").await?;
//!
//!     let note = db.notes.insert(CreateNoteRequest {
//!         owner: "alice".to_string(),
//!         title: "Groceries".to_string(),
//!         content: "eggs, milk".to_string(),
//!     }).await?;
//!
//!     println!("Created note: {}", note.note_id);
//!     Ok(())
//! }
//! ```
pub mod memory;
pub mod note_tags;
pub mod notes;
pub mod pool;
pub mod tags;
pub mod users;

// Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use notestack_core::*;

pub use memory::MemoryStore;
pub use note_tags::PgNoteTagRepository;
pub use notes::PgNoteRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use tags::PgTagRepository;
pub use users::PgUserRepository;

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Map a unique-constraint violation to `Error::Duplicate`, anything else to
/// `Error::Database`.
pub(crate) fn map_unique_violation(
    e: sqlx::Error,
    message: impl FnOnce(Option<&str>) -> String,
) -> Error {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            Error::Duplicate(message(db_err.constraint()))
        }
        _ => Error::Database(e),
    }
}

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    pub users: PgUserRepository,
    pub notes: PgNoteRepository,
    pub tags: PgTagRepository,
    pub note_tags: PgNoteTagRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()),
            notes: PgNoteRepository::new(pool.clone()),
            tags: PgTagRepository::new(pool.clone()),
            note_tags: PgNoteTagRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect to the database with default pool settings.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Connect to the database with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run embedded migrations from the workspace `migrations/` directory.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}

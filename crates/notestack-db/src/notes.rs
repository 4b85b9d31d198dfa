//! Note repository implementation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;

use notestack_core::{
    CreateNoteRequest, Error, ListNotesRequest, Note, NoteRepository, Result, SearchNotesRequest,
    UpdateNoteRequest,
};

use crate::escape_like;

pub(crate) const NOTE_COLUMNS: &str =
    "n.note_id, n.owner, n.title, n.content, n.pinned, n.archived, n.created_at, n.updated_at";

pub(crate) fn note_from_row(row: &PgRow) -> Note {
    Note {
        note_id: row.get("note_id"),
        owner: row.get("owner"),
        title: row.get("title"),
        content: row.get("content"),
        pinned: row.get("pinned"),
        archived: row.get("archived"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// PostgreSQL implementation of NoteRepository.
#[derive(Clone)]
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

impl PgNoteRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn insert(&self, req: CreateNoteRequest) -> Result<Note> {
        let sql = format!(
            "INSERT INTO notes AS n (owner, title, content) VALUES ($1, $2, $3)
             RETURNING {NOTE_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(&req.owner)
            .bind(&req.title)
            .bind(&req.content)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(note_from_row(&row))
    }

    async fn fetch(&self, id: i64) -> Result<Option<Note>> {
        let sql = format!("SELECT {NOTE_COLUMNS} FROM notes n WHERE n.note_id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn list(&self, req: ListNotesRequest) -> Result<Vec<Note>> {
        let sql = format!(
            "SELECT {NOTE_COLUMNS} FROM notes n
             WHERE n.owner = $1 AND n.note_id > $2
             ORDER BY n.note_id
             LIMIT $3"
        );
        let rows = sqlx::query(&sql)
            .bind(&req.owner)
            .bind(req.after_id)
            .bind(req.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(rows.iter().map(note_from_row).collect())
    }

    async fn search(&self, req: SearchNotesRequest) -> Result<Vec<Note>> {
        let pattern = format!("%{}%", escape_like(&req.query));
        let sql = format!(
            "SELECT {NOTE_COLUMNS} FROM notes n
             WHERE n.owner = $1
               AND (
                    to_tsvector('english', coalesce(n.title, '') || ' ' || coalesce(n.content, ''))
                        @@ plainto_tsquery('english', $2)
                    OR n.title ILIKE $3
                    OR n.content ILIKE $3
               )
             ORDER BY n.note_id
             LIMIT $4 OFFSET $5"
        );
        let rows = sqlx::query(&sql)
            .bind(&req.owner)
            .bind(&req.query)
            .bind(&pattern)
            .bind(req.limit)
            .bind(req.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "notes",
            op = "search",
            result_count = rows.len(),
            "Note search complete"
        );
        Ok(rows.iter().map(note_from_row).collect())
    }

    async fn update(&self, req: UpdateNoteRequest) -> Result<Note> {
        let sql = format!(
            "UPDATE notes AS n
             SET title = $2,
                 content = $3,
                 pinned = COALESCE($4, n.pinned),
                 archived = COALESCE($5, n.archived),
                 updated_at = now()
             WHERE n.note_id = $1
             RETURNING {NOTE_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(req.note_id)
            .bind(&req.title)
            .bind(&req.content)
            .bind(req.pinned)
            .bind(req.archived)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        row.as_ref()
            .map(note_from_row)
            .ok_or_else(|| Error::NotFound(format!("note {} not found", req.note_id)))
    }

    async fn delete_with_links(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        sqlx::query("DELETE FROM note_tags WHERE note_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        let result = sqlx::query("DELETE FROM notes WHERE note_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls back the link delete.
            return Err(Error::NotFound(format!("note {} not found", id)));
        }

        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }
}

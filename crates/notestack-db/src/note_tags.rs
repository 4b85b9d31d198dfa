//! Note/tag association repository.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};

use notestack_core::{Error, Note, NoteTag, NoteTagRepository, Result, TagSummary};

use crate::map_unique_violation;
use crate::notes::{note_from_row, NOTE_COLUMNS};

/// PostgreSQL implementation of NoteTagRepository.
#[derive(Clone)]
pub struct PgNoteTagRepository {
    pool: Pool<Postgres>,
}

impl PgNoteTagRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteTagRepository for PgNoteTagRepository {
    async fn add(&self, note_id: i64, tag_id: i64) -> Result<NoteTag> {
        let row = sqlx::query(
            "INSERT INTO note_tags (note_id, tag_id) VALUES ($1, $2) RETURNING note_id, tag_id",
        )
        .bind(note_id)
        .bind(tag_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, |_| "tag already attached to note".to_string()))?;

        Ok(NoteTag {
            note_id: row.get("note_id"),
            tag_id: row.get("tag_id"),
        })
    }

    async fn remove(&self, note_id: i64, tag_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM note_tags WHERE note_id = $1 AND tag_id = $2")
            .bind(note_id)
            .bind(tag_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    async fn tags_for_note(&self, note_id: i64) -> Result<Vec<TagSummary>> {
        let rows = sqlx::query(
            "SELECT t.tag_id, t.name FROM tags t
             JOIN note_tags nt ON nt.tag_id = t.tag_id
             WHERE nt.note_id = $1
             ORDER BY t.tag_id",
        )
        .bind(note_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .iter()
            .map(|row| TagSummary {
                tag_id: row.get("tag_id"),
                name: row.get("name"),
            })
            .collect())
    }

    async fn notes_for_tag(&self, tag_id: i64, owner: &str) -> Result<Vec<Note>> {
        let sql = format!(
            "SELECT {NOTE_COLUMNS} FROM notes n
             JOIN note_tags nt ON nt.note_id = n.note_id
             JOIN tags t ON t.tag_id = nt.tag_id
             WHERE nt.tag_id = $1 AND t.owner = $2 AND n.owner = $2
             ORDER BY n.note_id"
        );
        let rows = sqlx::query(&sql)
            .bind(tag_id)
            .bind(owner)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(rows.iter().map(note_from_row).collect())
    }
}

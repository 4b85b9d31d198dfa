//! Tag repository implementation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};

use notestack_core::{CreateTagRequest, Error, ListTagsRequest, Result, Tag, TagRepository};

use crate::map_unique_violation;

fn tag_from_row(row: &PgRow) -> Tag {
    Tag {
        tag_id: row.get("tag_id"),
        owner: row.get("owner"),
        name: row.get("name"),
    }
}

/// PostgreSQL implementation of TagRepository.
#[derive(Clone)]
pub struct PgTagRepository {
    pool: Pool<Postgres>,
}

impl PgTagRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagRepository for PgTagRepository {
    async fn insert(&self, req: CreateTagRequest) -> Result<Tag> {
        let row = sqlx::query(
            "INSERT INTO tags (owner, name) VALUES ($1, $2) RETURNING tag_id, owner, name",
        )
        .bind(&req.owner)
        .bind(&req.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, |_| format!("tag '{}' already exists", req.name)))?;

        Ok(tag_from_row(&row))
    }

    async fn fetch(&self, id: i64) -> Result<Option<Tag>> {
        let row = sqlx::query("SELECT tag_id, owner, name FROM tags WHERE tag_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(row.as_ref().map(tag_from_row))
    }

    async fn list(&self, req: ListTagsRequest) -> Result<Vec<Tag>> {
        let rows = sqlx::query(
            "SELECT tag_id, owner, name FROM tags
             WHERE owner = $1 AND tag_id > $2
             ORDER BY tag_id
             LIMIT $3",
        )
        .bind(&req.owner)
        .bind(req.after_id)
        .bind(req.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(tag_from_row).collect())
    }

    async fn delete_with_links(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        sqlx::query("DELETE FROM note_tags WHERE tag_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        let result = sqlx::query("DELETE FROM tags WHERE tag_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("tag {} not found", id)));
        }

        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }
}

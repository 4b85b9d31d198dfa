//! User repository implementation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};

use notestack_core::{CreateUserRequest, Error, Result, User, UserRepository};

use crate::map_unique_violation;

const USER_COLUMNS: &str = "username, hashed_password, email, password_changed_at, created_at";

fn user_from_row(row: &PgRow) -> User {
    User {
        username: row.get("username"),
        hashed_password: row.get("hashed_password"),
        email: row.get("email"),
        password_changed_at: row.get("password_changed_at"),
        created_at: row.get("created_at"),
    }
}

/// PostgreSQL implementation of UserRepository.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, req: CreateUserRequest) -> Result<User> {
        let sql = format!(
            "INSERT INTO users (username, hashed_password, email) VALUES ($1, $2, $3)
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(&req.username)
            .bind(&req.hashed_password)
            .bind(&req.email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                map_unique_violation(e, |constraint| match constraint {
                    Some("users_email_key") => "email already registered".to_string(),
                    _ => "username already taken".to_string(),
                })
            })?;

        Ok(user_from_row(&row))
    }

    async fn fetch(&self, username: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(row.as_ref().map(user_from_row))
    }
}

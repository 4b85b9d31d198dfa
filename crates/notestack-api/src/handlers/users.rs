//! Signup and login.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use notestack_core::{CreateUserRequest, User};
use notestack_crypto::{check_password, hash_password, CryptoError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::required_text;
use crate::error::ApiError;
use crate::state::AppState;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_CHARS: usize = 8;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Signup body. Capitalised keys are accepted for older clients.
#[derive(Debug, Deserialize)]
pub struct CreateUserBody {
    #[serde(alias = "Username")]
    pub username: Option<String>,
    #[serde(alias = "Password")]
    pub password: Option<String>,
    #[serde(alias = "Email")]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    #[serde(alias = "Username")]
    pub username: Option<String>,
    #[serde(alias = "Password")]
    pub password: Option<String>,
}

/// Public view of a user; never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub access_token_expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

fn validate_username(username: Option<String>) -> Result<String, ApiError> {
    let username = required_text(username, "username")?;
    if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ApiError::BadRequest(
            "username must contain only letters and digits".to_string(),
        ));
    }
    Ok(username)
}

fn validate_password(password: Option<String>) -> Result<String, ApiError> {
    let password = password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::BadRequest("password is required".to_string()))?;
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ApiError::BadRequest(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_CHARS
        )));
    }
    Ok(password)
}

fn validate_email(email: Option<String>) -> Result<String, ApiError> {
    let email = required_text(email, "email")?;
    if !EMAIL_RE.is_match(&email) {
        return Err(ApiError::BadRequest("email is not valid".to_string()));
    }
    Ok(email)
}

fn crypto_failure(err: CryptoError) -> ApiError {
    ApiError::Internal(err.to_string())
}

// Argon2 is CPU bound; keep it off the async workers.
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, CryptoError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("password task failed: {}", e)))?
        .map_err(crypto_failure)
}

pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<CreateUserBody>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Json(body) = body?;
    let username = validate_username(body.username)?;
    let password = validate_password(body.password)?;
    let email = validate_email(body.email)?;

    let hashed_password = run_blocking(move || hash_password(&password)).await?;

    let user = state
        .users
        .insert(CreateUserRequest {
            username,
            hashed_password,
            email,
        })
        .await?;

    info!(
        subsystem = "api",
        component = "users",
        op = "signup",
        username = %user.username,
        "User created"
    );
    Ok(Json(user.into()))
}

pub async fn login_user(
    State(state): State<AppState>,
    body: Result<Json<LoginBody>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(body) = body?;
    let username = validate_username(body.username)?;
    let password = validate_password(body.password)?;

    let user = state
        .users
        .fetch(&username)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

    let hashed = user.hashed_password.clone();
    let matches = run_blocking(move || check_password(&password, &hashed)).await?;
    if !matches {
        debug!(
            subsystem = "auth",
            component = "login",
            username = %username,
            "Password mismatch"
        );
        return Err(ApiError::Unauthorized("incorrect password".to_string()));
    }

    let (access_token, payload) = state
        .tokens
        .issue(&user.username, state.access_token_duration)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    info!(
        subsystem = "auth",
        component = "login",
        username = %user.username,
        "User logged in"
    );
    Ok(Json(LoginResponse {
        access_token,
        access_token_expires_at: payload.expired_at,
        user: user.into(),
    }))
}

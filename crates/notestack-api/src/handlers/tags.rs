//! Tag lifecycle handlers.

use std::ops::RangeInclusive;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use notestack_core::{CreateTagRequest, ListTagsRequest, Tag};
use serde::Deserialize;
use tracing::info;

use super::{cursor, page_size, positive_id, required_text, MessageResponse};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::ownership::OwnershipGuard;
use crate::state::AppState;

/// Allowed `page_size` for tag listing.
pub const TAG_PAGE_SIZES: RangeInclusive<i64> = 5..=20;

/// Longest accepted tag name, in characters.
pub const MAX_TAG_NAME_CHARS: usize = 64;

#[derive(Debug, Deserialize)]
pub struct CreateTagBody {
    pub name: Option<String>,
}

/// Query for `GET /tags`; `tag_id` is the keyset cursor.
#[derive(Debug, Deserialize)]
pub struct ListTagsQuery {
    pub tag_id: Option<i64>,
    pub page_size: Option<i64>,
}

fn validate_tag_name(name: Option<String>) -> Result<String, ApiError> {
    let name = required_text(name, "name")?.trim().to_string();
    if name.chars().count() > MAX_TAG_NAME_CHARS {
        return Err(ApiError::BadRequest(format!(
            "name must be at most {} characters",
            MAX_TAG_NAME_CHARS
        )));
    }
    Ok(name)
}

pub async fn create_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Result<Json<CreateTagBody>, JsonRejection>,
) -> Result<Json<Tag>, ApiError> {
    let Json(body) = body?;
    let name = validate_tag_name(body.name)?;

    let tag = state
        .tags
        .insert(CreateTagRequest {
            owner: auth.username().to_string(),
            name,
        })
        .await?;

    info!(
        subsystem = "api",
        component = "tags",
        op = "create",
        username = auth.username(),
        tag_id = tag.tag_id,
        "Tag created"
    );
    Ok(Json(tag))
}

pub async fn get_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Tag>, ApiError> {
    let Path(id) = id?;
    let id = positive_id(id, "id")?;

    let tag = OwnershipGuard::new(&state, auth.username()).tag(id).await?;
    Ok(Json(tag))
}

pub async fn list_tags(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<ListTagsQuery>, QueryRejection>,
) -> Result<Json<Vec<Tag>>, ApiError> {
    let Query(query) = query?;
    let limit = page_size(query.page_size, TAG_PAGE_SIZES)?;
    let after_id = cursor(query.tag_id, "tag_id")?;

    let tags = state
        .tags
        .list(ListTagsRequest {
            owner: auth.username().to_string(),
            after_id,
            limit,
        })
        .await?;
    Ok(Json(tags))
}

pub async fn delete_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = id?;
    let id = positive_id(id, "id")?;

    OwnershipGuard::new(&state, auth.username()).tag(id).await?;
    state.tags.delete_with_links(id).await?;

    info!(
        subsystem = "api",
        component = "tags",
        op = "delete",
        username = auth.username(),
        tag_id = id,
        "Tag deleted"
    );
    Ok(MessageResponse::new("tag deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_name_trimmed() {
        assert_eq!(validate_tag_name(Some("  work ".into())).unwrap(), "work");
    }

    #[test]
    fn test_tag_name_length_counts_chars() {
        let max = "é".repeat(MAX_TAG_NAME_CHARS);
        assert!(validate_tag_name(Some(max.clone())).is_ok());
        assert!(validate_tag_name(Some(format!("{max}x"))).is_err());
    }

    #[test]
    fn test_tag_name_required() {
        assert!(validate_tag_name(None).is_err());
        assert!(validate_tag_name(Some("   ".into())).is_err());
    }
}

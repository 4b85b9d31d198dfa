//! Core data models for notestack.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// USER TYPES
// =============================================================================

/// A registered account.
///
/// `username` is the identity key carried in access tokens and stored as the
/// owner of every note and tag. Not `Serialize`: the password hash must never
/// reach a response body.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub username: String,
    /// PHC-format Argon2id hash.
    pub hashed_password: String,
    pub email: String,
    pub password_changed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Request for creating a user. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub hashed_password: String,
    pub email: String,
}

// =============================================================================
// NOTE TYPES
// =============================================================================

/// A note owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub note_id: i64,
    pub owner: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub pinned: bool,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request for creating a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateNoteRequest {
    pub owner: String,
    pub title: String,
    pub content: String,
}

/// Request for updating a note's text and, optionally, its flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateNoteRequest {
    pub note_id: i64,
    pub title: String,
    pub content: String,
    /// `None` leaves the stored flag unchanged.
    pub pinned: Option<bool>,
    /// `None` leaves the stored flag unchanged.
    pub archived: Option<bool>,
}

// =============================================================================
// TAG TYPES
// =============================================================================

/// A tag owned by exactly one user. `(owner, name)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub tag_id: i64,
    pub owner: String,
    pub name: String,
}

/// Tag id and name as attached to a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSummary {
    pub tag_id: i64,
    pub name: String,
}

impl From<Tag> for TagSummary {
    fn from(tag: Tag) -> Self {
        Self {
            tag_id: tag.tag_id,
            name: tag.name,
        }
    }
}

/// Request for creating a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTagRequest {
    pub owner: String,
    pub name: String,
}

// =============================================================================
// NOTE-TAG ASSOCIATION
// =============================================================================

/// Many-to-many link between a note and a tag of the same owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteTag {
    pub note_id: i64,
    pub tag_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_note() -> Note {
        let now = Utc::now();
        Note {
            note_id: 1,
            owner: "alice".to_string(),
            title: Some("groceries".to_string()),
            content: None,
            pinned: false,
            archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_note_serializes_absent_content_as_null() {
        let json = serde_json::to_value(sample_note()).unwrap();
        assert_eq!(json["title"], "groceries");
        assert!(json["content"].is_null());
        assert_eq!(json["owner"], "alice");
    }

    #[test]
    fn test_tag_summary_from_tag() {
        let tag = Tag {
            tag_id: 3,
            owner: "alice".to_string(),
            name: "work".to_string(),
        };
        let summary = TagSummary::from(tag);
        assert_eq!(summary.tag_id, 3);
        assert_eq!(summary.name, "work");
    }

    #[test]
    fn test_note_tag_json_shape() {
        let link = NoteTag {
            note_id: 4,
            tag_id: 9,
        };
        let json = serde_json::to_string(&link).unwrap();
        assert_eq!(json, r#"{"note_id":4,"tag_id":9}"#);
    }
}

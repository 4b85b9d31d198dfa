//! PostgreSQL repository tests.
//!
//! These need a running database (see `DEFAULT_TEST_DATABASE_URL`) with the
//! schema applied, so they are ignored by default:
//!
//! ```text
//! cargo test -p notestack-db -- --ignored
//! ```

use notestack_db::test_fixtures::{connect_test_database, create_test_user};
use notestack_db::{
    CreateNoteRequest, CreateTagRequest, CreateUserRequest, Database, Error, ListNotesRequest,
    ListTagsRequest, Note, NoteRepository, NoteTagRepository, SearchNotesRequest, TagRepository,
    UpdateNoteRequest, UserRepository,
};

async fn setup() -> Database {
    let _ = dotenvy::dotenv();
    connect_test_database()
        .await
        .expect("Failed to connect to test database")
}

async fn create_note(db: &Database, owner: &str, title: &str, content: &str) -> Note {
    db.notes
        .insert(CreateNoteRequest {
            owner: owner.to_string(),
            title: title.to_string(),
            content: content.to_string(),
        })
        .await
        .expect("Failed to insert note")
}

#[tokio::test]
#[ignore]
async fn test_user_uniqueness_maps_to_duplicate() {
    let db = setup().await;
    let user = create_test_user(&db, "dup").await.unwrap();

    let err = db
        .users
        .insert(CreateUserRequest {
            username: user.username.clone(),
            hashed_password: "h".to_string(),
            email: format!("other-{}@example.com", user.username),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Duplicate(msg) if msg.contains("username")));

    let err = db
        .users
        .insert(CreateUserRequest {
            username: format!("{}x", user.username),
            hashed_password: "h".to_string(),
            email: user.email.clone(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Duplicate(msg) if msg.contains("email")));

    let fetched = db.users.fetch(&user.username).await.unwrap().unwrap();
    assert_eq!(fetched.email, user.email);
}

#[tokio::test]
#[ignore]
async fn test_keyset_pagination_returns_first_page() {
    let db = setup().await;
    let user = create_test_user(&db, "page").await.unwrap();

    let mut ids = Vec::new();
    for i in 0..10 {
        ids.push(create_note(&db, &user.username, &format!("note {i}"), "body").await.note_id);
    }

    let page = db
        .notes
        .list(ListNotesRequest {
            owner: user.username.clone(),
            after_id: ids[0] - 1,
            limit: 5,
        })
        .await
        .unwrap();

    let got: Vec<i64> = page.iter().map(|n| n.note_id).collect();
    assert_eq!(got, ids[..5].to_vec());
}

#[tokio::test]
#[ignore]
async fn test_search_uses_fulltext_and_substring() {
    let db = setup().await;
    let user = create_test_user(&db, "search").await.unwrap();
    let other = create_test_user(&db, "search").await.unwrap();

    let groceries = create_note(&db, &user.username, "Groceries", "buying apples").await;
    create_note(&db, &user.username, "Ideas", "nothing relevant").await;
    create_note(&db, &other.username, "Groceries", "apples too").await;

    let search = |query: &str| SearchNotesRequest {
        owner: user.username.clone(),
        query: query.to_string(),
        limit: 10,
        offset: 0,
    };

    // Stemmed full-text match.
    let hits = db.notes.search(search("apple")).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].note_id, groceries.note_id);

    // Substring fallback.
    let hits = db.notes.search(search("rocer")).await.unwrap();
    assert_eq!(hits.len(), 1);

    // Wildcards in input are literal.
    let hits = db.notes.search(search("%")).await.unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_update_refreshes_timestamp_and_keeps_flags() {
    let db = setup().await;
    let user = create_test_user(&db, "upd").await.unwrap();
    let note = create_note(&db, &user.username, "t", "c").await;

    let updated = db
        .notes
        .update(UpdateNoteRequest {
            note_id: note.note_id,
            title: "t2".to_string(),
            content: "c2".to_string(),
            pinned: Some(true),
            archived: None,
        })
        .await
        .unwrap();

    assert_eq!(updated.title.as_deref(), Some("t2"));
    assert!(updated.pinned);
    assert!(!updated.archived);
    assert!(updated.updated_at >= note.updated_at);

    let err = db
        .notes
        .update(UpdateNoteRequest {
            note_id: i64::MAX,
            title: "t".to_string(),
            content: "c".to_string(),
            pinned: None,
            archived: None,
        })
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
#[ignore]
async fn test_delete_note_removes_links_in_transaction() {
    let db = setup().await;
    let user = create_test_user(&db, "del").await.unwrap();
    let note = create_note(&db, &user.username, "t", "c").await;

    for name in ["a", "b"] {
        let tag = db
            .tags
            .insert(CreateTagRequest {
                owner: user.username.clone(),
                name: name.to_string(),
            })
            .await
            .unwrap();
        db.note_tags.add(note.note_id, tag.tag_id).await.unwrap();
    }
    assert_eq!(db.note_tags.tags_for_note(note.note_id).await.unwrap().len(), 2);

    db.notes.delete_with_links(note.note_id).await.unwrap();

    assert!(db.notes.fetch(note.note_id).await.unwrap().is_none());
    assert!(db.note_tags.tags_for_note(note.note_id).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_tags_unique_per_owner_and_paginated() {
    let db = setup().await;
    let user = create_test_user(&db, "tags").await.unwrap();

    let mut ids = Vec::new();
    for i in 0..7 {
        let tag = db
            .tags
            .insert(CreateTagRequest {
                owner: user.username.clone(),
                name: format!("tag-{i}"),
            })
            .await
            .unwrap();
        ids.push(tag.tag_id);
    }

    let err = db
        .tags
        .insert(CreateTagRequest {
            owner: user.username.clone(),
            name: "tag-0".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Duplicate(_)));

    let page = db
        .tags
        .list(ListTagsRequest {
            owner: user.username.clone(),
            after_id: ids[1],
            limit: 5,
        })
        .await
        .unwrap();
    let got: Vec<i64> = page.iter().map(|t| t.tag_id).collect();
    assert_eq!(got, ids[2..7].to_vec());
}

#[tokio::test]
#[ignore]
async fn test_duplicate_link_and_idempotent_remove() {
    let db = setup().await;
    let user = create_test_user(&db, "link").await.unwrap();
    let note = create_note(&db, &user.username, "t", "c").await;
    let tag = db
        .tags
        .insert(CreateTagRequest {
            owner: user.username.clone(),
            name: "work".to_string(),
        })
        .await
        .unwrap();

    db.note_tags.add(note.note_id, tag.tag_id).await.unwrap();
    let err = db.note_tags.add(note.note_id, tag.tag_id).await.unwrap_err();
    assert!(matches!(err, Error::Duplicate(_)));

    let notes = db
        .note_tags
        .notes_for_tag(tag.tag_id, &user.username)
        .await
        .unwrap();
    assert_eq!(notes.len(), 1);

    db.note_tags.remove(note.note_id, tag.tag_id).await.unwrap();
    db.note_tags.remove(note.note_id, tag.tag_id).await.unwrap();

    db.tags.delete_with_links(tag.tag_id).await.unwrap();
    assert!(db.tags.fetch(tag.tag_id).await.unwrap().is_none());
}

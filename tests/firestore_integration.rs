// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running; set
//! FIRESTORE_EMULATOR_HOST to point at it.
//!
//! The emulator provides a clean state for each test run.

use letter_drive::error::AppError;
use letter_drive::models::{Letter, UserRole};
use letter_drive::services::{DriveClient, GoogleAuthClient, GoogleAuthService, GoogleProfile, LetterService};

mod common;
use common::{test_db, test_user};

/// Generate a unique Google account ID for test isolation.
fn unique_google_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    format!(
        "g-{}",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    )
}

fn test_profile(google_id: &str) -> GoogleProfile {
    GoogleProfile {
        id: google_id.to_string(),
        email: "ada@example.com".to_string(),
        name: "Ada Lovelace".to_string(),
        picture: Some("https://example.com/ada.png".to_string()),
    }
}

fn test_letter(id: &str, user_id: &str) -> Letter {
    Letter {
        id: id.to_string(),
        title: "Dear future me".to_string(),
        content: "<p>Hello</p>".to_string(),
        user_id: user_id.to_string(),
        google_drive_id: None,
        is_published: false,
        created_at: chrono::Utc::now().to_rfc3339(),
        updated_at: chrono::Utc::now().to_rfc3339(),
    }
}

fn auth_service(db: letter_drive::db::FirestoreDb) -> GoogleAuthService {
    let client = GoogleAuthClient::new(
        "test_client_id".to_string(),
        "test_secret".to_string(),
        "http://localhost:8080/api/auth/google/callback".to_string(),
    );
    GoogleAuthService::new(client, db)
}

// ═══════════════════════════════════════════════════════════════════════════
// USER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_new_user_creation() {
    require_emulator!();

    let db = test_db().await;
    let google_id = unique_google_id();

    // Initially, user should not exist
    let before = db.get_user(&google_id).await.unwrap();
    assert!(before.is_none(), "User should not exist before creation");

    let mut user = test_user(&google_id, UserRole::User);
    user.avatar = Some("https://example.com/pic.jpg".to_string());
    db.upsert_user(&user).await.unwrap();

    let fetched = db
        .get_user(&google_id)
        .await
        .unwrap()
        .expect("User should exist after creation");
    assert_eq!(fetched.google_id, google_id);
    assert_eq!(fetched.email, "test@example.com");
    assert_eq!(fetched.name, "Test User");
    assert_eq!(fetched.role, UserRole::User);
    assert_eq!(
        fetched.avatar,
        Some("https://example.com/pic.jpg".to_string())
    );
}

#[tokio::test]
async fn test_first_login_creates_account_with_defaults() {
    require_emulator!();

    let db = test_db().await;
    let google_id = unique_google_id();
    let service = auth_service(db.clone());

    let user = service
        .resolve_or_create(&test_profile(&google_id), "access-1", Some("refresh-1"))
        .await
        .unwrap();

    assert_eq!(user.google_id, google_id);
    assert_eq!(user.email, "ada@example.com");
    assert_eq!(user.role, UserRole::User);
    assert_eq!(user.google_access_token.as_deref(), Some("access-1"));
    assert_eq!(user.google_refresh_token.as_deref(), Some("refresh-1"));

    let stored = db.get_user(&google_id).await.unwrap().unwrap();
    assert_eq!(stored.google_access_token.as_deref(), Some("access-1"));
}

#[tokio::test]
async fn test_repeat_login_updates_tokens_without_duplicating() {
    require_emulator!();

    let db = test_db().await;
    let google_id = unique_google_id();
    let service = auth_service(db.clone());

    let first = service
        .resolve_or_create(&test_profile(&google_id), "access-1", Some("refresh-1"))
        .await
        .unwrap();

    // Second login without a consent screen: Google sends no refresh token
    let second = service
        .resolve_or_create(&test_profile(&google_id), "access-2", None)
        .await
        .unwrap();

    // Access token overwritten, refresh token preserved, account identity stable
    assert_eq!(second.google_access_token.as_deref(), Some("access-2"));
    assert_eq!(second.google_refresh_token.as_deref(), Some("refresh-1"));
    assert_eq!(second.created_at, first.created_at);

    // Third login through consent: new refresh token replaces the old one
    let third = service
        .resolve_or_create(&test_profile(&google_id), "access-3", Some("refresh-2"))
        .await
        .unwrap();
    assert_eq!(third.google_refresh_token.as_deref(), Some("refresh-2"));

    let stored = db.get_user(&google_id).await.unwrap().unwrap();
    assert_eq!(stored.google_access_token.as_deref(), Some("access-3"));
    assert_eq!(stored.google_refresh_token.as_deref(), Some("refresh-2"));
}

#[tokio::test]
async fn test_role_change_persists() {
    require_emulator!();

    let db = test_db().await;
    let google_id = unique_google_id();

    let mut user = test_user(&google_id, UserRole::User);
    db.upsert_user(&user).await.unwrap();

    user.role = UserRole::Admin;
    db.upsert_user(&user).await.unwrap();

    let fetched = db.get_user(&google_id).await.unwrap().unwrap();
    assert_eq!(fetched.role, UserRole::Admin);
    assert!(fetched.role.is_admin());
}

// ═══════════════════════════════════════════════════════════════════════════
// LETTER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_letter_crud_roundtrip() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_google_id();
    let letter_id = format!("l-{}", unique_google_id());

    assert!(db.get_letter(&letter_id).await.unwrap().is_none());

    let mut letter = test_letter(&letter_id, &user_id);
    db.set_letter(&letter).await.unwrap();

    let fetched = db.get_letter(&letter_id).await.unwrap().unwrap();
    assert_eq!(fetched.title, "Dear future me");
    assert_eq!(fetched.user_id, user_id);
    assert!(fetched.google_drive_id.is_none());

    // Update in place
    letter.title = "Updated title".to_string();
    letter.google_drive_id = Some("drive-doc-1".to_string());
    db.set_letter(&letter).await.unwrap();

    let updated = db.get_letter(&letter_id).await.unwrap().unwrap();
    assert_eq!(updated.title, "Updated title");
    assert_eq!(updated.google_drive_id.as_deref(), Some("drive-doc-1"));

    db.delete_letter(&letter_id).await.unwrap();
    assert!(db.get_letter(&letter_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_letters_scoped_by_owner() {
    require_emulator!();

    let db = test_db().await;
    let owner_a = unique_google_id();
    let owner_b = unique_google_id();

    db.set_letter(&test_letter(&format!("a1-{}", owner_a), &owner_a))
        .await
        .unwrap();
    db.set_letter(&test_letter(&format!("a2-{}", owner_a), &owner_a))
        .await
        .unwrap();
    db.set_letter(&test_letter(&format!("b1-{}", owner_b), &owner_b))
        .await
        .unwrap();

    let letters_a = db.get_letters_for_user(&owner_a).await.unwrap();
    assert_eq!(letters_a.len(), 2);
    assert!(letters_a.iter().all(|l| l.user_id == owner_a));

    let letters_b = db.get_letters_for_user(&owner_b).await.unwrap();
    assert_eq!(letters_b.len(), 1);
    assert_eq!(letters_b[0].user_id, owner_b);
}

#[tokio::test]
async fn test_letters_listed_most_recent_first() {
    require_emulator!();

    let db = test_db().await;
    let owner = unique_google_id();

    let mut older = test_letter(&format!("old-{}", owner), &owner);
    older.updated_at = "2026-01-01T00:00:00+00:00".to_string();
    db.set_letter(&older).await.unwrap();

    let mut newer = test_letter(&format!("new-{}", owner), &owner);
    newer.updated_at = "2026-06-01T00:00:00+00:00".to_string();
    db.set_letter(&newer).await.unwrap();

    let letters = db.get_letters_for_user(&owner).await.unwrap();
    assert_eq!(letters.len(), 2);
    assert_eq!(letters[0].id, newer.id);
    assert_eq!(letters[1].id, older.id);
}

// ═══════════════════════════════════════════════════════════════════════════
// LETTER SERVICE OWNERSHIP TESTS
// ═══════════════════════════════════════════════════════════════════════════

fn letter_service(db: letter_drive::db::FirestoreDb) -> LetterService {
    let google = GoogleAuthClient::new(
        "test_client_id".to_string(),
        "test_secret".to_string(),
        "http://localhost:8080/api/auth/google/callback".to_string(),
    );
    LetterService::new(db, google, DriveClient::new())
}

#[tokio::test]
async fn test_letter_access_denied_for_non_owner() {
    require_emulator!();

    let db = test_db().await;
    let owner = unique_google_id();
    let intruder = unique_google_id();
    let service = letter_service(db.clone());

    let saved = service
        .create_letter(&owner, "Mine".to_string(), "Private".to_string(), false)
        .await
        .unwrap();

    let err = service
        .get_letter(&intruder, &saved.letter.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = service
        .delete_letter(&intruder, &saved.letter.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    // The owner still can
    let letter = service.get_letter(&owner, &saved.letter.id).await.unwrap();
    assert_eq!(letter.content, "Private");
}

#[tokio::test]
async fn test_missing_letter_is_not_found() {
    require_emulator!();

    let db = test_db().await;
    let service = letter_service(db.clone());

    let err = service
        .get_letter(&unique_google_id(), "no-such-letter")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_removes_only_the_local_record() {
    require_emulator!();

    let db = test_db().await;
    let owner = unique_google_id();
    let service = letter_service(db.clone());

    let saved = service
        .create_letter(&owner, "Bye".to_string(), "Gone soon".to_string(), false)
        .await
        .unwrap();

    service.delete_letter(&owner, &saved.letter.id).await.unwrap();
    assert!(db.get_letter(&saved.letter.id).await.unwrap().is_none());

    let remaining = service.list_letters(&owner).await.unwrap();
    assert!(remaining.iter().all(|l| l.id != saved.letter.id));
}

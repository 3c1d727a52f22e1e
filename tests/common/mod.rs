// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use letter_drive::config::Config;
use letter_drive::db::FirestoreDb;
use letter_drive::models::{User, UserRole};
use letter_drive::routes::create_router;
use letter_drive::services::{DriveClient, GoogleAuthClient, GoogleAuthService, LetterService};
use letter_drive::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Build a user record for tests.
#[allow(dead_code)]
pub fn test_user(google_id: &str, role: UserRole) -> User {
    User {
        google_id: google_id.to_string(),
        email: "test@example.com".to_string(),
        name: "Test User".to_string(),
        avatar: None,
        role,
        google_access_token: None,
        google_refresh_token: None,
        created_at: chrono::Utc::now().to_rfc3339(),
        updated_at: chrono::Utc::now().to_rfc3339(),
    }
}

/// Create a signed session token the auth middleware will accept.
#[allow(dead_code)]
pub fn create_test_jwt(google_id: &str, role: UserRole, signing_key: &[u8]) -> String {
    let user = test_user(google_id, role);
    letter_drive::middleware::auth::create_jwt(&user, signing_key).expect("Failed to create JWT")
}

/// Create a correctly signed session token whose expiry is already past.
#[allow(dead_code)]
pub fn create_expired_jwt(google_id: &str, role: UserRole, signing_key: &[u8]) -> String {
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use letter_drive::middleware::auth::Claims;

    // An hour past expiry, well beyond the validator's clock leeway
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: google_id.to_string(),
        email: "test@example.com".to_string(),
        name: "Test User".to_string(),
        role,
        iat: now - 7200,
        exp: now - 3600,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )
    .expect("Failed to encode expired JWT")
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();

    let google_client = GoogleAuthClient::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
        config.google_callback_url.clone(),
    );
    let auth_service = GoogleAuthService::new(google_client.clone(), db.clone());
    let letter_service = LetterService::new(db.clone(), google_client, DriveClient::new());

    let state = Arc::new(AppState {
        config,
        db,
        auth_service,
        letter_service,
    });

    (create_router(state.clone()), state)
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Letter Drive API Server
//!
//! Stores personal letters behind Google OAuth sign-in and mirrors them
//! into the owner's Google Drive on request.

use letter_drive::{
    config::Config,
    db::FirestoreDb,
    services::{DriveClient, GoogleAuthClient, GoogleAuthService, LetterService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Letter Drive API");
    tracing::info!(origin = %config.frontend_url, "CORS enabled for frontend origin");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // One OAuth client serves both login and Drive token refresh
    let google_client = GoogleAuthClient::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
        config.google_callback_url.clone(),
    );

    let auth_service = GoogleAuthService::new(google_client.clone(), db.clone());
    let letter_service = LetterService::new(db.clone(), google_client, DriveClient::new());

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        auth_service,
        letter_service,
    });

    // Build router
    let app = letter_drive::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("letter_drive=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Letter CRUD routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::Letter;
use crate::services::SavedLetter;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Letter routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/letters", get(list_letters).post(create_letter))
        .route(
            "/api/letters/{id}",
            get(get_letter).put(update_letter).delete(delete_letter),
        )
}

/// Request body for creating or updating a letter.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LetterPayload {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    /// When set, mirror the letter into the owner's Google Drive.
    #[serde(default)]
    pub save_to_google_drive: bool,
}

impl LetterPayload {
    fn validated(self) -> Result<Self> {
        self.validate()
            .map_err(|e| AppError::InvalidOperation(e.to_string()))?;
        Ok(self)
    }
}

/// A letter plus an optional warning when a requested Drive mirror failed.
#[derive(Serialize)]
pub struct LetterResponse {
    #[serde(flatten)]
    pub letter: Letter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<SavedLetter> for LetterResponse {
    fn from(saved: SavedLetter) -> Self {
        Self {
            letter: saved.letter,
            warning: saved.warning.map(|w| w.to_string()),
        }
    }
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// List the caller's letters, most recently updated first.
async fn list_letters(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Letter>>> {
    let letters = state.letter_service.list_letters(&user.user_id).await?;
    Ok(Json(letters))
}

/// Create a letter. The local write decides the outcome; a failed Drive
/// mirror only adds a warning.
async fn create_letter(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<LetterPayload>,
) -> Result<(StatusCode, Json<LetterResponse>)> {
    let payload = payload.validated()?;

    let saved = state
        .letter_service
        .create_letter(
            &user.user_id,
            payload.title,
            payload.content,
            payload.save_to_google_drive,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(saved.into())))
}

/// Get one letter; owners only.
async fn get_letter(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Letter>> {
    let letter = state.letter_service.get_letter(&user.user_id, &id).await?;
    Ok(Json(letter))
}

/// Update one letter; owners only.
async fn update_letter(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<LetterPayload>,
) -> Result<Json<LetterResponse>> {
    let payload = payload.validated()?;

    let saved = state
        .letter_service
        .update_letter(
            &user.user_id,
            &id,
            payload.title,
            payload.content,
            payload.save_to_google_drive,
        )
        .await?;

    Ok(Json(saved.into()))
}

/// Delete one letter locally; owners only. A Drive mirror copy stays put.
async fn delete_letter(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state
        .letter_service
        .delete_letter(&user.user_id, &id)
        .await?;

    Ok(Json(MessageResponse {
        message: "Letter deleted successfully".to_string(),
    }))
}

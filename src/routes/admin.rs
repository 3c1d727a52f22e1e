// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin-only routes: user listing, role changes, and letter moderation.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Letter, UserProfile, UserRole};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, put},
    Extension, Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

/// Admin routes. The admin-role gate is applied in routes/mod.rs, so
/// every handler here can assume the caller's token carried `role: admin`.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/{id}/promote", put(promote_user))
        .route("/api/admin/users/{id}/demote", put(demote_user))
        .route("/api/admin/letters", get(list_letters))
        .route(
            "/api/admin/letters/{id}",
            get(get_letter).delete(delete_letter),
        )
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Role-change confirmation; tokens never appear here.
#[derive(Serialize)]
pub struct RoleChangeResponse {
    pub message: String,
    pub user: UserProfile,
}

#[derive(Serialize)]
pub struct LetterOwner {
    pub name: String,
    pub email: String,
}

/// Letter with its owner's display info joined in for the moderation view.
#[derive(Serialize)]
pub struct AdminLetterResponse {
    #[serde(flatten)]
    pub letter: Letter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<LetterOwner>,
}

/// All user accounts, newest first, with OAuth tokens redacted.
async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<UserProfile>>> {
    let users = state.db.list_users().await?;
    Ok(Json(users.into_iter().map(UserProfile::from).collect()))
}

/// All letters across all users, newest first.
async fn list_letters(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Letter>>> {
    let letters = state.db.list_letters().await?;
    Ok(Json(letters))
}

/// One letter, any owner, with the owner's name and email joined in.
async fn get_letter(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AdminLetterResponse>> {
    let letter = state
        .db
        .get_letter(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Letter not found".to_string()))?;

    let owner = state
        .db
        .get_user(&letter.user_id)
        .await?
        .map(|user| LetterOwner {
            name: user.name,
            email: user.email,
        });

    Ok(Json(AdminLetterResponse { letter, owner }))
}

/// Delete any letter locally. A Drive mirror copy stays put.
async fn delete_letter(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state
        .db
        .get_letter(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Letter not found".to_string()))?;

    state.db.delete_letter(&id).await?;

    Ok(Json(MessageResponse {
        message: "Letter deleted successfully".to_string(),
    }))
}

async fn promote_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RoleChangeResponse>> {
    let mut user = state
        .db
        .get_user(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    user.role = UserRole::Admin;
    user.updated_at = Utc::now().to_rfc3339();
    state.db.upsert_user(&user).await?;

    tracing::info!(user_id = %id, "user promoted to admin");

    Ok(Json(RoleChangeResponse {
        message: "User promoted to admin successfully".to_string(),
        user: user.into(),
    }))
}

/// Demote an admin back to a regular user. Admins cannot demote
/// themselves; that check runs before any store access so the lockout
/// guard holds even when the store is down.
async fn demote_user(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<RoleChangeResponse>> {
    if caller.user_id == id {
        return Err(AppError::InvalidOperation(
            "Cannot demote yourself".to_string(),
        ));
    }

    let mut user = state
        .db
        .get_user(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    user.role = UserRole::User;
    user.updated_at = Utc::now().to_rfc3339();
    state.db.upsert_user(&user).await?;

    tracing::info!(user_id = %id, "admin demoted to regular user");

    Ok(Json(RoleChangeResponse {
        message: "Admin demoted to regular user successfully".to_string(),
        user: user.into(),
    }))
}

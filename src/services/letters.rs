// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Letter service: owner-scoped CRUD plus the best-effort Drive mirror.
//!
//! The core workflow for a write:
//! 1. Check ownership (updates/deletes)
//! 2. Persist the letter locally - this is the operation's outcome
//! 3. Optionally mirror to Drive: lazy token refresh, ensure folder,
//!    create-or-update the Doc, remember the file ID
//! 4. Any Drive-side failure becomes a warning on a success response
//!
//! The local write is never rolled back because of Drive.

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::Letter;
use crate::services::{DriveClient, GoogleAuthClient};
use uuid::Uuid;

/// Warning attached when a freshly created letter could not be mirrored.
pub const DRIVE_WARNING_CREATED: &str =
    "Letter saved locally but could not be saved to Google Drive";
/// Warning attached when an updated letter could not be mirrored.
pub const DRIVE_WARNING_UPDATED: &str =
    "Letter updated locally but could not be saved to Google Drive";

/// How a requested Drive sync ended, short of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveSyncStatus {
    /// The letter is now mirrored in Drive.
    Mirrored,
    /// Sync was skipped: the owner has no stored access token (or the owner
    /// record is gone). Not an error and not a warning.
    Skipped,
}

/// Result of a letter write: the stored letter plus an optional warning
/// when the Drive mirror did not happen.
#[derive(Debug, Clone)]
pub struct SavedLetter {
    pub letter: Letter,
    pub warning: Option<&'static str>,
}

/// Orchestrates letter persistence and Drive mirroring.
#[derive(Clone)]
pub struct LetterService {
    db: FirestoreDb,
    google: GoogleAuthClient,
    drive: DriveClient,
}

impl LetterService {
    pub fn new(db: FirestoreDb, google: GoogleAuthClient, drive: DriveClient) -> Self {
        Self { db, google, drive }
    }

    /// Create a letter for a user, optionally mirroring it to Drive.
    pub async fn create_letter(
        &self,
        user_id: &str,
        title: String,
        content: String,
        sync_to_drive: bool,
    ) -> Result<SavedLetter> {
        let now = chrono::Utc::now().to_rfc3339();
        let mut letter = Letter {
            id: Uuid::new_v4().to_string(),
            title,
            content,
            user_id: user_id.to_string(),
            google_drive_id: None,
            is_published: false,
            created_at: now.clone(),
            updated_at: now,
        };

        // 1. Local persistence first; this is what the response reflects
        self.db.set_letter(&letter).await?;
        tracing::info!(letter_id = %letter.id, user_id, "Letter created");

        // 2. Best-effort Drive mirror
        let warning = if sync_to_drive {
            self.sync_best_effort(&mut letter, DRIVE_WARNING_CREATED)
                .await
        } else {
            None
        };

        Ok(SavedLetter { letter, warning })
    }

    /// Update an owned letter, optionally re-mirroring it to Drive.
    pub async fn update_letter(
        &self,
        user_id: &str,
        letter_id: &str,
        title: String,
        content: String,
        sync_to_drive: bool,
    ) -> Result<SavedLetter> {
        let mut letter = self.require_owned(user_id, letter_id, "update").await?;

        letter.title = title;
        letter.content = content;
        letter.updated_at = chrono::Utc::now().to_rfc3339();

        self.db.set_letter(&letter).await?;
        tracing::info!(letter_id = %letter.id, user_id, "Letter updated");

        let warning = if sync_to_drive {
            self.sync_best_effort(&mut letter, DRIVE_WARNING_UPDATED)
                .await
        } else {
            None
        };

        Ok(SavedLetter { letter, warning })
    }

    /// Get a single letter, owner only.
    pub async fn get_letter(&self, user_id: &str, letter_id: &str) -> Result<Letter> {
        self.require_owned(user_id, letter_id, "access").await
    }

    /// All letters owned by a user, most recently updated first.
    pub async fn list_letters(&self, user_id: &str) -> Result<Vec<Letter>> {
        self.db.get_letters_for_user(user_id).await
    }

    /// Delete an owned letter locally. Any Drive mirror copy stays put.
    pub async fn delete_letter(&self, user_id: &str, letter_id: &str) -> Result<()> {
        let letter = self.require_owned(user_id, letter_id, "delete").await?;
        self.db.delete_letter(&letter.id).await?;
        tracing::info!(letter_id = %letter.id, user_id, "Letter deleted");
        Ok(())
    }

    /// Fetch a letter and verify the caller owns it.
    async fn require_owned(
        &self,
        user_id: &str,
        letter_id: &str,
        action: &str,
    ) -> Result<Letter> {
        let letter = self
            .db
            .get_letter(letter_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Letter not found".to_string()))?;

        if letter.user_id != user_id {
            return Err(AppError::Forbidden(format!(
                "Not authorized to {} this letter",
                action
            )));
        }

        Ok(letter)
    }

    /// Run the Drive mirror and convert any failure into a warning.
    async fn sync_best_effort(
        &self,
        letter: &mut Letter,
        warning: &'static str,
    ) -> Option<&'static str> {
        match self.mirror_to_drive(letter).await {
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    letter_id = %letter.id,
                    drive_side = e.is_drive_sync_error(),
                    "Drive sync failed, letter kept locally"
                );
                Some(warning)
            }
        }
    }

    /// Mirror one letter into the owner's Drive.
    ///
    /// Loads the owner's stored tokens, lazily refreshes the access token
    /// (continuing with the stale one if refresh fails), ensures the
    /// "Letters" folder, then creates or updates the Doc. A first-time
    /// mirror stores the returned file ID back on the letter; on any
    /// failure the stored mirror ID is left untouched.
    pub async fn mirror_to_drive(&self, letter: &mut Letter) -> Result<DriveSyncStatus> {
        let Some(mut owner) = self.db.get_user(&letter.user_id).await? else {
            tracing::warn!(
                user_id = %letter.user_id,
                letter_id = %letter.id,
                "Letter owner not found, skipping Drive sync"
            );
            return Ok(DriveSyncStatus::Skipped);
        };

        let Some(mut access_token) = owner.google_access_token.clone() else {
            tracing::debug!(user_id = %letter.user_id, "No stored access token, skipping Drive sync");
            return Ok(DriveSyncStatus::Skipped);
        };

        // Lazy refresh: try for a fresh token, keep going with the stored
        // one if Google refuses. The stored token may still be valid.
        if let Some(refresh_token) = owner.google_refresh_token.clone() {
            match self.google.refresh_access_token(&refresh_token).await {
                Ok(new_token) => {
                    access_token = new_token.clone();
                    owner.google_access_token = Some(new_token);
                    owner.updated_at = chrono::Utc::now().to_rfc3339();
                    if let Err(e) = self.db.upsert_user(&owner).await {
                        tracing::warn!(
                            error = %e,
                            user_id = %owner.google_id,
                            "Failed to persist refreshed access token"
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        user_id = %owner.google_id,
                        "Token refresh failed, continuing with stored token"
                    );
                }
            }
        }

        let folder_id = self.drive.ensure_letters_folder(&access_token).await?;
        let file = self
            .drive
            .save_letter(
                &access_token,
                &letter.title,
                &letter.content,
                &folder_id,
                letter.google_drive_id.as_deref(),
            )
            .await?;

        if letter.google_drive_id.is_none() {
            letter.google_drive_id = Some(file.id);
            self.db.set_letter(letter).await?;
        }

        Ok(DriveSyncStatus::Mirrored)
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod drive;
pub mod google_auth;
pub mod letters;

pub use drive::{DriveClient, DriveFile};
pub use google_auth::{GoogleAuthClient, GoogleAuthService, GoogleProfile};
pub use letters::{DriveSyncStatus, LetterService, SavedLetter};

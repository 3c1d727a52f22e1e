// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Letter Drive: personal letter storage with Google Drive mirroring
//!
//! This crate provides the backend API for writing and storing letters,
//! with Google OAuth sign-in and best-effort mirroring of each letter
//! into the owner's Google Drive.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::FirestoreDb;
use services::{GoogleAuthService, LetterService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub auth_service: GoogleAuthService,
    pub letter_service: LetterService,
}

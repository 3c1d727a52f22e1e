// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("Google Drive access token expired")]
    DriveTokenExpired,

    #[error("Google Drive API error: {0}")]
    DriveApi(String),

    #[error("Google OAuth error: {0}")]
    OAuth(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// True for failures on the Drive side of a letter write. The letter
    /// service turns these (and anything else raised while mirroring) into a
    /// warning on an otherwise successful response; they are never the
    /// primary error of a letter operation.
    pub fn is_drive_sync_error(&self) -> bool {
        matches!(
            self,
            AppError::RefreshFailed(_) | AppError::DriveTokenExpired | AppError::DriveApi(_)
        )
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", None),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", Some(msg.clone())),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::InvalidOperation(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_operation", Some(msg.clone()))
            }
            AppError::RefreshFailed(msg) => {
                (StatusCode::BAD_GATEWAY, "refresh_failed", Some(msg.clone()))
            }
            AppError::DriveTokenExpired => {
                (StatusCode::BAD_GATEWAY, "drive_token_expired", None)
            }
            AppError::DriveApi(msg) => (StatusCode::BAD_GATEWAY, "drive_error", Some(msg.clone())),
            AppError::OAuth(msg) => (StatusCode::BAD_GATEWAY, "oauth_error", Some(msg.clone())),
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    Some(msg.clone()),
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    Some(err.to_string()),
                )
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google OAuth authentication routes.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::Redirect,
    routing::get,
    Json, Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{AppError, Result};
use crate::middleware::auth::{bearer_token, create_jwt, decode_claims, Claims};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/google", get(auth_start))
        .route("/api/auth/google/callback", get(auth_callback))
        .route("/api/auth/check", get(auth_check))
        .route("/api/auth/logout", get(logout))
}

use hmac::{Hmac, Mac};
use sha2::Sha256;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

/// Start OAuth flow - redirect to the Google consent screen.
///
/// The `state` parameter carries the frontend URL and a timestamp, signed so
/// the callback can trust the redirect target it decodes.
async fn auth_start(State(state): State<Arc<AppState>>) -> Result<Redirect> {
    let frontend_url = state.config.frontend_url.clone();

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
        .as_millis();

    // Create the data payload: "frontend_url|timestamp_hex"
    let state_payload = format!("{}|{:x}", frontend_url, timestamp);

    // Sign the payload
    let mut mac = HmacSha256::new_from_slice(&state.config.jwt_secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(state_payload.as_bytes());
    let signature = mac.finalize().into_bytes();

    // Combine payload + signature: "payload|signature_hex"
    let signed_state = format!("{}|{}", state_payload, hex::encode(signature));

    // Base64 encode the whole thing for the URL
    let oauth_state = URL_SAFE_NO_PAD.encode(signed_state.as_bytes());

    let auth_url = state.auth_service.authorize_url(&oauth_state);

    tracing::info!(
        frontend_url = %frontend_url,
        "Starting OAuth flow, redirecting to Google"
    );

    Ok(Redirect::temporary(&auth_url))
}

/// Query parameters Google sends to the callback. Everything is optional:
/// a user who denies consent arrives with `error` and no `code`.
#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange code, resolve the user, hand out a JWT.
///
/// Every outcome is a redirect: success lands on the frontend login page
/// with the token as a query parameter, any failure lands there without one.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Redirect {
    // Decode and verify the frontend URL from the state parameter
    let frontend_url = params
        .state
        .as_deref()
        .and_then(|s| verify_and_decode_state(s, &state.config.jwt_secret))
        .unwrap_or_else(|| {
            tracing::warn!(
                "Invalid or missing state parameter, falling back to configured frontend URL"
            );
            state.config.frontend_url.clone()
        });

    let login_url = format!("{}/login", frontend_url);

    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from Google");
        return Redirect::temporary(&login_url);
    }

    let Some(code) = params.code else {
        tracing::warn!("OAuth callback without authorization code");
        return Redirect::temporary(&login_url);
    };

    match state.auth_service.handle_oauth_callback(&code).await {
        Ok(user) => match create_jwt(&user, &state.config.jwt_secret) {
            Ok(jwt) => {
                tracing::info!(user_id = %user.google_id, "Login successful");
                Redirect::temporary(&format!("{}?token={}", login_url, jwt))
            }
            Err(e) => {
                tracing::error!(error = %e, "JWT creation failed");
                Redirect::temporary(&login_url)
            }
        },
        Err(e) => {
            tracing::error!(error = %e, "OAuth callback failed");
            Redirect::temporary(&login_url)
        }
    }
}

/// Body for `/api/auth/check`: validity flag plus the decoded claims.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthCheckResponse {
    is_authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<Claims>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// Report whether the presented bearer token is currently valid.
async fn auth_check(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<AuthCheckResponse>) {
    let Some(token) = bearer_token(&headers) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(AuthCheckResponse {
                is_authenticated: false,
                user: None,
                message: Some("No token provided".to_string()),
            }),
        );
    };

    match decode_claims(token, &state.config.jwt_secret) {
        Ok(claims) => (
            StatusCode::OK,
            Json(AuthCheckResponse {
                is_authenticated: true,
                user: Some(claims),
                message: None,
            }),
        ),
        Err(_) => (
            StatusCode::UNAUTHORIZED,
            Json(AuthCheckResponse {
                is_authenticated: false,
                user: None,
                message: Some("Invalid or expired token".to_string()),
            }),
        ),
    }
}

#[derive(Serialize)]
struct LogoutResponse {
    success: bool,
    message: String,
}

/// Logout - sessions are stateless, so this only confirms; the client
/// discards its token.
async fn logout() -> Json<LogoutResponse> {
    Json(LogoutResponse {
        success: true,
        message: "Logged out successfully".to_string(),
    })
}

/// Verify HMAC signature and decode the frontend URL from the OAuth state parameter.
fn verify_and_decode_state(state: &str, secret: &[u8]) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    // Format is "frontend_url|timestamp_hex|signature_hex"
    let parts: Vec<&str> = state_str.splitn(3, '|').collect();
    if parts.len() != 3 {
        return None;
    }

    let frontend_url = parts[0];
    let timestamp_hex = parts[1];
    let signature_hex = parts[2];

    // Reconstruct payload and verify signature
    let payload = format!("{}|{}", frontend_url, timestamp_hex);

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload.as_bytes());

    let expected_signature = hex::encode(mac.finalize().into_bytes());

    if signature_hex != expected_signature {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return None;
    }

    Some(frontend_url.to_string())
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google OAuth client and identity resolution.
//!
//! Handles:
//! - Building the consent-screen URL (profile + email + drive.file scopes)
//! - Authorization-code exchange
//! - Userinfo profile fetch
//! - Access-token refresh for the Drive sync path

use crate::error::AppError;
use serde::Deserialize;

/// Google OAuth token endpoint.
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
/// Google consent screen.
const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
/// Userinfo endpoint (id, email, name, picture).
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Scopes requested at login. `drive.file` limits Drive access to files this
/// app created, which is all the mirror flow needs.
const OAUTH_SCOPES: &str = "profile email https://www.googleapis.com/auth/drive.file";

/// Google OAuth HTTP client.
///
/// Constructed once at startup and cloned into the services that need it;
/// there is no process-global client.
#[derive(Clone)]
pub struct GoogleAuthClient {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    callback_url: String,
}

impl GoogleAuthClient {
    /// Create a new Google OAuth client.
    pub fn new(client_id: String, client_secret: String, callback_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            token_url: TOKEN_URL.to_string(),
            client_id,
            client_secret,
            callback_url,
        }
    }

    /// Override the token endpoint.
    ///
    /// Intended for deterministic local/integration tests; production code
    /// always talks to Google.
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Build the consent-screen URL the login endpoint redirects to.
    ///
    /// `access_type=offline` + `prompt=consent` make Google return a refresh
    /// token, which the Drive sync path later depends on.
    pub fn authorize_url(&self, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent&state={}",
            AUTHORIZE_URL,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.callback_url),
            urlencoding::encode(OAUTH_SCOPES),
            urlencoding::encode(state),
        )
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<GoogleTokenResponse, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", self.callback_url.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::OAuth(format!("Token exchange failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Google token exchange failed");
            return Err(AppError::OAuth(format!(
                "Token exchange failed with status {}",
                status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::OAuth(format!("Failed to parse token response: {}", e)))
    }

    /// Fetch the Google profile for an access token.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<GoogleProfile, AppError> {
        let response = self
            .http
            .get(USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::OAuth(format!("Userinfo request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::OAuth(format!(
                "Userinfo failed with HTTP {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::OAuth(format!("Failed to parse profile: {}", e)))
    }

    /// Refresh an expired Drive access token.
    ///
    /// Returns only the new access token; Google does not rotate the refresh
    /// token on this grant.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<String, AppError> {
        if refresh_token.is_empty() {
            return Err(AppError::RefreshFailed(
                "No refresh token available".to_string(),
            ));
        }

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::RefreshFailed(format!("Token refresh request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::RefreshFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let refreshed: TokenRefreshResponse = response
            .json()
            .await
            .map_err(|e| AppError::RefreshFailed(format!("JSON parse error: {}", e)))?;

        Ok(refreshed.access_token)
    }
}

/// Token exchange response from Google OAuth.
///
/// `refresh_token` is only present when the user went through the consent
/// screen; silent re-auth omits it.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: i64,
}

/// Token refresh response from Google OAuth.
#[derive(Debug, Clone, Deserialize)]
struct TokenRefreshResponse {
    access_token: String,
}

/// Profile fields from the userinfo endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleProfile {
    /// Google account ID
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// GoogleAuthService - OAuth callback handling and identity resolution
// ─────────────────────────────────────────────────────────────────────────────

use crate::db::FirestoreDb;
use crate::models::{User, UserRole};

/// High-level auth service: turns an authorization code into a stored user.
#[derive(Clone)]
pub struct GoogleAuthService {
    client: GoogleAuthClient,
    db: FirestoreDb,
}

impl GoogleAuthService {
    pub fn new(client: GoogleAuthClient, db: FirestoreDb) -> Self {
        Self { client, db }
    }

    /// Consent-screen URL for the login redirect.
    pub fn authorize_url(&self, state: &str) -> String {
        self.client.authorize_url(state)
    }

    /// Handle OAuth callback: exchange the code, fetch the profile, and
    /// resolve the account. Returns the stored user for JWT issuance.
    pub async fn handle_oauth_callback(&self, code: &str) -> Result<User, AppError> {
        let tokens = self.client.exchange_code(code).await?;
        let profile = self.client.fetch_profile(&tokens.access_token).await?;

        let user = self
            .resolve_or_create(&profile, &tokens.access_token, tokens.refresh_token.as_deref())
            .await?;

        tracing::info!(
            user_id = %user.google_id,
            email = %user.email,
            new_refresh_token = tokens.refresh_token.is_some(),
            "OAuth callback handled"
        );

        Ok(user)
    }

    /// Look up the account for a Google profile, creating it on first login.
    ///
    /// The access token is overwritten unconditionally; the refresh token
    /// only when Google sent a fresh one, so a consent-skipping login does
    /// not wipe the stored long-lived token. Keyed by Google account ID, so
    /// repeated logins can never create a second record.
    pub async fn resolve_or_create(
        &self,
        profile: &GoogleProfile,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<User, AppError> {
        let now = chrono::Utc::now().to_rfc3339();

        let user = match self.db.get_user(&profile.id).await? {
            Some(mut existing) => {
                existing.google_access_token = Some(access_token.to_string());
                if let Some(refresh) = refresh_token {
                    existing.google_refresh_token = Some(refresh.to_string());
                }
                existing.updated_at = now;
                existing
            }
            None => User {
                google_id: profile.id.clone(),
                email: profile.email.clone(),
                name: profile.name.clone(),
                avatar: profile.picture.clone(),
                role: UserRole::User,
                google_access_token: Some(access_token.to_string()),
                google_refresh_token: refresh_token.map(|t| t.to_string()),
                created_at: now.clone(),
                updated_at: now,
            },
        };

        self.db.upsert_user(&user).await?;
        Ok(user)
    }
}

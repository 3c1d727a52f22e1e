//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// Role attached to a user account. Admins get the cross-user surface
/// under `/api/admin`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn is_admin(self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

/// User record stored in Firestore.
///
/// The Google account ID doubles as the document ID, so looking a user up
/// by external identity and by document ID are the same operation and two
/// logins can never mint two records for one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Google account ID (also used as document ID)
    pub google_id: String,
    /// Email address from the Google profile
    pub email: String,
    /// Display name from the Google profile
    pub name: String,
    /// Profile picture URL
    pub avatar: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    /// Short-lived Drive access token, overwritten on every login and
    /// on every successful refresh
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_access_token: Option<String>,
    /// Long-lived refresh token; Google only returns one on consent, so it
    /// is overwritten only when a new one actually arrives
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_refresh_token: Option<String>,
    /// When the account was first created (RFC 3339)
    pub created_at: String,
    /// Last login or token update (RFC 3339)
    pub updated_at: String,
}

/// User as exposed by the API: everything except the OAuth tokens.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub google_id: String,
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
    pub role: UserRole,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            google_id: user.google_id,
            email: user.email,
            name: user.name,
            avatar: user.avatar,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

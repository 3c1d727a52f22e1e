// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Letter model for storage and API.

use serde::{Deserialize, Serialize};

/// Stored letter record in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Letter {
    /// UUID assigned at creation (also used as document ID)
    pub id: String,
    /// Letter title; also becomes the Drive document name when mirrored
    pub title: String,
    /// Letter body; may contain markup, stored verbatim
    pub content: String,
    /// Google account ID of the owner
    pub user_id: String,
    /// Drive file ID once a mirror copy exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_drive_id: Option<String>,
    /// Stored but not interpreted by any endpoint
    #[serde(default)]
    pub is_published: bool,
    /// When the letter was created (RFC 3339)
    pub created_at: String,
    /// Last local write (RFC 3339)
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_wire_field_names() {
        let letter = Letter {
            id: "0c7f3a1e-9f2b-4a7e-8b1d-2f4a5c6d7e8f".to_string(),
            title: "To future me".to_string(),
            content: "<p>Hello</p>".to_string(),
            user_id: "104851234567890".to_string(),
            google_drive_id: Some("drive-file-1".to_string()),
            is_published: false,
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
            updated_at: "2026-01-01T00:00:00+00:00".to_string(),
        };
        let json = serde_json::to_value(&letter).unwrap();
        assert_eq!(json["userId"], "104851234567890");
        assert_eq!(json["googleDriveId"], "drive-file-1");
        assert_eq!(json["isPublished"], false);
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn test_letter_without_mirror_id() {
        let json = r#"{
            "id": "l1",
            "title": "T",
            "content": "C",
            "userId": "u1",
            "createdAt": "2026-01-01T00:00:00+00:00",
            "updatedAt": "2026-01-01T00:00:00+00:00"
        }"#;
        let letter: Letter = serde_json::from_str(json).unwrap();
        assert!(letter.google_drive_id.is_none());
        assert!(!letter.is_published);
        // Absent mirror id stays absent on the wire rather than null
        let out = serde_json::to_value(&letter).unwrap();
        assert!(out.get("googleDriveId").is_none());
    }
}

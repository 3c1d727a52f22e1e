// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google Drive API client for mirroring letters.
//!
//! Handles:
//! - Locating or creating the "Letters" folder
//! - Uploading letter content as a Google Doc (create or update in place)
//! - Markup stripping so the Doc holds plain text
//! - Expired-token detection (401) for the sync flow's warning path

use crate::error::AppError;
use serde::Deserialize;
use uuid::Uuid;

/// Folder all mirrored letters live under, created on first sync.
const LETTERS_FOLDER_NAME: &str = "Letters";
/// Drive's folder pseudo-mimetype.
const FOLDER_MIME: &str = "application/vnd.google-apps.folder";
/// Uploads convert to native Google Docs so they open in the Docs editor.
const DOCUMENT_MIME: &str = "application/vnd.google-apps.document";

/// Google Drive v3 API client.
#[derive(Clone)]
pub struct DriveClient {
    http: reqwest::Client,
    base_url: String,
    upload_base_url: String,
}

impl DriveClient {
    /// Create a new Drive client against the real Google endpoints.
    pub fn new() -> Self {
        Self::with_base_urls(
            "https://www.googleapis.com/drive/v3",
            "https://www.googleapis.com/upload/drive/v3",
        )
    }

    /// Create a client against alternate endpoints.
    ///
    /// Intended for deterministic local/integration tests; production code
    /// uses `new()`.
    pub fn with_base_urls(
        base_url: impl Into<String>,
        upload_base_url: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            upload_base_url: upload_base_url.into(),
        }
    }

    /// Find the "Letters" folder, creating it if it does not exist yet.
    ///
    /// Two concurrent first-time syncs can both miss the lookup and each
    /// create a folder; Drive allows duplicate names and the worst case is
    /// an extra empty folder, so there is no locking here.
    pub async fn ensure_letters_folder(&self, access_token: &str) -> Result<String, AppError> {
        if let Some(folder_id) = self.find_letters_folder(access_token).await? {
            return Ok(folder_id);
        }
        self.create_letters_folder(access_token).await
    }

    /// Look up the "Letters" folder by name, ignoring trashed ones.
    async fn find_letters_folder(&self, access_token: &str) -> Result<Option<String>, AppError> {
        let query = format!(
            "mimeType='{}' and name='{}' and trashed=false",
            FOLDER_MIME, LETTERS_FOLDER_NAME
        );

        let response = self
            .http
            .get(format!("{}/files", self.base_url))
            .bearer_auth(access_token)
            .query(&[("q", query.as_str()), ("fields", "files(id, name)")])
            .send()
            .await
            .map_err(|e| AppError::DriveApi(format!("Folder lookup failed: {}", e)))?;

        let list: DriveFileList = self.check_response_json(response).await?;
        Ok(list.files.into_iter().next().map(|f| f.id))
    }

    /// Create the "Letters" folder at the Drive root.
    async fn create_letters_folder(&self, access_token: &str) -> Result<String, AppError> {
        let metadata = serde_json::json!({
            "name": LETTERS_FOLDER_NAME,
            "mimeType": FOLDER_MIME,
        });

        let response = self
            .http
            .post(format!("{}/files", self.base_url))
            .bearer_auth(access_token)
            .query(&[("fields", "id")])
            .json(&metadata)
            .send()
            .await
            .map_err(|e| AppError::DriveApi(format!("Folder create failed: {}", e)))?;

        let folder: DriveFileId = self.check_response_json(response).await?;
        tracing::info!(folder_id = %folder.id, "Created Letters folder in Drive");
        Ok(folder.id)
    }

    /// Upload a letter to Drive as a Google Doc.
    ///
    /// With `existing_file_id` the file is updated in place (no `parents`
    /// in the metadata; moving the file is not this flow's business);
    /// without it a new file is created inside `folder_id`. Content is
    /// stripped of markup tags first so the Doc holds readable plain text.
    pub async fn save_letter(
        &self,
        access_token: &str,
        title: &str,
        content: &str,
        folder_id: &str,
        existing_file_id: Option<&str>,
    ) -> Result<DriveFile, AppError> {
        let text = strip_markup(content);

        let metadata = match existing_file_id {
            Some(_) => serde_json::json!({
                "name": title,
                "mimeType": DOCUMENT_MIME,
            }),
            None => serde_json::json!({
                "name": title,
                "mimeType": DOCUMENT_MIME,
                "parents": [folder_id],
            }),
        };

        let boundary = format!("letter_{}", Uuid::new_v4().simple());
        let body = multipart_related_body(&boundary, &metadata, &text);

        let request = match existing_file_id {
            Some(file_id) => self
                .http
                .patch(format!("{}/files/{}", self.upload_base_url, file_id)),
            None => self.http.post(format!("{}/files", self.upload_base_url)),
        };

        let response = request
            .bearer_auth(access_token)
            .query(&[("uploadType", "multipart"), ("fields", "id, webViewLink")])
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={}", boundary),
            )
            .body(body)
            .send()
            .await
            .map_err(|e| AppError::DriveApi(format!("Upload failed: {}", e)))?;

        let file: DriveFile = self.check_response_json(response).await?;
        tracing::debug!(
            file_id = %file.id,
            link = file.web_view_link.as_deref().unwrap_or(""),
            updated = existing_file_id.is_some(),
            "Letter saved to Drive"
        );
        Ok(file)
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            // Unauthorized - stored access token has expired or was revoked
            if status.as_u16() == 401 {
                return Err(AppError::DriveTokenExpired);
            }

            return Err(AppError::DriveApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::DriveApi(format!("JSON parse error: {}", e)))
    }
}

impl Default for DriveClient {
    fn default() -> Self {
        Self::new()
    }
}

/// File list response for the folder query (`fields=files(id, name)`).
#[derive(Debug, Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFileId>,
}

/// Minimal file reference.
#[derive(Debug, Deserialize)]
struct DriveFileId {
    id: String,
}

/// Uploaded file response (`fields=id, webViewLink`).
#[derive(Debug, Clone, Deserialize)]
pub struct DriveFile {
    pub id: String,
    #[serde(rename = "webViewLink", default)]
    pub web_view_link: Option<String>,
}

/// Remove markup tags from letter content, leaving the text.
///
/// A `<` opens a tag through the next `>`; a trailing unterminated tag is
/// dropped too. Entities are left as-is.
pub fn strip_markup(content: &str) -> String {
    let mut text = String::with_capacity(content.len());
    let mut chars = content.chars();

    while let Some(c) = chars.next() {
        if c == '<' {
            for t in chars.by_ref() {
                if t == '>' {
                    break;
                }
            }
        } else {
            text.push(c);
        }
    }

    text
}

/// Build a `multipart/related` upload body: JSON metadata part followed by
/// the plain-text media part.
fn multipart_related_body(boundary: &str, metadata: &serde_json::Value, text: &str) -> String {
    format!(
        "--{boundary}\r\n\
         Content-Type: application/json; charset=UTF-8\r\n\r\n\
         {metadata}\r\n\
         --{boundary}\r\n\
         Content-Type: text/plain; charset=UTF-8\r\n\r\n\
         {text}\r\n\
         --{boundary}--\r\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup_simple_tags() {
        assert_eq!(strip_markup("<p>Hello</p>"), "Hello");
        assert_eq!(
            strip_markup("<h1>Dear</h1><p>future <b>me</b>,</p>"),
            "Dearfuture me,"
        );
    }

    #[test]
    fn test_strip_markup_plain_text_untouched() {
        assert_eq!(strip_markup("no tags here"), "no tags here");
        assert_eq!(strip_markup(""), "");
        assert_eq!(strip_markup("a > b still fine"), "a > b still fine");
    }

    #[test]
    fn test_strip_markup_unterminated_tag() {
        assert_eq!(strip_markup("trailing <b"), "trailing ");
        assert_eq!(strip_markup("mid <img src='x' text"), "mid ");
    }

    #[test]
    fn test_strip_markup_attributes() {
        assert_eq!(
            strip_markup(r#"<a href="https://example.com">link</a>"#),
            "link"
        );
    }

    #[test]
    fn test_multipart_body_layout() {
        let metadata = serde_json::json!({"name": "T", "mimeType": DOCUMENT_MIME});
        let body = multipart_related_body("b123", &metadata, "Hello");

        assert!(body.starts_with("--b123\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n"));
        assert!(body.contains("application/vnd.google-apps.document"));
        assert!(body.contains("\r\n--b123\r\nContent-Type: text/plain; charset=UTF-8\r\n\r\nHello\r\n"));
        assert!(body.ends_with("--b123--\r\n"));
    }

    #[test]
    fn test_drive_file_deserializes_web_view_link() {
        let file: DriveFile =
            serde_json::from_str(r#"{"id": "f1", "webViewLink": "https://docs.example/f1"}"#)
                .unwrap();
        assert_eq!(file.id, "f1");
        assert_eq!(file.web_view_link.as_deref(), Some("https://docs.example/f1"));

        let bare: DriveFile = serde_json::from_str(r#"{"id": "f2"}"#).unwrap();
        assert!(bare.web_view_link.is_none());
    }
}

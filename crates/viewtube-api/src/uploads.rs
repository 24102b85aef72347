//! Multipart collection and the bridge into the media store.

use std::collections::HashMap;

use axum::extract::Multipart;

use viewtube_media::{MediaKind, StoredMedia};

use crate::auth::AppState;
use crate::error::{AppError, Result};

pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    fn ext(&self) -> &str {
        self.file_name.rsplit_once('.').map(|(_, e)| e).unwrap_or("bin")
    }
}

/// All fields of a multipart request, buffered. Uploads are size-capped by
/// the router's body limit before they reach this point.
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    /// Trimmed text field; blank counts as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// Uploaded file; empty payloads count as absent.
    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name).filter(|f| !f.bytes.is_empty())
    }
}

pub async fn collect(mut multipart: Multipart) -> Result<MultipartForm> {
    let mut fields = HashMap::new();
    let mut files = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if let Some(file_name) = field.file_name().map(str::to_string) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read upload '{name}': {e}")))?;
            files.insert(
                name,
                UploadedFile {
                    file_name,
                    bytes: bytes.to_vec(),
                },
            );
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read field '{name}': {e}")))?;
            fields.insert(name, text);
        }
    }

    Ok(MultipartForm { fields, files })
}

pub async fn store_image(state: &AppState, file: &UploadedFile) -> Result<StoredMedia> {
    store(state, file, MediaKind::Image).await
}

pub async fn store_video(state: &AppState, file: &UploadedFile) -> Result<StoredMedia> {
    store(state, file, MediaKind::Video).await
}

async fn store(state: &AppState, file: &UploadedFile, kind: MediaKind) -> Result<StoredMedia> {
    let staged = state
        .media
        .stage(&file.bytes)
        .await
        .map_err(|e| AppError::Upload(format!("Failed to stage upload: {e}")))?;

    state
        .media
        .publish(staged, file.ext(), kind)
        .await
        .map_err(|e| AppError::Upload(format!("Failed to store upload: {e}")))
}

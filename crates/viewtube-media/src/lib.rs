pub mod probe;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use uuid::Uuid;

/// Media kinds we accept from multipart uploads. Duration is only probed for
/// videos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// Result of publishing an upload: the public URL and, for videos, the
/// duration read from the container.
#[derive(Debug, Clone)]
pub struct StoredMedia {
    pub url: String,
    pub duration: Option<f64>,
}

/// An upload staged to a temp file. Dropping it removes the file, so the
/// temp location is cleaned up on both the success and the failure path.
pub struct StagedFile {
    path: PathBuf,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Disarm the drop cleanup and hand the path over (used after a rename).
    fn keep(self) -> PathBuf {
        let path = self.path.clone();
        std::mem::forget(self);
        path
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove staged upload {}: {}", self.path.display(), e);
            }
        }
    }
}

/// Manages on-disk media storage.
///
/// Uploads are staged under `{root}/tmp/{id}` and published as
/// `{root}/{id}.{ext}`; published files are addressable at
/// `{public_base}/{id}.{ext}`.
pub struct MediaStore {
    root: PathBuf,
    public_base: String,
}

impl MediaStore {
    pub async fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(root.join("tmp")).await?;
        info!("Media storage directory: {}", root.display());
        Ok(Self {
            root,
            public_base: public_base.into().trim_end_matches('/').to_string(),
        })
    }

    /// Directory served statically for published media.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write an upload to the temp area.
    pub async fn stage(&self, bytes: &[u8]) -> Result<StagedFile> {
        let path = self.root.join("tmp").join(Uuid::new_v4().to_string());
        let mut file = fs::File::create(&path).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        Ok(StagedFile { path })
    }

    /// Move a staged upload into the public area and return its URL. For
    /// videos the duration is probed from the staged bytes first; the staged
    /// file is removed whether or not publishing succeeds.
    pub async fn publish(&self, staged: StagedFile, ext: &str, kind: MediaKind) -> Result<StoredMedia> {
        let duration = match kind {
            MediaKind::Video => {
                let bytes = fs::read(staged.path()).await?;
                probe::mp4_duration(&bytes)
            }
            MediaKind::Image => None,
        };

        let file_name = format!("{}.{}", Uuid::new_v4(), sanitize_ext(ext));
        let dest = self.root.join(&file_name);
        fs::rename(staged.path(), &dest).await?;
        let _ = staged.keep();

        Ok(StoredMedia {
            url: format!("{}/{}", self.public_base, file_name),
            duration,
        })
    }
}

/// Keep extensions to something path-safe; anything odd becomes "bin".
fn sanitize_ext(ext: &str) -> String {
    let cleaned: String = ext
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(8)
        .collect::<String>()
        .to_ascii_lowercase();
    if cleaned.is_empty() {
        "bin".to_string()
    } else {
        cleaned
    }
}

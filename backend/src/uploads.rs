//! Cover image storage
//!
//! Uploaded covers are written to the configured upload directory under a
//! generated unique name and served back under the `/uploads/` prefix.

use crate::error::AppError;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

/// Prefix of stored cover paths and of the static route serving them
pub const PUBLIC_PREFIX: &str = "uploads";

/// Accepted cover file extensions
const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// An uploaded file held in memory until validated
#[derive(Debug, Clone)]
pub struct CoverUpload {
    /// Name supplied by the client
    pub file_name: Option<String>,
    /// File contents
    pub data: Vec<u8>,
}

/// Directory-backed store for uploaded covers
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    /// Create a store rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    /// Directory holding the files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Largest accepted upload in bytes
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Ensure the upload directory exists
    pub async fn ensure_dir(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir).await.map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "Failed to create upload directory {}: {}",
                self.dir.display(),
                e
            ))
        })
    }

    /// Check size and extension, returning the normalized extension
    pub fn validate(&self, upload: &CoverUpload) -> Result<String, AppError> {
        if upload.data.is_empty() {
            return Err(AppError::BadRequest("Cover file is empty".to_string()));
        }
        if upload.data.len() > self.max_bytes {
            return Err(AppError::BadRequest(format!(
                "Cover file too large: {} bytes (max {})",
                upload.data.len(),
                self.max_bytes
            )));
        }

        let ext = upload
            .file_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Unsupported cover type '{}'; expected one of {}",
                ext,
                ALLOWED_EXTENSIONS.join(", ")
            )));
        }
        Ok(ext)
    }

    /// Write the upload to disk and return its public path (`uploads/<file>`)
    pub async fn save(&self, upload: &CoverUpload) -> Result<String, AppError> {
        let ext = self.validate(upload)?;
        self.ensure_dir().await?;

        let unique_filename = format!(
            "{}-{}.{}",
            chrono::Utc::now().timestamp_millis(),
            uuid::Uuid::new_v4(),
            ext
        );
        let file_path = self.dir.join(&unique_filename);

        let mut file = fs::File::create(&file_path).await.map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to create cover file: {}", e))
        })?;
        if let Err(e) = write_all(&mut file, &upload.data).await {
            drop(file);
            self.remove_file(&unique_filename).await;
            return Err(AppError::Internal(anyhow::anyhow!(
                "Failed to write cover file: {}",
                e
            )));
        }

        info!(
            "Saved uploaded cover: {} ({} bytes)",
            unique_filename,
            upload.data.len()
        );
        Ok(format!("{}/{}", PUBLIC_PREFIX, unique_filename))
    }

    /// Remove a previously stored cover. Failures are only logged.
    pub async fn remove(&self, public_path: &str) {
        let file_name = public_path
            .strip_prefix(PUBLIC_PREFIX)
            .map(|rest| rest.trim_start_matches('/'))
            .unwrap_or(public_path);

        // Stored names never contain separators
        if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name.contains("..") {
            warn!("Refusing to remove suspicious cover path: {}", public_path);
            return;
        }
        self.remove_file(file_name).await;
    }

    async fn remove_file(&self, file_name: &str) {
        let path = self.dir.join(file_name);
        if let Err(e) = fs::remove_file(&path).await {
            warn!("Failed to remove cover {}: {}", path.display(), e);
        }
    }
}

async fn write_all(file: &mut fs::File, data: &[u8]) -> std::io::Result<()> {
    file.write_all(data).await?;
    file.sync_all().await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(len: usize) -> CoverUpload {
        CoverUpload {
            file_name: Some("cover.PNG".to_string()),
            data: vec![7u8; len],
        }
    }

    #[tokio::test]
    async fn test_save_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("covers"), 1024);

        let public = store.save(&png(10)).await.unwrap();
        assert!(public.starts_with("uploads/"));
        assert!(public.ends_with(".png"));

        let file_name = public.trim_start_matches("uploads/");
        let on_disk = store.dir().join(file_name);
        assert_eq!(std::fs::read(&on_disk).unwrap().len(), 10);

        store.remove(&public).await;
        assert!(!on_disk.exists());
    }

    #[test]
    fn test_rejects_large_and_foreign_files() {
        let store = UploadStore::new("unused", 8);
        assert!(matches!(store.validate(&png(9)), Err(AppError::BadRequest(_))));

        let exe = CoverUpload {
            file_name: Some("virus.exe".to_string()),
            data: vec![1, 2, 3],
        };
        assert!(matches!(store.validate(&exe), Err(AppError::BadRequest(_))));

        let nameless = CoverUpload {
            file_name: None,
            data: vec![1],
        };
        assert!(store.validate(&nameless).is_err());
    }

    #[tokio::test]
    async fn test_remove_ignores_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let outside = dir.path().join("keep.txt");
        std::fs::write(&outside, b"x").unwrap();

        let store = UploadStore::new(dir.path().join("covers"), 1024);
        store.remove("uploads/../keep.txt").await;
        assert!(outside.exists());
    }
}

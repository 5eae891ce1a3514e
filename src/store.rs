//! Directory-backed storage for uploaded images.
//!
//! There is no index and no locking: every listing re-reads the directory,
//! so the gallery is always a derived view of what is actually on disk, and
//! concurrent saves to the same name are last-writer-wins.

use std::collections::HashSet;
use std::path::PathBuf;

use log::debug;
use tokio::fs;

use crate::error::AppError;
use crate::media;

#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
    allowed: HashSet<String>,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>, allowed: HashSet<String>) -> Self {
        Self {
            root: root.into(),
            allowed,
        }
    }

    pub fn is_allowed(&self, filename: &str) -> bool {
        media::is_allowed(filename, &self.allowed)
    }

    /// Filenames of stored images that pass the extension filter, in
    /// directory enumeration order. That order is filesystem-dependent and
    /// not guaranteed stable between calls. A missing root directory is an
    /// empty gallery, not an error.
    pub async fn list_images(&self) -> Result<Vec<String>, AppError> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AppError::Storage(e)),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if let Some(name) = entry.file_name().to_str() {
                if media::is_allowed(name, &self.allowed) {
                    names.push(name.to_string());
                }
            }
        }
        Ok(names)
    }

    /// Write `content` under the sanitized form of `filename`, creating the
    /// root directory on first use. An existing file of the same sanitized
    /// name is overwritten.
    pub async fn save(&self, filename: &str, content: &[u8]) -> Result<String, AppError> {
        let name = media::sanitize_filename(filename);
        if name.is_empty() {
            return Err(AppError::InvalidRequest("No selected file".to_string()));
        }
        fs::create_dir_all(&self.root).await?;
        let path = self.root.join(&name);
        fs::write(&path, content).await?;
        debug!("saved {} ({} bytes)", path.display(), content.len());
        Ok(name)
    }

    /// Raw bytes of a stored file. The requested name is sanitized before
    /// the path join, so traversal sequences cannot escape the root.
    pub async fn fetch(&self, filename: &str) -> Result<Vec<u8>, AppError> {
        let name = media::sanitize_filename(filename);
        if name.is_empty() {
            return Err(AppError::NotFound(filename.to_string()));
        }
        let path = self.root.join(&name);
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound(name))
            }
            Err(e) => Err(AppError::Storage(e)),
        }
    }
}

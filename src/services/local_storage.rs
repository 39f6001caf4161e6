use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{fs, io::AsyncWriteExt};

use crate::{
    application::{
        error::ApplicationError,
        services::{ByteStream, StorageService},
    },
    domain::models::file::FileData,
    services::error::StorageError,
};

/// Filesystem-backed storage rooted at a single directory. Keys are
/// `{millis}/{sanitized-filename}` relative paths.
pub struct LocalStorageService {
    root_dir: PathBuf,
}

impl LocalStorageService {
    pub async fn new(root_dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root_dir = root_dir.into();

        fs::create_dir_all(&root_dir).await.map_err(|e| {
            StorageError::InternalError(format!(
                "Failed to create storage directory {}: {}",
                root_dir.display(),
                e
            ))
        })?;

        Ok(Self { root_dir })
    }

    /// Keys come back from the database, so a tampered row must not be able
    /// to escape the storage root.
    fn key_to_path(&self, storage_key: &str) -> Result<PathBuf, StorageError> {
        if storage_key.contains("..") || storage_key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }
        Ok(self.root_dir.join(storage_key))
    }

    fn generate_key(filename: &str) -> String {
        use std::time::{SystemTime, UNIX_EPOCH};
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();

        format!("{}/{}", timestamp, sanitize_filename(filename))
    }

    async fn ensure_parent_dir(&self, path: &Path) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

pub(super) fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl StorageService for LocalStorageService {
    async fn upload(&self, file_data: FileData) -> Result<String, ApplicationError> {
        let key = Self::generate_key(&file_data.filename);
        let path = self.key_to_path(&key)?;
        let size = file_data.size();

        self.ensure_parent_dir(&path).await?;

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::InternalError(format!(
                "Failed to create file {}: {}",
                path.display(),
                e
            ))
        })?;

        file.write_all(&file_data.content).await.map_err(|e| {
            StorageError::InternalError(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::InternalError(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(key = %key, size_bytes = size, "Stored file on local filesystem");

        Ok(key)
    }

    async fn download(&self, storage_key: &str) -> Result<ByteStream, ApplicationError> {
        let path = self.key_to_path(storage_key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(storage_key.to_string()).into());
        }

        let file = fs::File::open(&path).await.map_err(|e| {
            StorageError::InternalError(format!("Failed to open file {}: {}", path.display(), e))
        })?;

        let stream = tokio_util::io::ReaderStream::new(file);
        Ok(Box::pin(stream) as ByteStream)
    }

    async fn delete(&self, storage_key: &str) -> Result<(), ApplicationError> {
        let path = self.key_to_path(storage_key)?;

        // Deleting bytes that are already gone is a no-op, so a sweep
        // interrupted between byte and record deletion can re-run safely.
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::InternalError(format!(
                "Failed to delete file {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!(key = %storage_key, "Deleted file from local filesystem");

        Ok(())
    }
}

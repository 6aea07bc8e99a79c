use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/tubely/assets")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:4000/assets")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert storage key to filesystem path, refusing keys that escape the base directory.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        validate_key(storage_key)?;
        Ok(self.base_path.join(storage_key))
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    fn stored(&self, storage_key: &str) -> StoredObject {
        StoredObject {
            bucket: self.base_path.display().to_string(),
            key: storage_key.to_string(),
            url: self.generate_url(storage_key),
        }
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put_file(
        &self,
        storage_key: &str,
        path: &Path,
        _content_type: &str,
    ) -> StorageResult<StoredObject> {
        let target = self.key_to_path(storage_key)?;
        self.ensure_parent_dir(&target).await?;

        let start = std::time::Instant::now();

        let size = fs::copy(path, &target).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to copy {} to {}: {}",
                path.display(),
                target.display(),
                e
            ))
        })?;

        tracing::info!(
            path = %target.display(),
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(self.stored(storage_key))
    }

    async fn put_bytes(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> StorageResult<StoredObject> {
        let path = self.key_to_path(storage_key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(self.stored(storage_key))
    }

    async fn get_presigned_url(
        &self,
        storage_key: &str,
        _expires_in: Duration,
    ) -> StorageResult<String> {
        let path = self.key_to_path(storage_key)?;
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(storage_key.to_string()));
        }
        Ok(self.generate_url(storage_key))
    }

    fn public_url(&self, storage_key: &str) -> String {
        self.generate_url(storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_put_file_copies_contents() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(
            dir.path().join("assets"),
            "http://localhost:4000/assets".to_string(),
        )
        .await
        .unwrap();

        let source = dir.path().join("staged.mp4");
        tokio::fs::write(&source, b"faststart bytes").await.unwrap();

        let stored = storage
            .put_file("landscape/abc.mp4", &source, "video/mp4")
            .await
            .unwrap();

        assert_eq!(stored.key, "landscape/abc.mp4");
        assert_eq!(stored.url, "http://localhost:4000/assets/landscape/abc.mp4");
        let copied = tokio::fs::read(dir.path().join("assets/landscape/abc.mp4"))
            .await
            .unwrap();
        assert_eq!(copied, b"faststart bytes");
        // The source is left for its owner to clean up.
        assert!(source.exists());
    }

    #[tokio::test]
    async fn test_put_file_missing_source_fails() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost:4000/assets".to_string())
            .await
            .unwrap();

        let result = storage
            .put_file("other/abc.mp4", &dir.path().join("missing.mp4"), "video/mp4")
            .await;
        assert!(matches!(result, Err(StorageError::UploadFailed(_))));
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost:4000/assets".to_string())
            .await
            .unwrap();

        let result = storage
            .put_bytes("../../../etc/passwd", b"x".to_vec(), "text/plain")
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage
            .get_presigned_url("/etc/passwd", Duration::from_secs(60))
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_presigned_url_requires_existing_object() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost:4000/assets".to_string())
            .await
            .unwrap();

        let missing = storage
            .get_presigned_url("thumbnails/none.png", Duration::from_secs(60))
            .await;
        assert!(matches!(missing, Err(StorageError::NotFound(_))));

        storage
            .put_bytes("thumbnails/a.png", b"png".to_vec(), "image/png")
            .await
            .unwrap();
        let url = storage
            .get_presigned_url("thumbnails/a.png", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(url, "http://localhost:4000/assets/thumbnails/a.png");
        assert_eq!(storage.key_from_url(&url).as_deref(), Some("thumbnails/a.png"));
    }
}

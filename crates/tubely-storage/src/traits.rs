//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Location of an object that the store has confirmed as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub url: String,
}

/// Storage abstraction trait
///
/// Every write is a single put of the full byte range; a returned
/// `StoredObject` means the backend acknowledged the write.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload the full contents of a local file under `storage_key`.
    async fn put_file(
        &self,
        storage_key: &str,
        path: &Path,
        content_type: &str,
    ) -> StorageResult<StoredObject>;

    /// Upload an in-memory buffer under `storage_key`.
    async fn put_bytes(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<StoredObject>;

    /// Generate a presigned/temporary URL for direct read access (GET)
    async fn get_presigned_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Public URL an object with this key is reachable at.
    fn public_url(&self, storage_key: &str) -> String;

    /// Recover the key from a URL produced by [`Storage::public_url`].
    ///
    /// Returns `None` for URLs that point somewhere else.
    fn key_from_url(&self, url: &str) -> Option<String> {
        let base = self.public_url("");
        url.strip_prefix(&base)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    }

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

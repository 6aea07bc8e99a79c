//! Mock Storage implementation for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tubely_storage::keys::validate_key;
use tubely_storage::{Storage, StorageBackend, StorageError, StorageResult, StoredObject};

pub const MOCK_BUCKET: &str = "tubely-test";
const MOCK_BASE_URL: &str = "https://tubely-test.s3.us-east-1.amazonaws.com/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Mock storage implementation that stores objects in memory
#[derive(Clone, Default)]
pub struct MockStorage {
    objects: Arc<Mutex<HashMap<String, StoredBlob>>>,
    fail_puts: Arc<AtomicBool>,
    put_calls: Arc<AtomicUsize>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent put fail.
    pub fn set_fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    /// Get an object (for test assertions)
    pub fn get(&self, key: &str) -> Option<StoredBlob> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    fn store(&self, key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<StoredObject> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        validate_key(key)?;
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed(
                "simulated object store outage".to_string(),
            ));
        }

        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredBlob {
                data,
                content_type: content_type.to_string(),
            },
        );

        Ok(StoredObject {
            bucket: MOCK_BUCKET.to_string(),
            key: key.to_string(),
            url: self.public_url(key),
        })
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn put_file(
        &self,
        storage_key: &str,
        path: &Path,
        content_type: &str,
    ) -> StorageResult<StoredObject> {
        let data = tokio::fs::read(path).await?;
        self.store(storage_key, data, content_type)
    }

    async fn put_bytes(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<StoredObject> {
        self.store(storage_key, data, content_type)
    }

    async fn get_presigned_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        if !self.objects.lock().unwrap().contains_key(storage_key) {
            return Err(StorageError::NotFound(storage_key.to_string()));
        }
        Ok(format!(
            "{}?X-Amz-Expires={}&X-Amz-Signature=mock",
            self.public_url(storage_key),
            expires_in.as_secs()
        ))
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("{MOCK_BASE_URL}{storage_key}")
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

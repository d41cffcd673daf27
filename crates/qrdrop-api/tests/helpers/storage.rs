//! Storage doubles: a recorder around a real backend and a backend that always fails.

use async_trait::async_trait;
use qrdrop_core::StorageBackend;
use qrdrop_storage::{Storage, StorageError, StorageResult, WriteMode};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub key: String,
    pub data: Vec<u8>,
    pub content_type: String,
    pub mode: WriteMode,
}

/// Forwards to `inner` and remembers every call.
pub struct RecordingStorage {
    inner: Arc<dyn Storage>,
    calls: AtomicUsize,
    uploads: Mutex<Vec<RecordedUpload>>,
}

impl RecordingStorage {
    pub fn new(inner: Arc<dyn Storage>) -> Arc<Self> {
        Arc::new(RecordingStorage {
            inner,
            calls: AtomicUsize::new(0),
            uploads: Mutex::new(Vec::new()),
        })
    }

    /// Calls of any kind, including URL prediction.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().unwrap().clone()
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    fn public_url(&self, storage_key: &str) -> StorageResult<String> {
        self.hit();
        self.inner.public_url(storage_key)
    }

    async fn upload(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
        mode: WriteMode,
    ) -> StorageResult<()> {
        self.hit();
        self.uploads.lock().unwrap().push(RecordedUpload {
            key: storage_key.to_string(),
            data: data.clone(),
            content_type: content_type.to_string(),
            mode,
        });
        self.inner.upload(storage_key, data, content_type, mode).await
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        self.hit();
        self.inner.exists(storage_key).await
    }

    fn backend_type(&self) -> StorageBackend {
        self.inner.backend_type()
    }
}

/// Predicts URLs normally but refuses every write.
pub struct FailingStorage {
    pub upload_attempts: AtomicUsize,
}

impl FailingStorage {
    pub fn new() -> Arc<Self> {
        Arc::new(FailingStorage {
            upload_attempts: AtomicUsize::new(0),
        })
    }

    pub fn upload_attempts(&self) -> usize {
        self.upload_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for FailingStorage {
    fn public_url(&self, storage_key: &str) -> StorageResult<String> {
        Ok(format!("https://storage.invalid/pdf_files/{}", storage_key))
    }

    async fn upload(
        &self,
        _storage_key: &str,
        _data: Vec<u8>,
        _content_type: &str,
        _mode: WriteMode,
    ) -> StorageResult<()> {
        self.upload_attempts.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::UploadFailed(
            "simulated outage: bucket pdf_files unavailable".to_string(),
        ))
    }

    async fn exists(&self, _storage_key: &str) -> StorageResult<bool> {
        Err(StorageError::BackendError("simulated outage".to_string()))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Supabase
    }
}

//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Object already exists: {0}")]
    AlreadyExists(String),

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

/// What an upload does when the key is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Fail with [`StorageError::AlreadyExists`].
    Create,
    /// Replace the existing object.
    Overwrite,
}

/// Storage abstraction trait
///
/// All storage backends (S3, Supabase, local filesystem) implement this trait so
/// the publish pipeline never couples to a specific provider.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Public URL the object at `storage_key` is (or will be) served from.
    ///
    /// Must be deterministic and free of side effects; it is called before the
    /// object is uploaded.
    fn public_url(&self, storage_key: &str) -> StorageResult<String>;

    /// Upload `data` to `storage_key`.
    async fn upload(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
        mode: WriteMode,
    ) -> StorageResult<()>;

    /// Check if a file exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

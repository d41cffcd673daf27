use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult, WriteMode};
use crate::StorageBackend;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
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
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/qrdrop")
    /// * `base_url` - Base URL the directory is served from (e.g., "http://localhost:3000/files")
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

    /// Root directory of the store.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert storage key to filesystem path with security validation
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        validate_key(storage_key)?;

        let path = self.base_path.join(storage_key);
        if !path.starts_with(&self.base_path) {
            return Err(StorageError::InvalidKey(
                "Storage key resolves outside storage directory".to_string(),
            ));
        }

        Ok(path)
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn open_for_write(&self, path: &Path, key: &str, mode: WriteMode) -> StorageResult<fs::File> {
        let mut options = fs::OpenOptions::new();
        options.write(true);
        match mode {
            WriteMode::Create => options.create_new(true),
            WriteMode::Overwrite => options.create(true).truncate(true),
        };

        options.open(path).await.map_err(|e| {
            if e.kind() == ErrorKind::AlreadyExists {
                StorageError::AlreadyExists(key.to_string())
            } else {
                StorageError::UploadFailed(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                ))
            }
        })
    }
}

async fn write_and_sync(file: &mut fs::File, data: &[u8]) -> std::io::Result<()> {
    file.write_all(data).await?;
    file.sync_all().await
}

/// A file that could not be fully written is removed so no truncated
/// document stays behind at its key.
async fn finish_write(path: &Path, written: std::io::Result<()>) -> StorageResult<()> {
    let Err(e) = written else {
        return Ok(());
    };

    if let Err(remove_err) = fs::remove_file(path).await {
        if remove_err.kind() != ErrorKind::NotFound {
            tracing::warn!(
                path = %path.display(),
                error = %remove_err,
                "Failed to remove partially written file"
            );
        }
    }

    Err(StorageError::UploadFailed(format!(
        "Failed to write file {}: {}",
        path.display(),
        e
    )))
}

#[async_trait]
impl Storage for LocalStorage {
    fn public_url(&self, storage_key: &str) -> StorageResult<String> {
        validate_key(storage_key)?;
        Ok(self.generate_url(storage_key))
    }

    async fn upload(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        _content_type: &str,
        mode: WriteMode,
    ) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = self.open_for_write(&path, storage_key, mode).await?;
        let written = write_and_sync(&mut file, &data).await;
        drop(file);
        finish_write(&path, written).await?;

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

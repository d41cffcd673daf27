//! Shared key generation for storage backends.
//!
//! Key format: `processed/{file_id}.pdf`.

use qrdrop_core::constants::{PDF_EXTENSION, PROCESSED_PREFIX};
use uuid::Uuid;

use crate::traits::{StorageError, StorageResult};

/// Generate the storage key of a processed document.
///
/// The key is a pure function of the identifier; all backends use it.
pub fn generate_storage_key(file_id: Uuid) -> String {
    format!("{}/{}.{}", PROCESSED_PREFIX, file_id, PDF_EXTENSION)
}

/// Reject keys that are empty, absolute or that try to climb out of the bucket.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.trim().is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if storage_key.starts_with('/') || storage_key.starts_with('\\') {
        return Err(StorageError::InvalidKey(format!(
            "Storage key must be relative: {}",
            storage_key
        )));
    }
    if storage_key.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(StorageError::InvalidKey(format!(
            "Storage key contains a parent segment: {}",
            storage_key
        )));
    }
    Ok(())
}

#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
#[cfg(feature = "storage-supabase")]
use crate::SupabaseStorage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use qrdrop_core::Config;
use std::sync::Arc;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let storage = &config.storage;

    match storage.backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            if storage.bucket.trim().is_empty() {
                return Err(StorageError::ConfigError(
                    "STORAGE_BUCKET not configured".to_string(),
                ));
            }
            let s3 = S3Storage::new(
                storage.bucket.clone(),
                storage.s3_region.clone(),
                storage.s3_endpoint.clone(),
                storage.s3_public_base_url.clone(),
            )?;
            Ok(Arc::new(s3))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-supabase")]
        StorageBackend::Supabase => {
            let url = storage.supabase_url.clone().ok_or_else(|| {
                StorageError::ConfigError("SUPABASE_URL not configured".to_string())
            })?;
            let key = storage.supabase_service_key.clone().ok_or_else(|| {
                StorageError::ConfigError("SUPABASE_SERVICE_KEY not configured".to_string())
            })?;
            let supabase = SupabaseStorage::new(url, key, storage.bucket.clone())?;
            Ok(Arc::new(supabase))
        }

        #[cfg(not(feature = "storage-supabase"))]
        StorageBackend::Supabase => Err(StorageError::ConfigError(
            "Supabase storage backend not available (storage-supabase feature not enabled)"
                .to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let local = LocalStorage::new(
                storage.local_storage_path.clone(),
                storage.local_storage_base_url.clone(),
            )
            .await?;
            Ok(Arc::new(local))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}

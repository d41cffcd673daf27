//! Configuration validation
//!
//! Runs once at startup, after telemetry is up so warnings are visible.

use anyhow::Result;
use qrdrop_core::{Config, StorageBackend};

/// Validate critical configuration values
///
/// Hard errors come from [`Config::validate`]. Settings that are legal but
/// surprising in production only produce warnings.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.is_production() {
        if config.cors_origins().iter().any(|o| o == "*") {
            tracing::warn!(
                "CORS allows all origins (*) in production; set CORS_ORIGINS to restrict browsers"
            );
        }

        if config.storage_backend() == StorageBackend::Local {
            tracing::warn!(
                path = %config.storage.local_storage_path,
                "Local storage backend in production; files live on this host only"
            );
        }
    }

    tracing::debug!(
        backend = %config.storage_backend(),
        bucket = %config.storage_bucket(),
        max_upload_size_bytes = config.max_upload_size_bytes(),
        qr_module_size = config.qr_module_size(),
        "Configuration summary"
    );

    Ok(())
}

//! Configuration module
//!
//! Configuration is read once at start-up from the process environment (and an
//! optional `.env` file) into an immutable [`Config`] that is shared with every
//! handler and collaborator.

use std::env;

use crate::constants::{
    DEFAULT_BUCKET, DEFAULT_HTTP_CONCURRENCY_LIMIT, DEFAULT_LOCAL_STORAGE_BASE_URL,
    DEFAULT_LOCAL_STORAGE_PATH, DEFAULT_MAX_UPLOAD_SIZE_MB, DEFAULT_PORT, DEFAULT_QR_MODULE_SIZE,
};
use crate::storage_types::StorageBackend;

const DEFAULT_S3_REGION: &str = "us-east-1";

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub http_concurrency_limit: usize,
    /// `text` or `json`
    pub log_format: String,
    /// Directory holding the browser upload page. `None` uses the bundled one.
    pub static_dir: Option<String>,
}

/// Storage collaborator settings
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub bucket: String,
    pub s3_region: String,
    pub s3_endpoint: Option<String>, // S3-compatible providers (MinIO, R2, ...)
    pub s3_public_base_url: Option<String>,
    pub local_storage_path: String,
    pub local_storage_base_url: String,
    pub supabase_url: Option<String>,
    pub supabase_service_key: Option<String>,
}

/// Publish pipeline settings
#[derive(Clone, Debug)]
pub struct PublishConfig {
    pub max_upload_size_bytes: usize,
    pub qr_module_size: u32,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub storage: StorageConfig,
    pub publish: PublishConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins =
            parse_cors_origins(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()));

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            http_concurrency_limit: env::var("HTTP_CONCURRENCY_LIMIT")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(DEFAULT_HTTP_CONCURRENCY_LIMIT)
                .max(1),
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "text".to_string())
                .to_lowercase(),
            static_dir: non_empty_var("STATIC_DIR"),
        };

        let backend = match env::var("STORAGE_BACKEND") {
            Ok(value) if !value.trim().is_empty() => value.parse::<StorageBackend>()?,
            _ => StorageBackend::Local,
        };

        let storage = StorageConfig {
            backend,
            bucket: env::var("STORAGE_BUCKET")
                .or_else(|_| env::var("S3_BUCKET"))
                .unwrap_or_else(|_| DEFAULT_BUCKET.to_string()),
            s3_region: env::var("S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .unwrap_or_else(|_| DEFAULT_S3_REGION.to_string()),
            s3_endpoint: non_empty_var("S3_ENDPOINT"),
            s3_public_base_url: non_empty_var("S3_PUBLIC_BASE_URL"),
            local_storage_path: env::var("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|_| DEFAULT_LOCAL_STORAGE_PATH.to_string()),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_LOCAL_STORAGE_BASE_URL.to_string()),
            supabase_url: non_empty_var("SUPABASE_URL"),
            supabase_service_key: non_empty_var("SUPABASE_SERVICE_KEY"),
        };

        let max_upload_size_bytes = parse_upload_limit_bytes(
            &env::var("MAX_UPLOAD_SIZE_MB")
                .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_SIZE_MB.to_string()),
        )?;

        let publish = PublishConfig {
            max_upload_size_bytes,
            qr_module_size: env::var("QR_MODULE_SIZE")
                .unwrap_or_else(|_| DEFAULT_QR_MODULE_SIZE.to_string())
                .parse()
                .unwrap_or(DEFAULT_QR_MODULE_SIZE),
        };

        Ok(Config {
            base,
            storage,
            publish,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.server_port == 0 {
            return Err(anyhow::anyhow!("PORT must be greater than 0"));
        }

        if self.publish.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        if self.publish.qr_module_size == 0 {
            return Err(anyhow::anyhow!("QR_MODULE_SIZE must be greater than 0"));
        }

        match self.storage.backend {
            StorageBackend::S3 => {
                if self.storage.bucket.trim().is_empty() {
                    return Err(anyhow::anyhow!(
                        "STORAGE_BUCKET must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Supabase => {
                if self.storage.supabase_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "SUPABASE_URL must be set when using supabase storage backend"
                    ));
                }
                if self.storage.supabase_service_key.is_none() {
                    return Err(anyhow::anyhow!(
                        "SUPABASE_SERVICE_KEY must be set when using supabase storage backend"
                    ));
                }
                if self.storage.bucket.trim().is_empty() {
                    return Err(anyhow::anyhow!(
                        "STORAGE_BUCKET must be set when using supabase storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.storage.local_storage_path.trim().is_empty() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.base.http_concurrency_limit
    }

    pub fn log_format(&self) -> &str {
        &self.base.log_format
    }

    pub fn static_dir(&self) -> Option<&str> {
        self.base.static_dir.as_deref()
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage.backend
    }

    pub fn storage_bucket(&self) -> &str {
        &self.storage.bucket
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.publish.max_upload_size_bytes
    }

    pub fn qr_module_size(&self) -> u32 {
        self.publish.qr_module_size
    }
}

impl Default for Config {
    /// Development defaults: local storage, any-origin CORS, 10 MiB uploads.
    fn default() -> Self {
        Config {
            base: BaseConfig {
                server_port: DEFAULT_PORT,
                cors_origins: vec!["*".to_string()],
                environment: "development".to_string(),
                http_concurrency_limit: DEFAULT_HTTP_CONCURRENCY_LIMIT,
                log_format: "text".to_string(),
                static_dir: None,
            },
            storage: StorageConfig {
                backend: StorageBackend::Local,
                bucket: DEFAULT_BUCKET.to_string(),
                s3_region: DEFAULT_S3_REGION.to_string(),
                s3_endpoint: None,
                s3_public_base_url: None,
                local_storage_path: DEFAULT_LOCAL_STORAGE_PATH.to_string(),
                local_storage_base_url: DEFAULT_LOCAL_STORAGE_BASE_URL.to_string(),
                supabase_url: None,
                supabase_service_key: None,
            },
            publish: PublishConfig {
                max_upload_size_bytes: DEFAULT_MAX_UPLOAD_SIZE_MB * 1024 * 1024,
                qr_module_size: DEFAULT_QR_MODULE_SIZE,
            },
        }
    }
}

/// Convert a `MAX_UPLOAD_SIZE_MB` value to bytes.
pub fn parse_upload_limit_bytes(raw: &str) -> Result<usize, anyhow::Error> {
    let megabytes = raw
        .trim()
        .parse::<usize>()
        .map_err(|_| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be a valid number"))?;
    megabytes
        .checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large"))
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Split a comma separated origin list, dropping blanks.
pub fn parse_cors_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if origins.is_empty() {
        vec!["*".to_string()]
    } else {
        origins
    }
}

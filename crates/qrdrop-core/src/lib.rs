//! QRDrop Core Library
//!
//! This crate provides configuration, error types, wire models and shared
//! constants used by every QRDrop component.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, PublishConfig, StorageConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{PublishRecord, PublishResponse};
pub use storage_types::StorageBackend;

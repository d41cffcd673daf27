//! QRDrop Storage Library
//!
//! This crate provides the storage abstraction used by the publish pipeline and
//! its implementations for S3, Supabase Storage and the local filesystem.
//!
//! # Storage key format
//!
//! Processed documents live at `processed/{file_id}.pdf`. Keys must not contain
//! `..` or a leading `/`. Key generation is centralized in the `keys` module so
//! all backends agree on the layout.
//!
//! # Public URLs
//!
//! [`Storage::public_url`] is a pure function of the key and the backend's
//! configuration. It can be called before the object exists, which is what lets
//! the pipeline embed the final URL inside the document it is about to upload.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
#[cfg(feature = "storage-supabase")]
pub mod supabase;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{generate_storage_key, validate_key};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use qrdrop_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
#[cfg(feature = "storage-supabase")]
pub use supabase::SupabaseStorage;
pub use traits::{Storage, StorageError, StorageResult, WriteMode};

//! Storage abstraction trait
//!
//! This module defines the ObjectStore trait that all storage backends must
//! implement.

use async_trait::async_trait;
use galleria_core::StorageBackend;
use std::collections::HashMap;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Empty object body: {0}")]
    EmptyBody(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A raw object fetched from the store: bytes, declared content type, and
/// the opaque annotation map attached at upload time. Fetched fresh per
/// reference; never cached across invocations.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub annotations: HashMap<String, String>,
}

/// Object-store abstraction.
///
/// `container` names the bucket or top-level namespace from the inbound
/// notification. Backends bound to a single bucket at construction (S3) use
/// their configured bucket and log a mismatch; the local backend maps the
/// container to a subdirectory.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch an object together with its content type and annotations.
    async fn get(&self, container: &str, key: &str) -> StorageResult<StoredObject>;

    /// Write an object, overwriting any existing object at `key`.
    async fn put(
        &self,
        container: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
        annotations: &HashMap<String, String>,
    ) -> StorageResult<()>;

    /// Check whether an object exists at `key`.
    async fn exists(&self, container: &str, key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

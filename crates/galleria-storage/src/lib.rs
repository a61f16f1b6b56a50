//! Galleria Storage Library
//!
//! Object-store abstraction and backends for the ingestion pipeline.
//! Objects carry a declared content type and an opaque annotation map
//! attached at upload time; both travel with the bytes through `get`/`put`.
//!
//! Keys must not contain `..` or a leading `/`. Thumbnail keys are derived
//! from source keys by prefix substitution; that derivation is centralized
//! in the `keys` module.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_store;
pub use galleria_core::StorageBackend;
pub use keys::{file_name_from_key, thumbnail_key};
#[cfg(feature = "storage-local")]
pub use local::LocalStore;
#[cfg(feature = "storage-s3")]
pub use s3::S3Store;
pub use traits::{ObjectStore, StorageError, StorageResult, StoredObject};

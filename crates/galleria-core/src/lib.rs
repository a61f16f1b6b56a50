//! Galleria Core Library
//!
//! This crate provides the domain models, error types, and configuration
//! shared across all galleria components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{CatalogConfig, Config, PipelineConfig, StorageConfig};
pub use error::{ConfigError, PipelineError};
pub use storage_types::StorageBackend;

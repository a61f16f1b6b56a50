//! Configuration module
//!
//! Explicit configuration structs for the ingestion pipeline, the object
//! store, and the catalog. Each struct can be built directly (tests, embedders)
//! or read from the environment via `from_env()`. `validate()` turns a
//! misconfiguration into a typed [`ConfigError`] at startup instead of a
//! per-call soft failure.

use std::env;

use crate::constants::{
    DEFAULT_THUMBNAIL_HEIGHT, DEFAULT_THUMBNAIL_PREFIX, DEFAULT_THUMBNAIL_WIDTH,
    DEFAULT_UPLOAD_PREFIX,
};
use crate::error::ConfigError;
use crate::storage_types::StorageBackend;

/// Thumbnail generation and key-routing settings.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub thumbnail_width: u32,
    pub thumbnail_height: u32,
    pub upload_prefix: String,
    pub thumbnail_prefix: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            thumbnail_width: DEFAULT_THUMBNAIL_WIDTH,
            thumbnail_height: DEFAULT_THUMBNAIL_HEIGHT,
            upload_prefix: DEFAULT_UPLOAD_PREFIX.to_string(),
            thumbnail_prefix: DEFAULT_THUMBNAIL_PREFIX.to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Self {
        Self {
            thumbnail_width: env::var("THUMBNAIL_WIDTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_THUMBNAIL_WIDTH),
            thumbnail_height: env::var("THUMBNAIL_HEIGHT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_THUMBNAIL_HEIGHT),
            upload_prefix: env::var("UPLOAD_PREFIX")
                .unwrap_or_else(|_| DEFAULT_UPLOAD_PREFIX.to_string()),
            thumbnail_prefix: env::var("THUMBNAIL_PREFIX")
                .unwrap_or_else(|_| DEFAULT_THUMBNAIL_PREFIX.to_string()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thumbnail_width == 0 || self.thumbnail_height == 0 {
            return Err(ConfigError::Invalid {
                field: "thumbnail dimensions",
                reason: format!(
                    "{}x{} must both be non-zero",
                    self.thumbnail_width, self.thumbnail_height
                ),
            });
        }
        for (field, prefix) in [
            ("UPLOAD_PREFIX", &self.upload_prefix),
            ("THUMBNAIL_PREFIX", &self.thumbnail_prefix),
        ] {
            if prefix.is_empty() || !prefix.ends_with('/') {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("prefix {:?} must be non-empty and end with '/'", prefix),
                });
            }
        }
        if self.upload_prefix == self.thumbnail_prefix {
            return Err(ConfigError::Invalid {
                field: "THUMBNAIL_PREFIX",
                reason: "thumbnail prefix must differ from upload prefix".to_string(),
            });
        }
        Ok(())
    }
}

/// Object-store backend settings.
#[derive(Clone, Debug, Default)]
pub struct StorageConfig {
    pub backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub local_storage_path: Option<String>,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self {
            backend: env::var("STORAGE_BACKEND")
                .ok()
                .and_then(|v| v.parse().ok()),
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.backend.unwrap_or(StorageBackend::S3) {
            StorageBackend::S3 => {
                if self.s3_bucket.as_deref().unwrap_or("").is_empty() {
                    return Err(ConfigError::Missing("S3_BUCKET"));
                }
                if self.s3_region.as_deref().unwrap_or("").is_empty() {
                    return Err(ConfigError::Missing("S3_REGION or AWS_REGION"));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.as_deref().unwrap_or("").is_empty() {
                    return Err(ConfigError::Missing("LOCAL_STORAGE_PATH"));
                }
            }
        }
        Ok(())
    }
}

/// Catalog store settings. Table identities come from the hosting environment;
/// both are required and must be plain SQL identifiers.
#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub database_url: String,
    pub image_table: String,
    pub gallery_image_table: String,
}

impl CatalogConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            image_table: env::var("IMAGE_TABLE_NAME")
                .map_err(|_| ConfigError::Missing("IMAGE_TABLE_NAME"))?,
            gallery_image_table: env::var("GALLERY_IMAGE_TABLE_NAME")
                .map_err(|_| ConfigError::Missing("GALLERY_IMAGE_TABLE_NAME"))?,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.is_empty() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        for (field, table) in [
            ("IMAGE_TABLE_NAME", &self.image_table),
            ("GALLERY_IMAGE_TABLE_NAME", &self.gallery_image_table),
        ] {
            if !is_sql_identifier(table) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{:?} is not a valid table identifier", table),
                });
            }
        }
        Ok(())
    }
}

/// Complete application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub pipeline: PipelineConfig,
    pub storage: StorageConfig,
    pub catalog: CatalogConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            pipeline: PipelineConfig::from_env(),
            storage: StorageConfig::from_env(),
            catalog: CatalogConfig::from_env()?,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pipeline.validate()?;
        self.storage.validate()?;
        self.catalog.validate()?;
        Ok(())
    }
}

/// True when `s` is safe to interpolate as an unquoted table name.
pub fn is_sql_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

//! Error types module
//!
//! Configuration validation errors are surfaced at startup via [`ConfigError`].
//! Per-reference processing failures use [`PipelineError`]; these are caught
//! and logged by the orchestrator, never propagated to fail a batch.

use thiserror::Error;

/// Startup configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Failure taxonomy for processing a single object reference.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Decode failed: {0}")]
    Decode(String),

    #[error("Render failed: {0}")]
    Render(String),

    #[error("Thumbnail store write failed: {0}")]
    StoreWrite(String),

    #[error("Catalog not configured: {0}")]
    CatalogConfig(String),

    #[error("Catalog write failed: {0}")]
    CatalogWrite(String),
}

impl PipelineError {
    /// Machine-readable failure kind, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Fetch(_) => "fetch_error",
            PipelineError::Decode(_) => "decode_error",
            PipelineError::Render(_) => "render_error",
            PipelineError::StoreWrite(_) => "store_write_error",
            PipelineError::CatalogConfig(_) => "catalog_config_error",
            PipelineError::CatalogWrite(_) => "catalog_write_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds_are_stable() {
        assert_eq!(PipelineError::Fetch("x".into()).kind(), "fetch_error");
        assert_eq!(PipelineError::Decode("x".into()).kind(), "decode_error");
        assert_eq!(
            PipelineError::StoreWrite("x".into()).kind(),
            "store_write_error"
        );
    }

    #[test]
    fn messages_carry_detail() {
        let err = PipelineError::Fetch("object missing".into());
        assert_eq!(err.to_string(), "Fetch failed: object missing");
    }
}

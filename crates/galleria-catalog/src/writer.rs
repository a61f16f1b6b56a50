//! Catalog writer trait.

use async_trait::async_trait;
use galleria_core::models::NewImage;
use galleria_core::PipelineError;
use thiserror::Error;
use uuid::Uuid;

/// Catalog operation errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog not configured: {0}")]
    NotConfigured(String),

    #[error("Catalog write failed: {0}")]
    WriteFailed(String),
}

impl From<CatalogError> for PipelineError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotConfigured(detail) => PipelineError::CatalogConfig(detail),
            CatalogError::WriteFailed(detail) => PipelineError::CatalogWrite(detail),
        }
    }
}

/// Append-only catalog writer.
///
/// Both operations fail independently; an association failure never rolls
/// back the image record. The orchestrator treats any error as a soft
/// failure: it logs, records an absent image id, and moves on.
#[async_trait]
pub trait CatalogWriter: Send + Sync {
    /// Insert an image record, generating its id and a single timestamp
    /// instant for the uploaded/created/updated columns.
    async fn create_image(&self, image: NewImage) -> Result<Uuid, CatalogError>;

    /// Link an image to a gallery. Only called when `create_image` yielded
    /// an id and the upload annotations carried a gallery id.
    async fn create_association(
        &self,
        gallery_id: &str,
        image_id: Uuid,
        display_order: Option<i32>,
    ) -> Result<Uuid, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_errors_map_to_pipeline_kinds() {
        let err: PipelineError = CatalogError::NotConfigured("IMAGE_TABLE_NAME".into()).into();
        assert_eq!(err.kind(), "catalog_config_error");

        let err: PipelineError = CatalogError::WriteFailed("connection reset".into()).into();
        assert_eq!(err.kind(), "catalog_write_error");
        assert_eq!(err.to_string(), "Catalog write failed: connection reset");
    }
}

//! Upload ingestion orchestrator.
//!
//! Drives one notification batch through the pipeline: filter, fetch,
//! extract, render, store, catalog. Records are processed sequentially and
//! in isolation; one record's failure never aborts the batch, and the
//! acknowledgment shape is identical regardless of per-record outcomes.

use std::collections::HashMap;
use std::sync::Arc;

use galleria_catalog::CatalogWriter;
use galleria_core::constants::IMAGE_MIME_PREFIX;
use galleria_core::models::NewImage;
use galleria_core::{ConfigError, PipelineConfig, PipelineError};
use galleria_processing::annotations::{self, NormalizedAnnotation};
use galleria_processing::metadata::ImageMetadata;
use galleria_processing::{MetadataExtractor, ThumbnailRenderer};
use galleria_storage::{keys, ObjectStore, StoredObject};
use tracing::{info, warn};

use crate::event::{AckResponse, NotificationBatch, ObjectRef};
use crate::outcome::{BatchReport, IngestOutcome, SkipReason};

/// Annotation keys written onto generated thumbnails.
const ANNOTATION_ORIGINAL_KEY: &str = "original-key";
const ANNOTATION_WIDTH: &str = "width";
const ANNOTATION_HEIGHT: &str = "height";
const ANNOTATION_GALLERY_ID: &str = "galleryid";
const ANNOTATION_TITLE: &str = "title";
const ANNOTATION_DESCRIPTION: &str = "description";

pub struct Orchestrator {
    config: PipelineConfig,
    store: Arc<dyn ObjectStore>,
    catalog: Arc<dyn CatalogWriter>,
    renderer: ThumbnailRenderer,
}

impl Orchestrator {
    pub fn new(
        config: PipelineConfig,
        store: Arc<dyn ObjectStore>,
        catalog: Arc<dyn CatalogWriter>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let renderer = ThumbnailRenderer::new(config.thumbnail_width, config.thumbnail_height);
        Ok(Self {
            config,
            store,
            catalog,
            renderer,
        })
    }

    /// Process a batch and acknowledge. The response never leaks per-record
    /// outcomes; callers wanting those use [`handle_with_report`].
    ///
    /// [`handle_with_report`]: Orchestrator::handle_with_report
    pub async fn handle(&self, batch: NotificationBatch) -> AckResponse {
        let _ = self.handle_with_report(batch).await;
        AckResponse::completed()
    }

    /// Process a batch sequentially, returning per-record outcomes.
    pub async fn handle_with_report(&self, batch: NotificationBatch) -> BatchReport {
        let mut report = BatchReport::default();
        for record in batch.records {
            let outcome = self.process_record(&record).await;
            match &outcome {
                IngestOutcome::Completed {
                    image_id,
                    thumbnail_key,
                    linked,
                } => info!(
                    key = %record.key,
                    thumbnail_key = %thumbnail_key,
                    image_id = ?image_id,
                    linked = linked,
                    "record processed"
                ),
                IngestOutcome::Skipped(reason) => {
                    info!(key = %record.key, reason = reason.as_str(), "record skipped")
                }
                IngestOutcome::Failed(err) => {
                    warn!(key = %record.key, kind = err.kind(), error = %err, "record failed")
                }
            }
            report.outcomes.push((record, outcome));
        }
        info!(
            completed = report.completed(),
            skipped = report.skipped(),
            failed = report.failed(),
            "batch done"
        );
        report
    }

    /// Run one record through the full pipeline.
    async fn process_record(&self, record: &ObjectRef) -> IngestOutcome {
        // Prefix filters run before any fetch so our own thumbnail writes
        // never re-enter the pipeline.
        if record.key.starts_with(&self.config.thumbnail_prefix) {
            return IngestOutcome::Skipped(SkipReason::ThumbnailPrefix);
        }
        if !record.key.starts_with(&self.config.upload_prefix) {
            return IngestOutcome::Skipped(SkipReason::OutsideUploadPrefix);
        }

        let object = match self.store.get(&record.container, &record.key).await {
            Ok(object) => object,
            Err(err) => return IngestOutcome::Failed(PipelineError::Fetch(err.to_string())),
        };

        if !object.content_type.starts_with(IMAGE_MIME_PREFIX) {
            return IngestOutcome::Skipped(SkipReason::NotAnImage {
                content_type: object.content_type,
            });
        }

        let normalized = annotations::normalize(&object.annotations);

        let (metadata, thumbnail_bytes) = match self.decode_and_render(&object).await {
            Ok(pair) => pair,
            Err(err) => return IngestOutcome::Failed(err),
        };

        let thumbnail_key = keys::thumbnail_key(
            &record.key,
            &self.config.upload_prefix,
            &self.config.thumbnail_prefix,
        );
        let thumbnail_annotations = self.thumbnail_annotations(&record.key, &normalized);

        if let Err(err) = self
            .store
            .put(
                &record.container,
                &thumbnail_key,
                thumbnail_bytes.to_vec(),
                &object.content_type,
                &thumbnail_annotations,
            )
            .await
        {
            // Without a stored thumbnail there is nothing to catalog.
            return IngestOutcome::Failed(PipelineError::StoreWrite(err.to_string()));
        }

        let (image_id, linked) = self
            .catalog_record(record, &object, &metadata, &normalized, &thumbnail_key)
            .await;

        IngestOutcome::Completed {
            image_id,
            thumbnail_key,
            linked,
        }
    }

    /// Decode for metadata and render the thumbnail on a blocking thread.
    async fn decode_and_render(
        &self,
        object: &StoredObject,
    ) -> Result<(ImageMetadata, bytes::Bytes), PipelineError> {
        let data = object.bytes.clone();
        let content_type = object.content_type.clone();
        let renderer = self.renderer.clone();

        tokio::task::spawn_blocking(move || {
            let metadata = MetadataExtractor::extract(&data)
                .map_err(|e| PipelineError::Decode(e.to_string()))?;
            let thumbnail = renderer
                .render(&data, &content_type)
                .map_err(|e| PipelineError::Render(e.to_string()))?;
            Ok((metadata, thumbnail))
        })
        .await
        .map_err(|e| PipelineError::Render(format!("render task panicked: {e}")))?
    }

    /// Annotations for the generated thumbnail: provenance and dimensions,
    /// the canonical upload annotations when present, and any unrecognized
    /// upload annotations passed through unchanged.
    fn thumbnail_annotations(
        &self,
        source_key: &str,
        normalized: &NormalizedAnnotation,
    ) -> HashMap<String, String> {
        let mut out: HashMap<String, String> = normalized.overflow.clone();
        out.insert(ANNOTATION_ORIGINAL_KEY.to_string(), source_key.to_string());
        out.insert(
            ANNOTATION_WIDTH.to_string(),
            self.config.thumbnail_width.to_string(),
        );
        out.insert(
            ANNOTATION_HEIGHT.to_string(),
            self.config.thumbnail_height.to_string(),
        );
        if let Some(gallery_id) = &normalized.gallery_id {
            out.insert(ANNOTATION_GALLERY_ID.to_string(), gallery_id.clone());
        }
        if let Some(title) = &normalized.title {
            out.insert(ANNOTATION_TITLE.to_string(), title.clone());
        }
        if let Some(description) = &normalized.description {
            out.insert(ANNOTATION_DESCRIPTION.to_string(), description.clone());
        }
        out
    }

    /// Write the image record and, when possible, its gallery association.
    /// Catalog failures are soft: they are logged and leave the thumbnail
    /// in place with no catalog entry.
    async fn catalog_record(
        &self,
        record: &ObjectRef,
        object: &StoredObject,
        metadata: &ImageMetadata,
        normalized: &NormalizedAnnotation,
        thumbnail_key: &str,
    ) -> (Option<uuid::Uuid>, bool) {
        let file_name = normalized
            .file_name
            .clone()
            .unwrap_or_else(|| keys::file_name_from_key(&record.key).to_string());

        let new_image = NewImage {
            // Untitled uploads take the filename as their title.
            title: normalized.title.clone().unwrap_or_else(|| file_name.clone()),
            description: normalized.description.clone().unwrap_or_default(),
            file_name,
            content_type: object.content_type.clone(),
            source_key: record.key.clone(),
            thumbnail_key: thumbnail_key.to_string(),
            width: metadata.width as i32,
            height: metadata.height as i32,
            file_size: metadata.byte_size as i64,
            capture_metadata: metadata.capture_json(),
        };

        let image_id = match self.catalog.create_image(new_image).await {
            Ok(id) => Some(id),
            Err(err) => {
                let err = PipelineError::from(err);
                warn!(key = %record.key, kind = err.kind(), error = %err, "image record not cataloged");
                None
            }
        };

        let linked = match (&normalized.gallery_id, image_id) {
            (Some(gallery_id), Some(image_id)) => {
                match self
                    .catalog
                    .create_association(gallery_id, image_id, None)
                    .await
                {
                    Ok(_) => true,
                    Err(err) => {
                        let err = PipelineError::from(err);
                        warn!(
                            key = %record.key,
                            gallery_id = %gallery_id,
                            kind = err.kind(),
                            error = %err,
                            "gallery association not cataloged"
                        );
                        false
                    }
                }
            }
            _ => false,
        };

        (image_id, linked)
    }
}

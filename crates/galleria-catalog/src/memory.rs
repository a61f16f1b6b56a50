//! In-memory catalog writer.
//!
//! Backs integration tests and local runs without a database. Records are
//! appended to Vecs the same way the Postgres writer appends rows; a fail
//! switch lets tests exercise the soft-failure path.

use async_trait::async_trait;
use chrono::Utc;
use galleria_core::models::{GalleryImageRecord, ImageRecord, NewImage};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use crate::writer::{CatalogError, CatalogWriter};

#[derive(Default)]
pub struct MemoryCatalog {
    images: Mutex<Vec<ImageRecord>>,
    associations: Mutex<Vec<GalleryImageRecord>>,
    fail_writes: AtomicBool,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail, simulating a catalog outage.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn images(&self) -> Vec<ImageRecord> {
        self.images.lock().unwrap().clone()
    }

    pub fn associations(&self) -> Vec<GalleryImageRecord> {
        self.associations.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogWriter for MemoryCatalog {
    async fn create_image(&self, image: NewImage) -> Result<Uuid, CatalogError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CatalogError::WriteFailed("simulated failure".to_string()));
        }

        let id = Uuid::new_v4();
        let now = Utc::now();
        self.images.lock().unwrap().push(ImageRecord {
            id,
            title: image.title,
            description: image.description,
            file_name: image.file_name,
            uploaded_at: now,
            created_at: now,
            updated_at: now,
            content_type: image.content_type,
            source_key: image.source_key,
            thumbnail_key: image.thumbnail_key,
            width: image.width,
            height: image.height,
            file_size: image.file_size,
            capture_metadata: image.capture_metadata,
        });
        Ok(id)
    }

    async fn create_association(
        &self,
        gallery_id: &str,
        image_id: Uuid,
        display_order: Option<i32>,
    ) -> Result<Uuid, CatalogError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CatalogError::WriteFailed("simulated failure".to_string()));
        }

        let id = Uuid::new_v4();
        let now = Utc::now();
        self.associations.lock().unwrap().push(GalleryImageRecord {
            id,
            gallery_id: gallery_id.to_string(),
            image_id,
            added_at: now,
            created_at: now,
            updated_at: now,
            display_order,
        });
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_image(source_key: &str) -> NewImage {
        NewImage {
            title: "Sunset".to_string(),
            description: String::new(),
            file_name: "sunset.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            source_key: source_key.to_string(),
            thumbnail_key: source_key.replacen("uploads/", "thumbnails/", 1),
            width: 800,
            height: 600,
            file_size: 12345,
            capture_metadata: serde_json::json!({}),
        }
    }

    #[tokio::test]
    async fn create_image_generates_ids_and_timestamps() {
        let catalog = MemoryCatalog::new();
        let id = catalog
            .create_image(new_image("uploads/sunset.jpg"))
            .await
            .unwrap();

        let images = catalog.images();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].id, id);
        assert_eq!(images[0].uploaded_at, images[0].created_at);
        assert_eq!(images[0].created_at, images[0].updated_at);
    }

    #[tokio::test]
    async fn repeat_inserts_are_append_only() {
        let catalog = MemoryCatalog::new();
        let first = catalog
            .create_image(new_image("uploads/sunset.jpg"))
            .await
            .unwrap();
        let second = catalog
            .create_image(new_image("uploads/sunset.jpg"))
            .await
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(catalog.images().len(), 2);
    }

    #[tokio::test]
    async fn fail_switch_produces_write_errors() {
        let catalog = MemoryCatalog::new();
        catalog.set_fail_writes(true);
        let result = catalog.create_image(new_image("uploads/sunset.jpg")).await;
        assert!(matches!(result, Err(CatalogError::WriteFailed(_))));
        assert!(catalog.images().is_empty());
    }

    #[tokio::test]
    async fn association_links_gallery_and_image() {
        let catalog = MemoryCatalog::new();
        let image_id = catalog
            .create_image(new_image("uploads/sunset.jpg"))
            .await
            .unwrap();
        catalog
            .create_association("g1", image_id, None)
            .await
            .unwrap();

        let associations = catalog.associations();
        assert_eq!(associations.len(), 1);
        assert_eq!(associations[0].gallery_id, "g1");
        assert_eq!(associations[0].image_id, image_id);
        assert_eq!(associations[0].display_order, None);
    }
}

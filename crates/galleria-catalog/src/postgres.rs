//! Postgres catalog writer.
//!
//! Table names come from configuration and are interpolated into the insert
//! statements, so they are validated as plain SQL identifiers at
//! construction; a malformed name is a typed startup error, not a per-call
//! soft failure.

use async_trait::async_trait;
use chrono::Utc;
use galleria_core::config::is_sql_identifier;
use galleria_core::models::NewImage;
use galleria_core::{CatalogConfig, ConfigError};
use sqlx::PgPool;
use uuid::Uuid;

use crate::writer::{CatalogError, CatalogWriter};

#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
    insert_image_sql: String,
    insert_association_sql: String,
}

impl PgCatalog {
    pub fn new(pool: PgPool, config: &CatalogConfig) -> Result<Self, ConfigError> {
        for (field, table) in [
            ("IMAGE_TABLE_NAME", &config.image_table),
            ("GALLERY_IMAGE_TABLE_NAME", &config.gallery_image_table),
        ] {
            if !is_sql_identifier(table) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{:?} is not a valid table identifier", table),
                });
            }
        }

        Ok(Self {
            pool,
            insert_image_sql: build_insert_image_sql(&config.image_table),
            insert_association_sql: build_insert_association_sql(&config.gallery_image_table),
        })
    }
}

fn build_insert_image_sql(table: &str) -> String {
    format!(
        r#"
        INSERT INTO {} (
            id, title, description, file_name,
            uploaded_at, created_at, updated_at,
            content_type, source_key, thumbnail_key,
            width, height, file_size, capture_metadata
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        "#,
        table
    )
}

fn build_insert_association_sql(table: &str) -> String {
    format!(
        r#"
        INSERT INTO {} (
            id, gallery_id, image_id,
            added_at, created_at, updated_at, display_order
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
        table
    )
}

#[async_trait]
impl CatalogWriter for PgCatalog {
    async fn create_image(&self, image: NewImage) -> Result<Uuid, CatalogError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(&self.insert_image_sql)
            .bind(id)
            .bind(&image.title)
            .bind(&image.description)
            .bind(&image.file_name)
            .bind(now)
            .bind(now)
            .bind(now)
            .bind(&image.content_type)
            .bind(&image.source_key)
            .bind(&image.thumbnail_key)
            .bind(image.width)
            .bind(image.height)
            .bind(image.file_size)
            .bind(&image.capture_metadata)
            .execute(&self.pool)
            .await
            .map_err(|e| CatalogError::WriteFailed(e.to_string()))?;

        tracing::info!(
            image_id = %id,
            source_key = %image.source_key,
            "Image record created"
        );

        Ok(id)
    }

    async fn create_association(
        &self,
        gallery_id: &str,
        image_id: Uuid,
        display_order: Option<i32>,
    ) -> Result<Uuid, CatalogError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(&self.insert_association_sql)
            .bind(id)
            .bind(gallery_id)
            .bind(image_id)
            .bind(now)
            .bind(now)
            .bind(now)
            .bind(display_order)
            .execute(&self.pool)
            .await
            .map_err(|e| CatalogError::WriteFailed(e.to_string()))?;

        tracing::info!(
            association_id = %id,
            gallery_id = gallery_id,
            image_id = %image_id,
            "Gallery association created"
        );

        Ok(id)
    }
}

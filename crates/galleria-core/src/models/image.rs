use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

/// Catalog image record. Created exactly once per successfully processed
/// upload; never mutated by the pipeline afterwards (later edits are a
/// UI-layer concern).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct ImageRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub content_type: String,
    pub source_key: String,
    pub thumbnail_key: String,
    pub width: i32,
    pub height: i32,
    pub file_size: i64,
    /// Serialized capture metadata (EXIF); `{}` when the source carried none.
    pub capture_metadata: JsonValue,
}

/// Fields the pipeline supplies for a new image record. The catalog writer
/// generates the id and a single timestamp instant for the created/updated/
/// uploaded columns.
#[derive(Debug, Clone)]
pub struct NewImage {
    pub title: String,
    pub description: String,
    pub file_name: String,
    pub content_type: String,
    pub source_key: String,
    pub thumbnail_key: String,
    pub width: i32,
    pub height: i32,
    pub file_size: i64,
    pub capture_metadata: JsonValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_record_serde_round_trip() {
        let now = Utc::now();
        let record = ImageRecord {
            id: Uuid::new_v4(),
            title: "Sunset".to_string(),
            description: String::new(),
            file_name: "abc-photo.jpg".to_string(),
            uploaded_at: now,
            created_at: now,
            updated_at: now,
            content_type: "image/jpeg".to_string(),
            source_key: "uploads/abc-photo.jpg".to_string(),
            thumbnail_key: "thumbnails/abc-photo.jpg".to_string(),
            width: 1920,
            height: 1080,
            file_size: 204800,
            capture_metadata: serde_json::json!({"Model": "NIKON D750"}),
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: ImageRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, record.id);
        assert_eq!(back.title, "Sunset");
        assert_eq!(back.thumbnail_key, "thumbnails/abc-photo.jpg");
        assert_eq!(back.capture_metadata["Model"], "NIKON D750");
    }
}

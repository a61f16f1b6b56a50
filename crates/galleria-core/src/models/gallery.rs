use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

/// Many-to-many link between a gallery and an image. A gallery has many
/// images and an image may belong to many galleries; `display_order` supports
/// caller-defined ordering within a gallery (unset sorts last).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct GalleryImageRecord {
    pub id: Uuid,
    pub gallery_id: String,
    pub image_id: Uuid,
    pub added_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub display_order: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn association_serde_round_trip() {
        let now = Utc::now();
        let record = GalleryImageRecord {
            id: Uuid::new_v4(),
            gallery_id: "g1".to_string(),
            image_id: Uuid::new_v4(),
            added_at: now,
            created_at: now,
            updated_at: now,
            display_order: None,
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: GalleryImageRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.gallery_id, "g1");
        assert_eq!(back.image_id, record.image_id);
        assert_eq!(back.display_order, None);
    }
}

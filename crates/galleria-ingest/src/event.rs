//! Inbound notification and acknowledgment types.

use serde::{Deserialize, Serialize};

/// One stored object: container identifier plus object key. The key uniquely
/// identifies one object within the container at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub container: String,
    pub key: String,
}

/// A batch of "object created" notifications. Records are independent and
/// processed in sequence; no ordering is guaranteed between them. Delivery
/// is push-based and at-least-once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationBatch {
    pub records: Vec<ObjectRef>,
}

/// Fixed-shape acknowledgment. Per-item outcomes are never enumerated here;
/// they are observable through logs and the internal batch report only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AckResponse {
    pub status_code: u16,
    pub body: AckBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckBody {
    pub message: String,
}

impl AckResponse {
    pub fn completed() -> Self {
        Self {
            status_code: 200,
            body: AckBody {
                message: "thumbnail generation complete".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_deserializes_from_json() {
        let json = r#"{"records":[{"container":"media","key":"uploads/a.jpg"}]}"#;
        let batch: NotificationBatch = serde_json::from_str(json).unwrap();
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].container, "media");
        assert_eq!(batch.records[0].key, "uploads/a.jpg");
    }

    #[test]
    fn ack_has_fixed_shape() {
        let ack = AckResponse::completed();
        let json = serde_json::to_value(&ack).unwrap();
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["body"]["message"], "thumbnail generation complete");
    }
}

//! Extracted image metadata types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Structural and capture metadata decoded from an image byte buffer.
///
/// Derived deterministically from the bytes and immutable once computed.
/// Numeric fields are 0 when the decoder cannot determine them; `capture`
/// is empty when the file carries no readable EXIF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub byte_size: u64,
    /// Bits per channel.
    pub color_depth: u16,
    pub color_space: String,
    pub channel_count: u8,
    pub has_alpha: bool,
    /// EXIF orientation (1-8), 0 when absent.
    pub orientation: u32,
    /// Capture metadata (camera model, exposure, ISO, ...) keyed by tag name.
    pub capture: BTreeMap<String, String>,
}

impl ImageMetadata {
    /// Capture metadata serialized for catalog persistence.
    pub fn capture_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.capture).unwrap_or_else(|_| serde_json::json!({}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_serde_round_trip() {
        let mut capture = BTreeMap::new();
        capture.insert("Model".to_string(), "NIKON D750".to_string());
        let metadata = ImageMetadata {
            width: 1920,
            height: 1080,
            format: "jpeg".to_string(),
            byte_size: 1024000,
            color_depth: 8,
            color_space: "rgb".to_string(),
            channel_count: 3,
            has_alpha: false,
            orientation: 6,
            capture,
        };

        let json = serde_json::to_string(&metadata).unwrap();
        let back: ImageMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back.width, 1920);
        assert_eq!(back.orientation, 6);
        assert_eq!(back.capture.get("Model").unwrap(), "NIKON D750");
    }

    #[test]
    fn capture_json_of_empty_map_is_empty_object() {
        let metadata = ImageMetadata {
            width: 0,
            height: 0,
            format: "unknown".to_string(),
            byte_size: 0,
            color_depth: 0,
            color_space: String::new(),
            channel_count: 0,
            has_alpha: false,
            orientation: 0,
            capture: BTreeMap::new(),
        };
        assert_eq!(metadata.capture_json(), serde_json::json!({}));
    }
}

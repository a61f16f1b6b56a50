//! Image metadata extractor.
//!
//! Decodes a byte buffer into [`ImageMetadata`]. Structural decoding failures
//! are errors; capture-metadata (EXIF) extraction is best-effort and its
//! absence or failure never fails the overall extraction.

use crate::metadata::ImageMetadata;
use image::ImageReader;
use std::collections::BTreeMap;
use std::io::Cursor;
use thiserror::Error;

/// The buffer could not be parsed as an image.
#[derive(Debug, Error)]
#[error("Unsupported image format: {0}")]
pub struct UnsupportedFormat(pub String);

pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Extract structural and capture metadata from image bytes.
    ///
    /// Does not mutate or take ownership of the input.
    pub fn extract(data: &[u8]) -> Result<ImageMetadata, UnsupportedFormat> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| UnsupportedFormat(e.to_string()))?;
        let format = reader
            .format()
            .map(|f| format!("{:?}", f).to_lowercase())
            .unwrap_or_else(|| "unknown".to_string());
        let img = reader
            .decode()
            .map_err(|e| UnsupportedFormat(e.to_string()))?;

        let width = img.width();
        let height = img.height();
        let color = img.color();
        let channel_count = color.channel_count();
        let color_depth = if channel_count > 0 {
            color.bits_per_pixel() / channel_count as u16
        } else {
            0
        };
        let color_space = if color.has_color() { "rgb" } else { "gray" };

        let (orientation, capture) = Self::read_capture_metadata(data);

        Ok(ImageMetadata {
            width,
            height,
            format,
            byte_size: data.len() as u64,
            color_depth,
            color_space: color_space.to_string(),
            channel_count,
            has_alpha: color.has_alpha(),
            orientation,
            capture,
        })
    }

    /// Read EXIF capture metadata from the primary image IFD.
    ///
    /// Returns orientation 0 and an empty map when the buffer carries no
    /// readable EXIF segment.
    fn read_capture_metadata(data: &[u8]) -> (u32, BTreeMap<String, String>) {
        let mut cursor = Cursor::new(data);
        let exif = match exif::Reader::new().read_from_container(&mut cursor) {
            Ok(exif) => exif,
            Err(e) => {
                tracing::debug!(error = %e, "No readable EXIF segment");
                return (0, BTreeMap::new());
            }
        };

        let mut capture = BTreeMap::new();
        for field in exif.fields() {
            if field.ifd_num == exif::In::PRIMARY {
                capture.insert(
                    field.tag.to_string(),
                    field.display_value().with_unit(&exif).to_string(),
                );
            }
        }

        let orientation = exif
            .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
            .and_then(|f| f.value.get_uint(0))
            .unwrap_or(0);

        (orientation, capture)
    }
}

//! Thumbnail renderer.
//!
//! Fixed-size cover fit: the source is scaled to fully cover the target box
//! preserving aspect ratio, then the overflow is cropped. The crop is
//! anchored at the top edge by default so faces and subjects near the top of
//! portrait-style photos survive the crop; the anchor is parameterizable but
//! `Top` is the default. Output encoding matches the source content type.

use bytes::Bytes;
use image::{imageops::FilterType, DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;
use thiserror::Error;

/// Thumbnail generation failed despite the bytes having decoded earlier.
#[derive(Debug, Error)]
#[error("Render failed: {0}")]
pub struct RenderError(pub String);

/// Where the cover crop is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CropAnchor {
    #[default]
    Top,
    Center,
}

/// Renders fixed-size cover-fit thumbnails.
#[derive(Debug, Clone)]
pub struct ThumbnailRenderer {
    width: u32,
    height: u32,
    anchor: CropAnchor,
}

impl ThumbnailRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            anchor: CropAnchor::Top,
        }
    }

    pub fn with_anchor(mut self, anchor: CropAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Render a thumbnail of exactly `width`×`height` from source bytes.
    ///
    /// The output is encoded in the format implied by `content_type`
    /// (JPEG when unknown, matching the upstream behavior).
    pub fn render(&self, data: &[u8], content_type: &str) -> Result<Bytes, RenderError> {
        let img = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| RenderError(e.to_string()))?
            .decode()
            .map_err(|e| RenderError(e.to_string()))?;

        let cropped = self.cover_crop(&img);

        let format = Self::detect_format(content_type);
        // JPEG has no alpha channel; flatten before encoding.
        let out = if format == ImageFormat::Jpeg {
            DynamicImage::ImageRgb8(cropped.to_rgb8())
        } else {
            cropped
        };

        let mut buffer = Vec::with_capacity(encode_capacity(self.width, self.height));
        out.write_to(&mut Cursor::new(&mut buffer), format)
            .map_err(|e| RenderError(e.to_string()))?;

        Ok(Bytes::from(buffer))
    }

    /// Scale to cover the target box, then crop at the configured anchor.
    fn cover_crop(&self, img: &DynamicImage) -> DynamicImage {
        let (w, h) = (img.width(), img.height());
        let scale = f64::max(
            self.width as f64 / w as f64,
            self.height as f64 / h as f64,
        );
        let scaled_w = ((w as f64 * scale).round() as u32).max(self.width);
        let scaled_h = ((h as f64 * scale).round() as u32).max(self.height);

        let resized = img.resize_exact(scaled_w, scaled_h, FilterType::Lanczos3);

        let x = (scaled_w - self.width) / 2;
        let y = match self.anchor {
            CropAnchor::Top => 0,
            CropAnchor::Center => (scaled_h - self.height) / 2,
        };
        resized.crop_imm(x, y, self.width, self.height)
    }

    /// Detect image format from content type
    pub fn detect_format(content_type: &str) -> ImageFormat {
        match content_type {
            "image/jpeg" | "image/jpg" => ImageFormat::Jpeg,
            "image/png" => ImageFormat::Png,
            "image/gif" => ImageFormat::Gif,
            "image/webp" => ImageFormat::WebP,
            _ => ImageFormat::Jpeg,
        }
    }
}

/// Pre-allocation hint for the encode buffer. Computed in usize so large
/// target dimensions cannot overflow 32-bit arithmetic.
fn encode_capacity(width: u32, height: u32) -> usize {
    width as usize * height as usize * 3
}

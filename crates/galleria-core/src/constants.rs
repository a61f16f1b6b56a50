//! Shared constants for the ingestion pipeline.

/// Default thumbnail width in pixels.
pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 200;

/// Default thumbnail height in pixels.
pub const DEFAULT_THUMBNAIL_HEIGHT: u32 = 200;

/// Key prefix under which freshly uploaded objects arrive.
pub const DEFAULT_UPLOAD_PREFIX: &str = "uploads/";

/// Key prefix under which generated thumbnails are written.
pub const DEFAULT_THUMBNAIL_PREFIX: &str = "thumbnails/";

/// Content types with this prefix are treated as images.
pub const IMAGE_MIME_PREFIX: &str = "image/";

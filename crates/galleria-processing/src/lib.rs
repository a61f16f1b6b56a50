//! Galleria Processing Library
//!
//! Pure image-side building blocks of the ingestion pipeline:
//! - Metadata extraction (structural + best-effort EXIF capture metadata)
//! - Annotation normalization (loosely-keyed upload annotations)
//! - Thumbnail rendering (fixed-size cover fit, top-anchored crop)
//!
//! Everything here is synchronous and CPU-bound; callers run it under
//! `tokio::task::spawn_blocking`.

pub mod annotations;
pub mod extractor;
pub mod metadata;
pub mod thumbnail;

pub use annotations::{normalize, NormalizedAnnotation};
pub use extractor::{MetadataExtractor, UnsupportedFormat};
pub use metadata::ImageMetadata;
pub use thumbnail::{CropAnchor, RenderError, ThumbnailRenderer};

//! Domain models shared across galleria components.

mod gallery;
mod image;

pub use gallery::GalleryImageRecord;
pub use image::{ImageRecord, NewImage};

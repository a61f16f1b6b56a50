//! Galleria Catalog Library
//!
//! Append-only persistence for Image and Gallery-Image association records.
//! The writer generates identifiers and timestamps; callers never supply
//! them. Table identities come from configuration and are validated as SQL
//! identifiers at construction.

pub mod memory;
pub mod postgres;
pub mod writer;

// Re-export commonly used types
pub use memory::MemoryCatalog;
pub use postgres::PgCatalog;
pub use writer::{CatalogError, CatalogWriter};

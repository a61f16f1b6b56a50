//! Galleria Ingest Library
//!
//! Consumes "object created" notification batches and runs each reference
//! through fetch → extract → render → store → catalog. Individual failures
//! are isolated: one corrupt upload never blocks the rest of the batch, and
//! the external boundary always acknowledges with a fixed-shape response.

pub mod event;
pub mod orchestrator;
pub mod outcome;

// Re-export commonly used types
pub use event::{AckResponse, NotificationBatch, ObjectRef};
pub use orchestrator::Orchestrator;
pub use outcome::{BatchReport, IngestOutcome, SkipReason};

use galleria_core::PipelineError;
use uuid::Uuid;

use crate::event::ObjectRef;

/// Why a record was skipped without processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Key already lives under the thumbnail prefix (our own output).
    ThumbnailPrefix,
    /// Key is outside the upload prefix.
    OutsideUploadPrefix,
    /// Object is not an image.
    NotAnImage { content_type: String },
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::ThumbnailPrefix => "thumbnail_prefix",
            SkipReason::OutsideUploadPrefix => "outside_upload_prefix",
            SkipReason::NotAnImage { .. } => "not_an_image",
        }
    }
}

/// Terminal state of one record.
#[derive(Debug)]
pub enum IngestOutcome {
    /// Thumbnail stored. `image_id` is present only when cataloging
    /// succeeded; `linked` is true when a gallery association was recorded.
    Completed {
        image_id: Option<Uuid>,
        thumbnail_key: String,
        linked: bool,
    },
    Skipped(SkipReason),
    Failed(PipelineError),
}

/// Per-record outcomes for a processed batch, in record order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<(ObjectRef, IngestOutcome)>,
}

impl BatchReport {
    pub fn completed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, IngestOutcome::Completed { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, IngestOutcome::Skipped(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, IngestOutcome::Failed(_)))
            .count()
    }
}

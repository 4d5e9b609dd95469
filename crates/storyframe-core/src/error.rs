//! Domain error types.

use thiserror::Error;

/// Top-level error type shared by every pipeline stage.
#[derive(Debug, Error)]
pub enum StoryboardError {
    /// The script is empty or holds only whitespace/punctuation.
    #[error("script is empty: provide at least one line of narrative text")]
    EmptyInput,

    /// A request field failed validation before reaching the pipeline.
    #[error("validation error: {0}")]
    Validation(String),

    /// Text was present but no scene boundaries could be derived.
    #[error("segmentation failure: {0}")]
    SegmentationFailure(String),

    /// Two descriptions of the same entity disagree.
    #[error("continuity conflict for {entity}: {detail}")]
    ContinuityConflict {
        /// Display name of the entity involved.
        entity: String,
        /// Human-readable description of the disagreement.
        detail: String,
    },

    /// An optional enrichment call exceeded its time budget.
    #[error("enrichment timed out after {timeout_ms}ms")]
    ExternalEnrichmentTimeout {
        /// The budget that was exceeded.
        timeout_ms: u64,
    },

    /// An optional enrichment call failed.
    #[error("enrichment failed: {0}")]
    Enrichment(String),

    /// An upstream guarantee was broken.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(String),
}

impl StoryboardError {
    /// Returns `true` for errors the caller can fix by changing the request.
    #[must_use]
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Self::EmptyInput | Self::Validation(_))
    }

    /// Returns `true` for errors the pipeline absorbs without aborting a run.
    #[must_use]
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            Self::SegmentationFailure(_)
                | Self::ContinuityConflict { .. }
                | Self::ExternalEnrichmentTimeout { .. }
                | Self::Enrichment(_)
        )
    }
}

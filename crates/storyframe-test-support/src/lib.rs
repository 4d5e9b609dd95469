//! Shared test fixtures and mock enrichers for the Storyframe storyboard
//! generator.

mod enricher;
mod fixtures;

pub use enricher::{FailingEnricher, RecordingEnricher, SlowEnricher, SuffixEnricher};
pub use fixtures::{
    AGING_SCRIPT, SCREENPLAY_SCRIPT, SINGLE_PARAGRAPH_SCRIPT, TWO_HEADER_SCRIPT, request,
    request_with,
};

//! Test enrichers — mock `Enricher` implementations for tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use storyframe_core::enrichment::{EnrichmentContext, EnrichmentField, Enricher};
use storyframe_core::error::StoryboardError;

/// An enricher that always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingEnricher;

#[async_trait]
impl Enricher for FailingEnricher {
    async fn enrich(
        &self,
        _text: &str,
        _context: &EnrichmentContext,
    ) -> Result<String, StoryboardError> {
        Err(StoryboardError::Enrichment("backend unavailable".to_owned()))
    }
}

/// An enricher that sleeps for the configured delay before echoing input.
#[derive(Debug, Clone, Copy)]
pub struct SlowEnricher(pub Duration);

#[async_trait]
impl Enricher for SlowEnricher {
    async fn enrich(
        &self,
        text: &str,
        _context: &EnrichmentContext,
    ) -> Result<String, StoryboardError> {
        tokio::time::sleep(self.0).await;
        Ok(format!("{text} (slow)"))
    }
}

/// An enricher that appends a fixed suffix.
#[derive(Debug, Clone)]
pub struct SuffixEnricher(pub String);

#[async_trait]
impl Enricher for SuffixEnricher {
    async fn enrich(
        &self,
        text: &str,
        _context: &EnrichmentContext,
    ) -> Result<String, StoryboardError> {
        Ok(format!("{text} {}", self.0))
    }
}

/// An enricher that records every call and echoes its input.
#[derive(Debug, Default)]
pub struct RecordingEnricher {
    calls: Mutex<Vec<(String, EnrichmentField, String)>>,
}

impl RecordingEnricher {
    /// Creates an enricher with no recorded calls.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of `(beat_id, field, text)` for every call.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<(String, EnrichmentField, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Enricher for RecordingEnricher {
    async fn enrich(
        &self,
        text: &str,
        context: &EnrichmentContext,
    ) -> Result<String, StoryboardError> {
        self.calls
            .lock()
            .unwrap()
            .push((context.beat_id.clone(), context.field, text.to_owned()));
        Ok(text.to_owned())
    }
}

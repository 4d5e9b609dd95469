//! Shared application state.

use std::sync::Arc;

use storyframe_core::config::PipelineConfig;
use storyframe_core::enrichment::Enricher;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Enrichment backend, shared read-only between requests.
    pub enricher: Arc<dyn Enricher>,
    /// Pipeline tuning, timeouts and concurrency cap.
    pub config: Arc<PipelineConfig>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(enricher: Arc<dyn Enricher>, config: PipelineConfig) -> Self {
        Self {
            enricher,
            config: Arc::new(config),
        }
    }
}

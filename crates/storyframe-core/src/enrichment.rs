//! Text enrichment capability.
//!
//! In production this may wrap an external text-generation backend. In
//! tests, and whenever no backend is configured, the deterministic
//! [`TemplateEnricher`] is injected instead.

use async_trait::async_trait;

use crate::error::StoryboardError;
use crate::settings::{ScriptLanguage, Tone, VisualStyle};

/// Which beat field is being enriched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentField {
    /// The narration excerpt.
    Narration,
    /// The one-line visual idea.
    VisualIdea,
}

impl EnrichmentField {
    /// Returns a short label for logs and backend instructions.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Narration => "narration",
            Self::VisualIdea => "visual_idea",
        }
    }
}

/// Context handed to the enricher alongside the text.
#[derive(Debug, Clone)]
pub struct EnrichmentContext {
    /// Beat being enriched.
    pub beat_id: String,
    /// Field being enriched.
    pub field: EnrichmentField,
    /// Title of the enclosing scene.
    pub scene_title: String,
    /// Script language; output must stay in it.
    pub language: ScriptLanguage,
    /// Requested visual style.
    pub visual_style: VisualStyle,
    /// Requested tone.
    pub tone: Tone,
}

/// Abstraction over narration/visual-idea enrichment.
///
/// Callers bound every call with a timeout and treat any error as a soft
/// failure, keeping the original text.
#[async_trait]
pub trait Enricher: Send + Sync {
    /// Returns an enriched rendition of `text`.
    async fn enrich(
        &self,
        text: &str,
        context: &EnrichmentContext,
    ) -> Result<String, StoryboardError>;

    /// Returns `false` when the enricher never changes its input, letting
    /// callers skip scheduling work for it.
    fn is_active(&self) -> bool {
        true
    }
}

/// Deterministic enricher that returns the template text unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateEnricher;

#[async_trait]
impl Enricher for TemplateEnricher {
    async fn enrich(
        &self,
        text: &str,
        _context: &EnrichmentContext,
    ) -> Result<String, StoryboardError> {
        Ok(text.to_owned())
    }

    fn is_active(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_template_enricher_returns_input_unchanged() {
        // Arrange
        let context = EnrichmentContext {
            beat_id: "scene-1.1".to_owned(),
            field: EnrichmentField::Narration,
            scene_title: "Kitchen".to_owned(),
            language: ScriptLanguage::En,
            visual_style: VisualStyle::Sketch,
            tone: Tone::Neutral,
        };

        // Act
        let result = TemplateEnricher.enrich("Maria waits.", &context).await;

        // Assert
        assert_eq!(result.unwrap(), "Maria waits.");
        assert!(!TemplateEnricher.is_active());
    }
}

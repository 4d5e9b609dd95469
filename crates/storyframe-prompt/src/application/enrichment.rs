//! Optional, bounded enrichment of composed beats.
//!
//! Every narration and visual idea is handed to the enricher on a
//! [`JoinSet`], capped by a semaphore and bounded by a per-call timeout.
//! Any failure keeps the template text.

use std::sync::Arc;
use std::time::Duration;

use storyframe_core::config::PipelineConfig;
use storyframe_core::enrichment::{EnrichmentContext, EnrichmentField, Enricher};
use storyframe_core::error::StoryboardError;
use storyframe_core::settings::{ScriptLanguage, Tone, VisualStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::compose::ComposedScene;

/// Request settings passed to the enricher with every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichmentSettings {
    /// Script language.
    pub language: ScriptLanguage,
    /// Requested visual style.
    pub visual_style: VisualStyle,
    /// Requested tone.
    pub tone: Tone,
}

struct Completed {
    scene: usize,
    beat: usize,
    field: EnrichmentField,
    result: Result<String, StoryboardError>,
}

async fn enrich_one(
    enricher: Arc<dyn Enricher>,
    semaphore: Arc<Semaphore>,
    text: String,
    context: EnrichmentContext,
    timeout: Duration,
) -> Result<String, StoryboardError> {
    let _permit = semaphore
        .acquire_owned()
        .await
        .map_err(|e| StoryboardError::Enrichment(e.to_string()))?;
    match tokio::time::timeout(timeout, enricher.enrich(&text, &context)).await {
        Ok(result) => result,
        Err(_) => Err(StoryboardError::ExternalEnrichmentTimeout {
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}

/// Rewrites narration and visual ideas through `enricher`.
///
/// Returns the number of fields that were replaced. Inactive enrichers are
/// skipped without scheduling any work.
pub async fn enrich_scenes(
    scenes: &mut [ComposedScene],
    enricher: Arc<dyn Enricher>,
    settings: EnrichmentSettings,
    config: &PipelineConfig,
) -> usize {
    if !enricher.is_active() {
        return 0;
    }

    let semaphore = Arc::new(Semaphore::new(config.compose_concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for (scene_index, scene) in scenes.iter().enumerate() {
        for (beat_index, composed) in scene.beats.iter().enumerate() {
            let fields = [
                (EnrichmentField::Narration, composed.beat.narration.clone()),
                (EnrichmentField::VisualIdea, composed.beat.visual_idea.clone()),
            ];
            for (field, text) in fields {
                let context = EnrichmentContext {
                    beat_id: composed.beat.beat_id.clone(),
                    field,
                    scene_title: scene.title.clone(),
                    language: settings.language,
                    visual_style: settings.visual_style,
                    tone: settings.tone,
                };
                let enricher = Arc::clone(&enricher);
                let semaphore = Arc::clone(&semaphore);
                let timeout = config.enrichment_timeout;
                tasks.spawn(async move {
                    let result = enrich_one(enricher, semaphore, text, context, timeout).await;
                    Completed {
                        scene: scene_index,
                        beat: beat_index,
                        field,
                        result,
                    }
                });
            }
        }
    }

    let mut replaced = 0;
    while let Some(joined) = tasks.join_next().await {
        let completed = match joined {
            Ok(completed) => completed,
            Err(e) => {
                warn!(error = %e, "enrichment task failed");
                continue;
            }
        };
        let Some(composed) = scenes
            .get_mut(completed.scene)
            .and_then(|scene| scene.beats.get_mut(completed.beat))
        else {
            continue;
        };
        match completed.result {
            Ok(text) if !text.trim().is_empty() => {
                let text = text.trim().to_owned();
                match completed.field {
                    EnrichmentField::Narration => composed.set_narration(text),
                    EnrichmentField::VisualIdea => composed.set_visual_idea(text),
                }
                replaced += 1;
            }
            Ok(_) => {
                debug!(
                    beat_id = %composed.beat.beat_id,
                    field = completed.field.as_str(),
                    "empty enrichment ignored"
                );
            }
            Err(e) => {
                warn!(
                    beat_id = %composed.beat.beat_id,
                    field = completed.field.as_str(),
                    error = %e,
                    "enrichment failed, keeping template text"
                );
            }
        }
    }
    replaced
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use storyframe_continuity::application::tracker::track;
    use storyframe_core::config::PipelineTuning;
    use storyframe_core::enrichment::TemplateEnricher;
    use storyframe_core::settings::ShotPreference;
    use storyframe_script::application::decompose::decompose;
    use storyframe_script::domain::document::ScriptDocument;

    use super::*;
    use crate::application::compose::compose_scenes;
    use crate::domain::composer::ComposeSettings;

    const SCRIPT: &str = "Maria enters the old kitchen. She lights a candle.\n\n\
                          João waits outside in the rain.";

    fn composed() -> Vec<ComposedScene> {
        let tuning = PipelineTuning::default();
        let document = ScriptDocument::new(
            "Test".to_owned(),
            SCRIPT.to_owned(),
            ScriptLanguage::En,
            VisualStyle::Anime,
            Tone::Neutral,
            ShotPreference::Balanced,
            None,
        );
        let drafts = decompose(&document, &tuning);
        let outcome = track(&drafts, None, &tuning);
        compose_scenes(
            &drafts,
            &outcome.scenes,
            ComposeSettings {
                visual_style: VisualStyle::Anime,
                tone: Tone::Neutral,
                shot_preference: ShotPreference::Balanced,
            },
        )
        .unwrap()
    }

    fn settings() -> EnrichmentSettings {
        EnrichmentSettings {
            language: ScriptLanguage::En,
            visual_style: VisualStyle::Anime,
            tone: Tone::Neutral,
        }
    }

    struct Upper;

    #[async_trait]
    impl Enricher for Upper {
        async fn enrich(
            &self,
            text: &str,
            _context: &EnrichmentContext,
        ) -> Result<String, StoryboardError> {
            Ok(text.to_uppercase())
        }
    }

    struct Stalled;

    #[async_trait]
    impl Enricher for Stalled {
        async fn enrich(
            &self,
            text: &str,
            _context: &EnrichmentContext,
        ) -> Result<String, StoryboardError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(text.to_owned())
        }
    }

    struct Concurrency {
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl Enricher for Concurrency {
        async fn enrich(
            &self,
            text: &str,
            _context: &EnrichmentContext,
        ) -> Result<String, StoryboardError> {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.current.fetch_sub(1, Ordering::SeqCst);
            Ok(text.to_owned())
        }
    }

    #[tokio::test]
    async fn test_successful_enrichment_rewrites_fields_and_prompt() {
        // Arrange
        let mut scenes = composed();
        let beats: usize = scenes.iter().map(|s| s.beats.len()).sum();

        // Act
        let replaced =
            enrich_scenes(&mut scenes, Arc::new(Upper), settings(), &PipelineConfig::default())
                .await;

        // Assert
        assert_eq!(replaced, beats * 2);
        let beat = &scenes[0].beats[0].beat;
        assert_eq!(beat.narration, beat.narration.to_uppercase());
        assert!(beat.prompt.starts_with(&beat.visual_idea));
    }

    #[tokio::test]
    async fn test_timeout_keeps_template_text() {
        // Arrange
        let mut scenes = composed();
        let original = scenes.clone();
        let config = PipelineConfig {
            enrichment_timeout: Duration::from_millis(20),
            ..PipelineConfig::default()
        };

        // Act
        let replaced = enrich_scenes(&mut scenes, Arc::new(Stalled), settings(), &config).await;

        // Assert
        assert_eq!(replaced, 0);
        assert_eq!(scenes, original);
    }

    #[tokio::test]
    async fn test_inactive_enricher_is_skipped() {
        let mut scenes = composed();
        let original = scenes.clone();

        let replaced = enrich_scenes(
            &mut scenes,
            Arc::new(TemplateEnricher),
            settings(),
            &PipelineConfig::default(),
        )
        .await;

        assert_eq!(replaced, 0);
        assert_eq!(scenes, original);
    }

    #[tokio::test]
    async fn test_concurrency_is_capped() {
        // Arrange
        let mut scenes = composed();
        let enricher = Arc::new(Concurrency {
            current: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let config = PipelineConfig {
            compose_concurrency: 2,
            ..PipelineConfig::default()
        };

        // Act
        enrich_scenes(&mut scenes, enricher.clone(), settings(), &config).await;

        // Assert
        assert!(enricher.peak.load(Ordering::SeqCst) <= 2);
        assert!(enricher.peak.load(Ordering::SeqCst) >= 1);
    }
}

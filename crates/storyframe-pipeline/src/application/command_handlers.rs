//! Command handlers for the storyboard pipeline.
//!
//! The handler runs every stage in strict sequence for one request. Nothing
//! is shared between requests except the read-only enricher.

use std::sync::Arc;

use storyframe_continuity::application::tracker::track;
use storyframe_core::config::PipelineConfig;
use storyframe_core::enrichment::Enricher;
use storyframe_core::error::StoryboardError;
use storyframe_core::storyboard::StoryboardResponse;
use storyframe_prompt::application::compose::compose_scenes;
use storyframe_prompt::application::enrichment::{EnrichmentSettings, enrich_scenes};
use storyframe_prompt::domain::composer::ComposeSettings;
use storyframe_script::application::decompose::decompose;
use storyframe_script::domain::normalizer::normalize_request;
use tracing::{info, instrument};

use crate::domain::assembler::assemble;
use crate::domain::auditor::audit;
use crate::domain::commands::GenerateStoryboard;

/// Handles the `GenerateStoryboard` command: normalizes the script,
/// decomposes it into scenes and beats, tracks continuity, composes and
/// optionally enriches prompts, audits and assembles the response.
///
/// # Errors
///
/// Returns `StoryboardError::EmptyInput` if the script is blank, or
/// `StoryboardError::InternalInvariantViolation` if a stage breaks an
/// invariant. Segmentation, continuity and enrichment problems degrade
/// instead of failing.
#[instrument(skip(command, enricher, config), fields(correlation_id = %command.correlation_id))]
pub async fn handle_generate_storyboard(
    command: &GenerateStoryboard,
    enricher: Arc<dyn Enricher>,
    config: &PipelineConfig,
) -> Result<StoryboardResponse, StoryboardError> {
    let document = normalize_request(&command.request)?;

    let drafts = decompose(&document, &config.tuning);
    if drafts.is_empty() {
        return Err(StoryboardError::InternalInvariantViolation(
            "decomposition produced no scenes".to_owned(),
        ));
    }

    let outcome = track(&drafts, document.character_guide(), &config.tuning);

    let mut scenes = compose_scenes(
        &drafts,
        &outcome.scenes,
        ComposeSettings {
            visual_style: document.visual_style(),
            tone: document.tone(),
            shot_preference: document.shot_preference(),
        },
    )?;

    let enriched = enrich_scenes(
        &mut scenes,
        enricher,
        EnrichmentSettings {
            language: document.language(),
            visual_style: document.visual_style(),
            tone: document.tone(),
        },
        config,
    )
    .await;

    let notes = audit(&scenes, &outcome.registry)?;
    let note_count: usize = notes.iter().map(Vec::len).sum();

    let response = assemble(
        scenes,
        notes,
        &outcome.registry,
        document.visual_style(),
        document.tone(),
        config.tuning.palette_max,
    )?;

    info!(
        title = %document.title(),
        scenes = response.scenes.len(),
        beats = response.scenes.iter().map(|s| s.beats.len()).sum::<usize>(),
        characters = response.global_continuity.characters.len(),
        notes = note_count,
        enriched,
        "storyboard generated"
    );

    Ok(response)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::time::Duration;

    use storyframe_core::enrichment::{EnrichmentField, TemplateEnricher};
    use storyframe_core::settings::ShotPreference;
    use storyframe_core::storyboard::StoryboardRequest;
    use storyframe_test_support::{
        AGING_SCRIPT, FailingEnricher, RecordingEnricher, SCREENPLAY_SCRIPT,
        SINGLE_PARAGRAPH_SCRIPT, SlowEnricher, SuffixEnricher, TWO_HEADER_SCRIPT, request,
        request_with,
    };
    use uuid::Uuid;

    use super::*;

    fn command(request: StoryboardRequest) -> GenerateStoryboard {
        GenerateStoryboard {
            correlation_id: Uuid::new_v4(),
            request,
        }
    }

    fn character_names(response: &StoryboardResponse) -> Vec<&str> {
        response
            .global_continuity
            .characters
            .iter()
            .map(|c| c.name.as_str())
            .collect()
    }

    async fn generate(request: StoryboardRequest) -> StoryboardResponse {
        handle_generate_storyboard(
            &command(request),
            Arc::new(TemplateEnricher),
            &PipelineConfig::default(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_single_paragraph_yields_one_scene_one_character() {
        // Act
        let response = generate(request(SINGLE_PARAGRAPH_SCRIPT)).await;

        // Assert
        assert_eq!(response.scenes.len(), 1);
        let scene = &response.scenes[0];
        assert!((1..=3).contains(&scene.beats.len()));
        assert!(scene.consistency_notes.is_empty());
        assert_eq!(response.global_continuity.characters.len(), 1);
        assert_eq!(response.global_continuity.characters[0].name, "Maria");
        assert_eq!(response.global_continuity.environments, vec!["Old Kitchen".to_owned()]);
    }

    #[tokio::test]
    async fn test_two_headers_yield_two_ordered_scenes_with_camera_style() {
        let response = generate(request(TWO_HEADER_SCRIPT)).await;

        assert_eq!(response.scenes.len(), 2);
        assert_eq!(response.scenes[0].id, "scene-1");
        assert_eq!(response.scenes[1].id, "scene-2");
        assert!(response.scenes[0].title.contains("Kitchen"));
        assert!(response.scenes[1].title.contains("Street"));
        assert!(response.scenes.iter().all(|s| !s.camera_style.is_empty()));
        assert_eq!(character_names(&response), vec!["Maria", "João"]);
    }

    #[tokio::test]
    async fn test_screenplay_cast_is_exactly_its_speakers() {
        let response = generate(request(SCREENPLAY_SCRIPT)).await;

        assert_eq!(character_names(&response), vec!["Nina", "Tomas"]);
    }

    #[tokio::test]
    async fn test_capitalized_nouns_do_not_become_characters() {
        // Arrange
        let script = "Maria walks into the bakery. Flour covers every surface. \
                      Light spills across the floor. Maria laughs.";

        // Act
        let response = generate(request(script)).await;

        // Assert
        assert_eq!(character_names(&response), vec!["Maria"]);
        let beat_names: HashSet<&str> = response
            .scenes
            .iter()
            .flat_map(|s| &s.beats)
            .flat_map(|b| b.continuity.characters.iter().map(String::as_str))
            .collect();
        assert_eq!(beat_names, HashSet::from(["Maria"]));
    }

    #[tokio::test]
    async fn test_shared_surname_keeps_characters_apart() {
        let script = "Maria Silva opens the shop. Later, Silva counts the coins. \
                      João Silva, her brother, walks in. Maria Silva hugs João Silva.";

        let response = generate(request(script)).await;

        assert_eq!(character_names(&response), vec!["Maria Silva", "João Silva"]);
        assert_eq!(response.global_continuity.characters[1].id, "char-2");
    }

    #[tokio::test]
    async fn test_bare_location_headings_split_scenes_without_inventing_characters() {
        // Arrange
        let script = "KITCHEN - DAY\nMaria cooks dinner. She hums.\n\n\
                      STREET - NIGHT\nJoão runs. He is late.";

        // Act
        let response = generate(request(script)).await;

        // Assert
        assert_eq!(response.scenes.len(), 2);
        assert_eq!(response.scenes[0].title, "Kitchen — Day");
        assert_eq!(response.scenes[1].title, "Street — Night");
        assert_eq!(character_names(&response), vec!["Maria", "João"]);
    }

    #[tokio::test]
    async fn test_aging_character_keeps_one_id_and_notes_scene_three() {
        // Act
        let response = generate(request(AGING_SCRIPT)).await;

        // Assert
        let marias: Vec<_> = response
            .global_continuity
            .characters
            .iter()
            .filter(|c| c.name == "Maria")
            .collect();
        assert_eq!(marias.len(), 1);
        assert_eq!(response.scenes.len(), 3);
        assert!(response.scenes[0].consistency_notes.is_empty());
        assert!(response.scenes[2]
            .consistency_notes
            .iter()
            .any(|note| note.contains("Maria") && note.contains("elderly") && note.contains("young")));
    }

    #[tokio::test]
    async fn test_cinematic_has_at_least_as_many_beats_as_compact() {
        let beats = |response: &StoryboardResponse| -> usize {
            response.scenes.iter().map(|s| s.beats.len()).sum()
        };

        let compact = generate(request_with(SCREENPLAY_SCRIPT, ShotPreference::Compact, None)).await;
        let cinematic =
            generate(request_with(SCREENPLAY_SCRIPT, ShotPreference::Cinematic, None)).await;

        assert!(beats(&cinematic) >= beats(&compact));
    }

    #[tokio::test]
    async fn test_every_beat_character_resolves_to_one_entity() {
        let response = generate(request(SCREENPLAY_SCRIPT)).await;

        let names: HashSet<&str> = response
            .global_continuity
            .characters
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names.len(), response.global_continuity.characters.len());
        for beat in response.scenes.iter().flat_map(|s| &s.beats) {
            for name in &beat.continuity.characters {
                assert!(names.contains(name.as_str()), "{name} missing from registry");
            }
        }
    }

    #[tokio::test]
    async fn test_timecodes_strictly_increase_and_palette_is_capped() {
        let config = PipelineConfig::default();

        let response = generate(request(SCREENPLAY_SCRIPT)).await;

        assert!(response.global_continuity.palette.len() <= config.tuning.palette_max);
        for scene in &response.scenes {
            assert!(!scene.beats.is_empty());
            let codes: Vec<&str> = scene.beats.iter().map(|b| b.timecode.as_str()).collect();
            let mut sorted = codes.clone();
            sorted.sort_by_key(|code| (code.len(), *code));
            sorted.dedup();
            assert_eq!(codes, sorted);
        }
    }

    #[tokio::test]
    async fn test_identical_input_is_deterministic() {
        let first = generate(request(AGING_SCRIPT)).await;
        let second = generate(request(AGING_SCRIPT)).await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_blank_script_is_empty_input() {
        let result = handle_generate_storyboard(
            &command(request("  \n\t ")),
            Arc::new(TemplateEnricher),
            &PipelineConfig::default(),
        )
        .await;

        assert!(matches!(result, Err(StoryboardError::EmptyInput)));
    }

    #[tokio::test]
    async fn test_failing_enricher_falls_back_to_template() {
        // Arrange
        let baseline = generate(request(TWO_HEADER_SCRIPT)).await;

        // Act
        let response = handle_generate_storyboard(
            &command(request(TWO_HEADER_SCRIPT)),
            Arc::new(FailingEnricher),
            &PipelineConfig::default(),
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(response, baseline);
    }

    #[tokio::test]
    async fn test_slow_enricher_times_out_to_template() {
        let baseline = generate(request(SINGLE_PARAGRAPH_SCRIPT)).await;
        let config = PipelineConfig {
            enrichment_timeout: Duration::from_millis(10),
            ..PipelineConfig::default()
        };

        let response = handle_generate_storyboard(
            &command(request(SINGLE_PARAGRAPH_SCRIPT)),
            Arc::new(SlowEnricher(Duration::from_secs(5))),
            &config,
        )
        .await
        .unwrap();

        assert_eq!(response, baseline);
    }

    #[tokio::test]
    async fn test_enrichment_rewrites_narration_and_prompt() {
        // Act
        let response = handle_generate_storyboard(
            &command(request(SINGLE_PARAGRAPH_SCRIPT)),
            Arc::new(SuffixEnricher("[enriched]".to_owned())),
            &PipelineConfig::default(),
        )
        .await
        .unwrap();

        // Assert
        let beat = &response.scenes[0].beats[0];
        assert!(beat.narration.ends_with("[enriched]"));
        assert!(beat.visual_idea.ends_with("[enriched]"));
        assert!(beat.prompt.starts_with(&beat.visual_idea));
    }

    #[tokio::test]
    async fn test_enricher_sees_every_beat_field() {
        // Arrange
        let enricher = Arc::new(RecordingEnricher::new());

        // Act
        let response = handle_generate_storyboard(
            &command(request(TWO_HEADER_SCRIPT)),
            enricher.clone(),
            &PipelineConfig::default(),
        )
        .await
        .unwrap();

        // Assert
        let beats: usize = response.scenes.iter().map(|s| s.beats.len()).sum();
        let calls = enricher.calls();
        assert_eq!(calls.len(), beats * 2);
        assert_eq!(
            calls
                .iter()
                .filter(|(_, field, _)| *field == EnrichmentField::VisualIdea)
                .count(),
            beats
        );
    }
}

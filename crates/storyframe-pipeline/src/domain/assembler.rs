//! Packages audited scenes and the registry into the response.

use storyframe_continuity::domain::registry::ContinuityRegistry;
use storyframe_core::error::StoryboardError;
use storyframe_core::settings::{Tone, VisualStyle};
use storyframe_core::storyboard::{GlobalContinuity, Scene, StoryboardResponse};
use storyframe_prompt::application::compose::ComposedScene;
use storyframe_prompt::domain::rules::style_guidance;

/// Parses `MM:SS` or `H:MM:SS` into seconds.
fn timecode_seconds(timecode: &str) -> Option<u32> {
    let parts: Vec<&str> = timecode.split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return None;
    }
    parts.iter().try_fold(0_u32, |total, part| {
        part.parse::<u32>().ok().map(|value| total * 60 + value)
    })
}

fn violation(detail: String) -> StoryboardError {
    StoryboardError::InternalInvariantViolation(detail)
}

fn check_scene(scene: &Scene, entity_names: &[&str]) -> Result<(), StoryboardError> {
    if scene.beats.is_empty() {
        return Err(violation(format!("scene {} has no beats", scene.id)));
    }
    let mut previous: Option<u32> = None;
    for beat in &scene.beats {
        let seconds = timecode_seconds(&beat.timecode).ok_or_else(|| {
            violation(format!("beat {} has malformed timecode {}", beat.beat_id, beat.timecode))
        })?;
        if previous.is_some_and(|p| seconds <= p) {
            return Err(violation(format!(
                "beat {} timecode {} does not advance",
                beat.beat_id, beat.timecode
            )));
        }
        previous = Some(seconds);
        if let Some(name) = beat
            .continuity
            .characters
            .iter()
            .find(|name| !entity_names.contains(&name.as_str()))
        {
            return Err(violation(format!(
                "beat {} references unresolved character {name}",
                beat.beat_id
            )));
        }
    }
    Ok(())
}

/// Builds the response from composed scenes, their notes and the registry.
///
/// # Errors
///
/// Returns `StoryboardError::InternalInvariantViolation` when there are no
/// scenes, a scene has no beats, timecodes do not strictly increase within a
/// scene, the palette exceeds `palette_max`, or a beat references an
/// unresolved character.
pub fn assemble(
    scenes: Vec<ComposedScene>,
    notes: Vec<Vec<String>>,
    registry: &ContinuityRegistry,
    visual_style: VisualStyle,
    tone: Tone,
    palette_max: usize,
) -> Result<StoryboardResponse, StoryboardError> {
    if scenes.is_empty() {
        return Err(violation("storyboard has no scenes".to_owned()));
    }
    if scenes.len() != notes.len() {
        return Err(violation(format!(
            "{} scenes but {} note lists",
            scenes.len(),
            notes.len()
        )));
    }

    let palette = registry.derive_palette(palette_max);
    if palette.len() > palette_max {
        return Err(violation(format!(
            "palette has {} colors, cap is {palette_max}",
            palette.len()
        )));
    }

    let characters = registry.to_entities();
    let entity_names: Vec<&str> = characters.iter().map(|c| c.name.as_str()).collect();
    let scenes: Vec<Scene> = scenes
        .into_iter()
        .zip(notes)
        .map(|(scene, notes)| scene.into_scene(notes))
        .collect();
    for scene in &scenes {
        check_scene(scene, &entity_names)?;
    }

    Ok(StoryboardResponse {
        global_continuity: GlobalContinuity {
            style_guidance: style_guidance(visual_style, tone, &palette),
            characters,
            environments: registry.environments(),
            visual_motifs: registry.motifs(),
            palette,
        },
        scenes,
    })
}

#[cfg(test)]
mod tests {
    use storyframe_continuity::application::tracker::{TrackingOutcome, track};
    use storyframe_core::config::PipelineTuning;
    use storyframe_core::settings::{ScriptLanguage, ShotPreference};
    use storyframe_prompt::application::compose::compose_scenes;
    use storyframe_prompt::domain::composer::ComposeSettings;
    use storyframe_script::application::decompose::decompose;
    use storyframe_script::domain::document::ScriptDocument;

    use super::*;

    fn prepare(script: &str) -> (Vec<ComposedScene>, TrackingOutcome) {
        let tuning = PipelineTuning::default();
        let document = ScriptDocument::new(
            "Test".to_owned(),
            script.to_owned(),
            ScriptLanguage::En,
            VisualStyle::Stylized,
            Tone::Uplifting,
            ShotPreference::Balanced,
            None,
        );
        let drafts = decompose(&document, &tuning);
        let outcome = track(&drafts, None, &tuning);
        let composed = compose_scenes(
            &drafts,
            &outcome.scenes,
            ComposeSettings {
                visual_style: VisualStyle::Stylized,
                tone: Tone::Uplifting,
                shot_preference: ShotPreference::Balanced,
            },
        )
        .unwrap();
        (composed, outcome)
    }

    #[test]
    fn test_timecode_parsing() {
        assert_eq!(timecode_seconds("00:00"), Some(0));
        assert_eq!(timecode_seconds("01:05"), Some(65));
        assert_eq!(timecode_seconds("1:00:05"), Some(3605));
        assert_eq!(timecode_seconds("5"), None);
        assert_eq!(timecode_seconds("aa:bb"), None);
    }

    #[test]
    fn test_assemble_builds_global_continuity() {
        // Arrange
        let (scenes, outcome) = prepare(
            "Maria wears a red coat in the old kitchen. She waits.\n\n\
             João opens the door.",
        );
        let notes = vec![Vec::new(); scenes.len()];

        // Act
        let response =
            assemble(scenes, notes, &outcome.registry, VisualStyle::Stylized, Tone::Uplifting, 6)
                .unwrap();

        // Assert
        let global = &response.global_continuity;
        assert!(global.style_guidance.starts_with("stylized illustration"));
        assert!(global.palette.len() <= 6);
        assert!(!global.palette.is_empty());
        assert_eq!(global.characters[0].name, "Maria");
        assert_eq!(global.characters[0].id, "char-1");
        assert_eq!(global.environments, vec!["Old Kitchen".to_owned()]);
    }

    #[test]
    fn test_palette_respects_the_cap() {
        let (scenes, outcome) = prepare("Maria wears a red coat. João wears a green hat. Maria nods at João.");
        let notes = vec![Vec::new(); scenes.len()];

        let response =
            assemble(scenes, notes, &outcome.registry, VisualStyle::Stylized, Tone::Uplifting, 2)
                .unwrap();

        assert_eq!(response.global_continuity.palette.len(), 2);
    }

    #[test]
    fn test_non_increasing_timecodes_are_an_internal_fault() {
        // Arrange
        let (mut scenes, outcome) = prepare("Maria waits.\n\nSHOT: João arrives.");
        let first = scenes[0].beats[0].beat.timecode.clone();
        scenes[0].beats[1].beat.timecode = first;
        let notes = vec![Vec::new(); scenes.len()];

        // Act
        let result =
            assemble(scenes, notes, &outcome.registry, VisualStyle::Stylized, Tone::Uplifting, 6);

        // Assert
        assert!(matches!(result, Err(StoryboardError::InternalInvariantViolation(_))));
    }

    #[test]
    fn test_empty_scene_list_is_an_internal_fault() {
        let registry = ContinuityRegistry::new(5);

        let result = assemble(Vec::new(), Vec::new(), &registry, VisualStyle::Anime, Tone::Dark, 6);

        assert!(matches!(result, Err(StoryboardError::InternalInvariantViolation(_))));
    }

    #[test]
    fn test_unresolved_character_is_an_internal_fault() {
        let (scenes, _) = prepare("Maria enters the old kitchen. She lights a candle.");
        let notes = vec![Vec::new(); scenes.len()];
        let empty = ContinuityRegistry::new(5);

        let result = assemble(scenes, notes, &empty, VisualStyle::Anime, Tone::Dark, 6);

        assert!(matches!(result, Err(StoryboardError::InternalInvariantViolation(_))));
    }
}

//! Composes every scene and beat of a tracked script.

use storyframe_continuity::application::tracker::SceneContext;
use storyframe_core::error::StoryboardError;
use storyframe_core::storyboard::Scene;
use storyframe_script::application::decompose::SceneDraft;
use storyframe_script::domain::segmenter::Setting;
use storyframe_script::domain::timing::format_duration;

use crate::domain::composer::{ComposeSettings, ComposedBeat, compose_beat};
use crate::domain::rules::scene_camera_style;

/// A scene whose beats carry composed prompts.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedScene {
    /// Stable identifier.
    pub id: String,
    /// Scene title.
    pub title: String,
    /// Short narrative summary.
    pub narrative_summary: String,
    /// Formatted approximate duration.
    pub approx_duration: String,
    /// Scene camera style.
    pub camera_style: String,
    /// Composed beats.
    pub beats: Vec<ComposedBeat>,
}

impl ComposedScene {
    /// Converts into the response scene with the auditor's notes.
    #[must_use]
    pub fn into_scene(self, consistency_notes: Vec<String>) -> Scene {
        Scene {
            id: self.id,
            title: self.title,
            narrative_summary: self.narrative_summary,
            approx_duration: self.approx_duration,
            camera_style: self.camera_style,
            consistency_notes,
            beats: self.beats.into_iter().map(|composed| composed.beat).collect(),
        }
    }
}

/// Composes scenes from their drafts and per-beat continuity contexts.
///
/// # Errors
///
/// Returns `StoryboardError::InternalInvariantViolation` if the contexts do
/// not line up one-to-one with scenes and beats.
pub fn compose_scenes(
    drafts: &[SceneDraft],
    contexts: &[SceneContext],
    settings: ComposeSettings,
) -> Result<Vec<ComposedScene>, StoryboardError> {
    if drafts.len() != contexts.len() {
        return Err(StoryboardError::InternalInvariantViolation(format!(
            "{} scenes but {} continuity contexts",
            drafts.len(),
            contexts.len()
        )));
    }

    drafts
        .iter()
        .zip(contexts)
        .map(|(draft, context)| {
            if draft.beats.len() != context.beats.len() || draft.id != context.scene_id {
                return Err(StoryboardError::InternalInvariantViolation(format!(
                    "continuity context does not match scene {}",
                    draft.id
                )));
            }
            let setting = draft.heading.as_ref().map_or(Setting::Unknown, |h| h.setting);
            let beats = draft
                .beats
                .iter()
                .zip(&context.beats)
                .enumerate()
                .map(|(position, (beat, beat_context))| {
                    compose_beat(beat, position, beat_context, draft.heading.as_ref(), settings)
                })
                .collect();
            Ok(ComposedScene {
                id: draft.id.clone(),
                title: draft.title.clone(),
                narrative_summary: draft.summary.clone(),
                approx_duration: format_duration(draft.duration_seconds),
                camera_style: scene_camera_style(settings.shot_preference, setting).to_owned(),
                beats,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use storyframe_continuity::application::tracker::track;
    use storyframe_core::config::PipelineTuning;
    use storyframe_core::settings::{ScriptLanguage, ShotPreference, Tone, VisualStyle};
    use storyframe_script::application::decompose::decompose;
    use storyframe_script::domain::document::ScriptDocument;

    use super::*;

    fn settings() -> ComposeSettings {
        ComposeSettings {
            visual_style: VisualStyle::Realistic,
            tone: Tone::Dramatic,
            shot_preference: ShotPreference::Balanced,
        }
    }

    fn drafts(script: &str) -> Vec<SceneDraft> {
        let document = ScriptDocument::new(
            "Test".to_owned(),
            script.to_owned(),
            ScriptLanguage::En,
            VisualStyle::Realistic,
            Tone::Dramatic,
            ShotPreference::Balanced,
            None,
        );
        decompose(&document, &PipelineTuning::default())
    }

    #[test]
    fn test_compose_scenes_sets_camera_style_per_setting() {
        // Arrange
        let scenes = drafts("INT. KITCHEN — DAY\nMaria cooks.\n\nEXT. STREET — NIGHT\nJoão runs.");
        let outcome = track(&scenes, None, &PipelineTuning::default());

        // Act
        let composed = compose_scenes(&scenes, &outcome.scenes, settings()).unwrap();

        // Assert
        assert_eq!(composed.len(), 2);
        assert_eq!(
            composed[0].camera_style,
            "classic coverage: establishing wide, mediums and reaction close-ups"
        );
        assert_eq!(composed[1].camera_style, "wide establishing shots with medium coverage");
        assert_eq!(composed[1].beats[0].beat.continuity.lighting, "cool night lighting");
    }

    #[test]
    fn test_mismatched_contexts_are_an_internal_fault() {
        let scenes = drafts("Maria cooks.");

        let result = compose_scenes(&scenes, &[], settings());

        assert!(matches!(result, Err(StoryboardError::InternalInvariantViolation(_))));
    }

    #[test]
    fn test_into_scene_keeps_beats_and_notes() {
        let scenes = drafts("Maria cooks. João watches her.");
        let outcome = track(&scenes, None, &PipelineTuning::default());
        let composed = compose_scenes(&scenes, &outcome.scenes, settings()).unwrap();

        let scene = composed[0].clone().into_scene(vec!["note".to_owned()]);

        assert_eq!(scene.consistency_notes, vec!["note".to_owned()]);
        assert_eq!(scene.beats.len(), composed[0].beats.len());
        assert!(scene.approx_duration.ends_with('s'));
    }
}

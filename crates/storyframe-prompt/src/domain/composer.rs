//! Deterministic prompt composition.
//!
//! A prompt is rendered from [`PromptParts`]: the visual idea, character
//! descriptors, scene references, lighting, mood, camera and the style
//! suffix. The parts are kept alongside the beat so the prompt can be
//! re-rendered when enrichment rewrites the visual idea.

use storyframe_continuity::application::tracker::BeatContext;
use storyframe_continuity::domain::registry::CharacterView;
use storyframe_core::settings::{ShotPreference, Tone, VisualStyle};
use storyframe_core::storyboard::{Beat, ContinuityNote};
use storyframe_script::application::decompose::TimedBeat;
use storyframe_script::domain::segmenter::SceneHeading;
use storyframe_script::domain::text::{headline, split_sentences};
use storyframe_script::domain::timing::format_timecode;

use crate::domain::rules::{self, FramingCues};

const IDEA_WORDS: usize = 14;
const PROMPT_PALETTE_COLORS: usize = 3;

/// Request settings the composer depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposeSettings {
    /// Requested visual style.
    pub visual_style: VisualStyle,
    /// Requested tone.
    pub tone: Tone,
    /// Requested shot preference.
    pub shot_preference: ShotPreference,
}

/// Everything a prompt is rendered from except the visual idea.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptParts {
    characters: Vec<String>,
    setting: Vec<String>,
    motifs: Vec<String>,
    lighting: String,
    mood: String,
    camera: String,
    style: &'static str,
}

impl PromptParts {
    /// Renders the full prompt around `visual_idea`.
    #[must_use]
    pub fn render(&self, visual_idea: &str) -> String {
        let mut sections = vec![visual_idea.trim_end_matches('.').to_owned()];
        if !self.characters.is_empty() {
            sections.push(format!("Characters: {}", self.characters.join("; ")));
        }
        if !self.setting.is_empty() {
            sections.push(format!("Setting: {}", self.setting.join(", ")));
        }
        if !self.motifs.is_empty() {
            sections.push(format!("Motifs: {}", self.motifs.join(", ")));
        }
        sections.push(format!("Lighting: {}", self.lighting));
        sections.push(format!("Mood: {}", self.mood));
        sections.push(format!("Camera: {}", self.camera));
        sections.push(format!("Style: {}", self.style));
        format!("{}.", sections.join(". "))
    }
}

/// A composed beat plus the parts its prompt was rendered from.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedBeat {
    /// Beat as returned to the caller.
    pub beat: Beat,
    parts: PromptParts,
}

impl ComposedBeat {
    /// Replaces the visual idea and re-renders the prompt.
    pub fn set_visual_idea(&mut self, visual_idea: String) {
        self.beat.prompt = self.parts.render(&visual_idea);
        self.beat.visual_idea = visual_idea;
    }

    /// Replaces the narration; the prompt does not depend on it.
    pub fn set_narration(&mut self, narration: String) {
        self.beat.narration = narration;
    }

    /// Prompt parts used for rendering.
    #[must_use]
    pub fn parts(&self) -> &PromptParts {
        &self.parts
    }
}

fn describe_character(view: &CharacterView) -> String {
    let mut text = view.name.clone();
    if !view.description.is_empty() {
        text.push_str(", ");
        text.push_str(&view.description);
    }
    if !view.palette.is_empty() {
        let colors: Vec<&str> = view
            .palette
            .iter()
            .take(PROMPT_PALETTE_COLORS)
            .map(String::as_str)
            .collect();
        text.push_str(&format!(" (palette {})", colors.join(" ")));
    }
    text
}

/// One-line visual idea: the framing plus a headline of the action.
#[must_use]
pub fn visual_idea(camera: &str, beat: &TimedBeat) -> String {
    let framing = camera.split(',').next().unwrap_or(camera).trim();
    let mut chars = framing.chars();
    let framing: String = chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default();

    let draft = &beat.draft;
    if draft.has_dialogue && !draft.speakers.is_empty() {
        let line = draft
            .narration
            .split_once(':')
            .map_or(draft.narration.as_str(), |(_, rest)| rest.trim());
        return format!(
            "{framing} on {} as they say \"{}\"",
            draft.speakers.join(" and "),
            headline(line, IDEA_WORDS / 2)
        );
    }
    let lead = split_sentences(&draft.narration)
        .first()
        .copied()
        .unwrap_or(draft.narration.as_str());
    format!("{framing}: {}", headline(lead, IDEA_WORDS))
}

/// Composes one beat from its draft, the registry snapshot taken right
/// after it registered, and the request settings.
#[must_use]
pub fn compose_beat(
    beat: &TimedBeat,
    position: usize,
    context: &BeatContext,
    heading: Option<&SceneHeading>,
    settings: ComposeSettings,
) -> ComposedBeat {
    let text = &beat.draft.narration;
    let camera = rules::beat_camera(
        FramingCues {
            text,
            position,
            speakers: beat.draft.speakers.len(),
            explicit_shot: beat.draft.explicit_shot,
            has_props: !context.props.is_empty(),
        },
        settings.shot_preference,
        settings.tone,
    );
    let lighting = rules::lighting(text, heading.and_then(|h| h.time_of_day), settings.tone);
    let mood = rules::mood(text, settings.tone);

    let parts = PromptParts {
        characters: context.characters.iter().map(describe_character).collect(),
        setting: context.environments.clone(),
        motifs: context.motifs.clone(),
        lighting: lighting.to_owned(),
        mood: mood.to_owned(),
        camera: camera.clone(),
        style: rules::style_suffix(settings.visual_style),
    };
    let idea = visual_idea(&camera, beat);
    let prompt = parts.render(&idea);

    ComposedBeat {
        beat: Beat {
            beat_id: beat.id.clone(),
            timecode: format_timecode(beat.start_seconds),
            narration: text.clone(),
            visual_idea: idea,
            continuity: ContinuityNote {
                characters: context.characters.iter().map(|c| c.name.clone()).collect(),
                lighting: lighting.to_owned(),
                mood: mood.to_owned(),
                camera,
            },
            prompt,
        },
        parts,
    }
}

#[cfg(test)]
mod tests {
    use storyframe_script::domain::beats::BeatDraft;

    use super::*;

    fn timed(narration: &str, speakers: &[&str]) -> TimedBeat {
        TimedBeat {
            id: "scene-1.1".to_owned(),
            start_seconds: 75,
            draft: BeatDraft {
                narration: narration.to_owned(),
                speakers: speakers.iter().map(|s| (*s).to_owned()).collect(),
                has_dialogue: !speakers.is_empty(),
                explicit_shot: false,
                words: 6,
            },
        }
    }

    fn context() -> BeatContext {
        BeatContext {
            beat_id: "scene-1.1".to_owned(),
            characters: vec![CharacterView {
                id: "char-1".to_owned(),
                name: "Maria".to_owned(),
                description: "young, red scarf".to_owned(),
                palette: vec![
                    "#b3261e".to_owned(),
                    "#112233".to_owned(),
                    "#445566".to_owned(),
                    "#778899".to_owned(),
                ],
            }],
            environments: vec!["Old Kitchen".to_owned()],
            motifs: vec!["rain".to_owned()],
            props: Vec::new(),
        }
    }

    fn settings() -> ComposeSettings {
        ComposeSettings {
            visual_style: VisualStyle::Sketch,
            tone: Tone::Neutral,
            shot_preference: ShotPreference::Balanced,
        }
    }

    #[test]
    fn test_compose_beat_renders_every_section() {
        // Arrange
        let beat = timed("Maria lights a candle in the old kitchen.", &[]);

        // Act
        let composed = compose_beat(&beat, 0, &context(), None, settings());

        // Assert
        let beat = &composed.beat;
        assert_eq!(beat.timecode, "01:15");
        assert_eq!(beat.continuity.characters, vec!["Maria".to_owned()]);
        assert_eq!(beat.continuity.lighting, "flickering candlelight");
        assert_eq!(beat.continuity.camera, "wide establishing shot");
        assert_eq!(
            beat.visual_idea,
            "Wide establishing shot: Maria lights a candle in the old kitchen"
        );
        assert_eq!(
            beat.prompt,
            "Wide establishing shot: Maria lights a candle in the old kitchen. \
             Characters: Maria, young, red scarf (palette #b3261e #112233 #445566). \
             Setting: Old Kitchen. Motifs: rain. Lighting: flickering candlelight. \
             Mood: calm. Camera: wide establishing shot. \
             Style: storyboard pencil sketch, loose linework, grayscale shading."
        );
    }

    #[test]
    fn test_dialogue_visual_idea_names_speakers() {
        let beat = timed("Maria: You came back after all these years.", &["Maria"]);

        let composed = compose_beat(&beat, 1, &context(), None, settings());

        assert_eq!(composed.beat.continuity.camera, "medium close-up");
        assert_eq!(
            composed.beat.visual_idea,
            "Medium close-up on Maria as they say \"You came back after all these years\""
        );
    }

    #[test]
    fn test_set_visual_idea_rerenders_prompt() {
        let mut composed = compose_beat(&timed("Maria waits.", &[]), 1, &context(), None, settings());

        composed.set_visual_idea("A lone figure by the window".to_owned());

        assert!(composed.beat.prompt.starts_with("A lone figure by the window. Characters:"));
    }

    #[test]
    fn test_composition_is_deterministic() {
        let beat = timed("Maria waits by the door.", &[]);

        let first = compose_beat(&beat, 2, &context(), None, settings());
        let second = compose_beat(&beat, 2, &context(), None, settings());

        assert_eq!(first, second);
    }
}

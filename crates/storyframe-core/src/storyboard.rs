//! Request and response model exchanged with the transport layer.
//!
//! Field names follow the JSON contract (`camelCase`); everything here is
//! plain data with no behavior beyond serialization.

use serde::{Deserialize, Serialize};

use crate::settings::{ScriptLanguage, ShotPreference, Tone, VisualStyle};

/// A storyboard generation request, already shape-validated upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryboardRequest {
    /// Project title.
    pub title: String,
    /// Raw script text.
    pub script: String,
    /// Language the script is written in.
    pub script_language: ScriptLanguage,
    /// Requested rendering style.
    pub visual_style: VisualStyle,
    /// Emotional register.
    pub tone: Tone,
    /// Scene/beat density.
    pub shot_preference: ShotPreference,
    /// Optional free-text character guide (`Name: description` per line).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_guide: Option<String>,
}

/// The complete generated storyboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryboardResponse {
    /// Document-level continuity registry.
    pub global_continuity: GlobalContinuity,
    /// Scenes in document order.
    pub scenes: Vec<Scene>,
}

/// Aggregate view of every entity tracked across the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalContinuity {
    /// Style guidance shared by every prompt.
    pub style_guidance: String,
    /// Characters in first-mention order.
    pub characters: Vec<CharacterEntity>,
    /// Environments in first-mention order.
    pub environments: Vec<String>,
    /// Visual motifs in first-mention order.
    pub visual_motifs: Vec<String>,
    /// Document palette, most important color first.
    pub palette: Vec<String>,
}

/// A recurring character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterEntity {
    /// Stable identifier (`char-{n}`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Consolidated appearance description.
    pub description: String,
    /// Character palette as `#rrggbb` values.
    pub color_palette: Vec<String>,
    /// Props seen with the character.
    pub recurring_props: Vec<String>,
}

/// A top-level narrative/location unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Stable identifier (`scene-{n}`).
    pub id: String,
    /// Heading or inferred title.
    pub title: String,
    /// Short summary of what happens.
    pub narrative_summary: String,
    /// Approximate screen time, e.g. `18s` or `1m 05s`.
    pub approx_duration: String,
    /// Camera approach for the whole scene.
    pub camera_style: String,
    /// Continuity issues found by the auditor.
    pub consistency_notes: Vec<String>,
    /// Beats in document order.
    pub beats: Vec<Beat>,
}

/// One shot-equivalent moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beat {
    /// Stable identifier (`{sceneId}.{n}`).
    pub beat_id: String,
    /// Start offset within the storyboard timeline.
    pub timecode: String,
    /// Script excerpt for the beat.
    pub narration: String,
    /// One-line description of the image.
    pub visual_idea: String,
    /// Continuity cues for the beat.
    pub continuity: ContinuityNote,
    /// Composed image-generation prompt.
    pub prompt: String,
}

/// Continuity cues attached to a beat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuityNote {
    /// Canonical names of referenced characters.
    pub characters: Vec<String>,
    /// Lighting description.
    pub lighting: String,
    /// Mood description.
    pub mood: String,
    /// Camera framing.
    pub camera: String,
}

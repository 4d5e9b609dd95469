//! The normalized script document.

use storyframe_core::settings::{ScriptLanguage, ShotPreference, Tone, VisualStyle};

/// Normalized script text plus request metadata. Immutable once built.
#[derive(Debug, Clone)]
pub struct ScriptDocument {
    title: String,
    text: String,
    language: ScriptLanguage,
    visual_style: VisualStyle,
    tone: Tone,
    shot_preference: ShotPreference,
    character_guide: Option<String>,
}

impl ScriptDocument {
    /// Creates a document from already-normalized text.
    #[must_use]
    pub fn new(
        title: String,
        text: String,
        language: ScriptLanguage,
        visual_style: VisualStyle,
        tone: Tone,
        shot_preference: ShotPreference,
        character_guide: Option<String>,
    ) -> Self {
        Self {
            title,
            text,
            language,
            visual_style,
            tone,
            shot_preference,
            character_guide,
        }
    }

    /// Project title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Normalized script text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Script language.
    #[must_use]
    pub fn language(&self) -> ScriptLanguage {
        self.language
    }

    /// Requested visual style.
    #[must_use]
    pub fn visual_style(&self) -> VisualStyle {
        self.visual_style
    }

    /// Requested tone.
    #[must_use]
    pub fn tone(&self) -> Tone {
        self.tone
    }

    /// Requested shot preference.
    #[must_use]
    pub fn shot_preference(&self) -> ShotPreference {
        self.shot_preference
    }

    /// Trimmed character guide, if one was supplied.
    #[must_use]
    pub fn character_guide(&self) -> Option<&str> {
        self.character_guide.as_deref()
    }
}

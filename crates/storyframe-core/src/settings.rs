//! Closed setting variants carried by every storyboard request.
//!
//! Each enum serializes to the exact wire token accepted by the transport
//! (`motion_graphic`, `cinematic`, `pt`, ...). Stages dispatch on these
//! variants through explicit rule tables instead of string comparisons.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Language the script is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptLanguage {
    /// Portuguese.
    Pt,
    /// English.
    En,
    /// Spanish.
    Es,
    /// French.
    Fr,
    /// German.
    De,
    /// Italian.
    It,
    /// Japanese.
    Ja,
    /// Korean.
    Ko,
    /// Chinese.
    Zh,
    /// Hindi.
    Hi,
}

impl ScriptLanguage {
    /// Returns the ISO 639-1 code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Pt => "pt",
            Self::En => "en",
            Self::Es => "es",
            Self::Fr => "fr",
            Self::De => "de",
            Self::It => "it",
            Self::Ja => "ja",
            Self::Ko => "ko",
            Self::Zh => "zh",
            Self::Hi => "hi",
        }
    }
}

/// Requested rendering style for every composed prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualStyle {
    /// Photographic look.
    Realistic,
    /// Painterly, illustrated look.
    Stylized,
    /// Flat vector motion design.
    MotionGraphic,
    /// Anime key-frame look.
    Anime,
    /// Pencil storyboard sketch.
    Sketch,
}

impl VisualStyle {
    /// Returns the wire token.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Realistic => "realistic",
            Self::Stylized => "stylized",
            Self::MotionGraphic => "motion_graphic",
            Self::Anime => "anime",
            Self::Sketch => "sketch",
        }
    }
}

/// Emotional register of the storyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// No particular slant.
    Neutral,
    /// Warm and hopeful.
    Uplifting,
    /// High tension.
    Dramatic,
    /// Somber and ominous.
    Dark,
    /// Light and whimsical.
    Playful,
}

impl Tone {
    /// Returns the wire token.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Uplifting => "uplifting",
            Self::Dramatic => "dramatic",
            Self::Dark => "dark",
            Self::Playful => "playful",
        }
    }
}

/// How densely the script should be cut into scenes and beats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShotPreference {
    /// Fewer, longer scenes and beats.
    Compact,
    /// Middle ground.
    Balanced,
    /// More, shorter scenes and beats.
    Cinematic,
}

impl ShotPreference {
    /// Returns the wire token.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Balanced => "balanced",
            Self::Cinematic => "cinematic",
        }
    }
}

macro_rules! display_via {
    ($ty:ty, $method:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.$method())
            }
        }
    };
}

display_via!(ScriptLanguage, code);
display_via!(VisualStyle, as_str);
display_via!(Tone, as_str);
display_via!(ShotPreference, as_str);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visual_style_uses_snake_case_wire_tokens() {
        let style: VisualStyle = serde_json::from_str("\"motion_graphic\"").unwrap();
        assert_eq!(style, VisualStyle::MotionGraphic);
        assert_eq!(serde_json::to_string(&style).unwrap(), "\"motion_graphic\"");
    }

    #[test]
    fn test_unknown_tone_is_rejected() {
        assert!(serde_json::from_str::<Tone>("\"melancholic\"").is_err());
    }

    #[test]
    fn test_display_matches_wire_token() {
        assert_eq!(ShotPreference::Cinematic.to_string(), "cinematic");
        assert_eq!(ScriptLanguage::Ja.to_string(), "ja");
    }
}

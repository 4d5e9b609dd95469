//! Sample scripts and request builders.

use storyframe_core::settings::{ScriptLanguage, ShotPreference, Tone, VisualStyle};
use storyframe_core::storyboard::StoryboardRequest;

/// One paragraph, three sentences, one character, one location.
pub const SINGLE_PARAGRAPH_SCRIPT: &str =
    "Maria enters the old kitchen. She lights a candle on the table. Maria smiles at the warm glow.";

/// Two slug-line headers, one character in each scene.
pub const TWO_HEADER_SCRIPT: &str = "INT. KITCHEN — DAY\n\
     Maria chops onions at the counter. She wipes her eyes. Steam rises from a pot.\n\n\
     EXT. STREET — NIGHT\n\
     João runs through the rain. He shields his face. A car passes with its lights on.";

/// Maria is young in scene 1 and elderly in scene 3.
pub const AGING_SCRIPT: &str = "INT. HOUSE - DAY\n\
     Young Maria plays in the garden with a red kite.\n\n\
     INT. SCHOOL - DAY\n\
     João reads quietly by the window. He turns a page.\n\n\
     INT. HOUSE - NIGHT\n\
     Maria, now elderly, sits by the window. She holds the red kite.";

/// Screenplay-formatted dialogue with actions in between.
pub const SCREENPLAY_SCRIPT: &str = "INT. BAR - NIGHT\n\
     Rain hits the glass. Nina wipes the counter.\n\n\
     NINA\n\
     Another one?\n\n\
     TOMAS\n\
     (quietly)\n\
     Make it a double.\n\n\
     Nina pours the drink and slides it over. Tomas stares at the door.\n\n\
     SHOT: Close on the door as it swings open.\n\n\
     Then a stranger walks in from the storm.";

/// Builds an English, realistic, neutral, balanced request.
#[must_use]
pub fn request(script: &str) -> StoryboardRequest {
    request_with(script, ShotPreference::Balanced, None)
}

/// Builds a request with a specific shot preference and character guide.
#[must_use]
pub fn request_with(
    script: &str,
    shot_preference: ShotPreference,
    character_guide: Option<&str>,
) -> StoryboardRequest {
    StoryboardRequest {
        title: "Test Storyboard".to_owned(),
        script: script.to_owned(),
        script_language: ScriptLanguage::En,
        visual_style: VisualStyle::Realistic,
        tone: Tone::Neutral,
        shot_preference,
        character_guide: character_guide.map(ToOwned::to_owned),
    }
}

//! Fixed rule tables for lighting, mood, camera and style.
//!
//! Every table is a closed `match` over the request settings or a keyword
//! list over lower-cased beat text, so each rule can be tested on its own.

use storyframe_core::settings::{ShotPreference, Tone, VisualStyle};
use storyframe_script::domain::segmenter::{Setting, TimeOfDay};

/// Default lighting per tone.
#[must_use]
pub fn tone_lighting(tone: Tone) -> &'static str {
    match tone {
        Tone::Neutral => "soft natural light",
        Tone::Uplifting => "warm golden light",
        Tone::Dramatic => "high-contrast chiaroscuro lighting",
        Tone::Dark => "low-key lighting with deep shadows",
        Tone::Playful => "bright saturated light",
    }
}

/// Default mood per tone.
#[must_use]
pub fn tone_mood(tone: Tone) -> &'static str {
    match tone {
        Tone::Neutral => "calm",
        Tone::Uplifting => "hopeful",
        Tone::Dramatic => "tense",
        Tone::Dark => "ominous",
        Tone::Playful => "whimsical",
    }
}

const LIGHTING_CUES: &[(&[&str], &str)] = &[
    (&["candle", "candles", "candlelight", "vela", "velas", "bougie", "kerze", "candela"], "flickering candlelight"),
    (&["neon"], "neon glow"),
    (&["fire", "fireplace", "flames", "bonfire", "fogo", "fuego", "feu", "feuer", "fuoco"], "warm firelight"),
    (&["moon", "moonlight", "midnight", "lua", "luna", "lune", "mond"], "cool moonlight"),
    (&["rain", "storm", "overcast", "chuva", "lluvia", "pluie", "regen", "pioggia"], "diffused overcast light"),
    (&["dawn", "sunrise", "amanhecer", "amanecer", "aube", "alba"], "pale dawn light"),
    (&["sunset", "dusk", "twilight", "pôr-do-sol", "atardecer", "crépuscule", "tramonto"], "warm sunset light"),
    (&["lamp", "lamplight", "streetlight", "streetlights"], "pools of practical lamplight"),
];

const MOOD_CUES: &[(&[&str], &str)] = &[
    (&["cries", "cry", "tears", "sobs", "weeps", "grieves", "chora", "llora", "pleure", "weint", "piange"], "sorrowful"),
    (&["screams", "scream", "runs", "chases", "flees", "panics", "fear", "grita", "corre", "crie", "schreit", "urla"], "urgent"),
    (&["laughs", "laugh", "smiles", "grins", "giggles", "sorri", "ríe", "sonríe", "rit", "sourit", "lacht", "sorride"], "joyful"),
    (&["kisses", "kiss", "embraces", "hugs", "holds hands", "beija", "abraça", "besa", "abraza", "embrasse", "küsst", "bacia"], "tender"),
    (&["shouts", "slams", "yells", "furious", "angry", "punches", "furiosa", "furioso"], "heated"),
    (&["whispers", "whisper", "silence", "quietly", "hushed", "sussurra", "susurra", "chuchote", "flüstert"], "hushed"),
];

const ACTION_VERBS: &[&str] = &[
    "runs", "run", "chases", "walks", "drives", "jumps", "falls", "flees", "rushes", "climbs",
    "dances", "races", "sprints", "rides", "swims", "follows", "crosses", "corre", "caminha",
    "anda", "salta", "camina", "court", "marche", "saute", "läuft", "rennt", "springt", "cammina",
];

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '-')
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn first_cue(text: &str, table: &[(&[&str], &'static str)]) -> Option<&'static str> {
    let words = words(text);
    let lowered = text.to_lowercase();
    table
        .iter()
        .find(|(cues, _)| {
            cues.iter().any(|cue| {
                if cue.contains(' ') {
                    lowered.contains(cue)
                } else {
                    words.iter().any(|w| w == cue)
                }
            })
        })
        .map(|(_, value)| *value)
}

/// Lighting for a beat: a content cue wins, then the scene's time of day,
/// then the tone default.
#[must_use]
pub fn lighting(text: &str, time_of_day: Option<TimeOfDay>, tone: Tone) -> &'static str {
    if let Some(cue) = first_cue(text, LIGHTING_CUES) {
        return cue;
    }
    match time_of_day {
        Some(TimeOfDay::Night) => "cool night lighting",
        Some(TimeOfDay::Dawn) => "pale dawn light",
        Some(TimeOfDay::Dusk) => "warm sunset light",
        Some(TimeOfDay::Day | TimeOfDay::Continuous) | None => tone_lighting(tone),
    }
}

/// Emotional cue in the text, if any.
#[must_use]
pub fn emotion_cue(text: &str) -> Option<&'static str> {
    first_cue(text, MOOD_CUES)
}

/// Mood for a beat: an emotion cue wins over the tone default.
#[must_use]
pub fn mood(text: &str, tone: Tone) -> &'static str {
    emotion_cue(text).unwrap_or_else(|| tone_mood(tone))
}

/// Returns `true` when the text describes movement worth tracking.
#[must_use]
pub fn has_action(text: &str) -> bool {
    words(text).iter().any(|w| ACTION_VERBS.contains(&w.as_str()))
}

/// Camera movement added to cinematic beats.
#[must_use]
pub fn camera_movement(tone: Tone) -> &'static str {
    match tone {
        Tone::Neutral => "steady dolly",
        Tone::Uplifting => "gentle crane up",
        Tone::Dramatic => "slow push-in",
        Tone::Dark => "handheld drift",
        Tone::Playful => "quick whip pan",
    }
}

/// What the composer knows about a beat when picking its framing.
#[derive(Debug, Clone, Copy)]
pub struct FramingCues<'a> {
    /// Beat narration.
    pub text: &'a str,
    /// Zero-based position in the scene.
    pub position: usize,
    /// Number of distinct speakers.
    pub speakers: usize,
    /// Beat came from an explicit shot marker.
    pub explicit_shot: bool,
    /// Beat mentions a tracked prop.
    pub has_props: bool,
}

fn explicit_framing(text: &str) -> &'static str {
    let words = words(text);
    let has = |cue: &str| words.iter().any(|w| w == cue);
    if has("close") || has("close-up") || has("closeup") {
        "close-up"
    } else if has("wide") || has("establishing") {
        "wide shot"
    } else if has("overhead") || has("aerial") {
        "overhead shot"
    } else if has("pov") {
        "point-of-view shot"
    } else {
        "insert shot"
    }
}

/// Camera framing for a beat.
#[must_use]
pub fn beat_camera(cues: FramingCues<'_>, preference: ShotPreference, tone: Tone) -> String {
    let framing = if cues.explicit_shot {
        explicit_framing(cues.text)
    } else if cues.speakers > 1 {
        "over-the-shoulder two-shot"
    } else if cues.speakers == 1 {
        "medium close-up"
    } else if cues.position == 0 {
        "wide establishing shot"
    } else if has_action(cues.text) {
        "tracking shot"
    } else if emotion_cue(cues.text).is_some() {
        "close-up"
    } else if cues.has_props {
        "insert close-up"
    } else {
        match preference {
            ShotPreference::Compact | ShotPreference::Balanced => "medium shot",
            ShotPreference::Cinematic => "medium wide shot",
        }
    };
    if preference == ShotPreference::Cinematic {
        format!("{framing}, {}", camera_movement(tone))
    } else {
        framing.to_owned()
    }
}

/// Scene-level camera style from shot preference and setting.
#[must_use]
pub fn scene_camera_style(preference: ShotPreference, setting: Setting) -> &'static str {
    match (preference, setting) {
        (ShotPreference::Compact, Setting::Interior) => "static medium framing with minimal cuts",
        (ShotPreference::Compact, Setting::Exterior) => "locked-off wide framing with minimal cuts",
        (ShotPreference::Compact, Setting::Mixed) => "medium framing through doorways and windows",
        (ShotPreference::Compact, Setting::Unknown) => "simple medium framing with minimal cuts",
        (ShotPreference::Balanced, Setting::Interior) => {
            "classic coverage: establishing wide, mediums and reaction close-ups"
        }
        (ShotPreference::Balanced, Setting::Exterior) => {
            "wide establishing shots with medium coverage"
        }
        (ShotPreference::Balanced, Setting::Mixed) => {
            "coverage moving between interior and exterior angles"
        }
        (ShotPreference::Balanced, Setting::Unknown) => {
            "balanced coverage of wides, mediums and close-ups"
        }
        (ShotPreference::Cinematic, Setting::Interior) => {
            "motivated dolly moves with shallow depth of field"
        }
        (ShotPreference::Cinematic, Setting::Exterior) => {
            "sweeping crane and drone moves on long lenses"
        }
        (ShotPreference::Cinematic, Setting::Mixed) => {
            "continuous tracking shot through the threshold"
        }
        (ShotPreference::Cinematic, Setting::Unknown) => {
            "dynamic camera with dolly moves and close detail inserts"
        }
    }
}

/// Prompt suffix per visual style.
#[must_use]
pub fn style_suffix(style: VisualStyle) -> &'static str {
    match style {
        VisualStyle::Realistic => "photorealistic, 35mm film still, natural textures",
        VisualStyle::Stylized => "stylized illustration, bold shapes, painterly texture",
        VisualStyle::MotionGraphic => "clean motion graphic frame, flat vector shapes, generous negative space",
        VisualStyle::Anime => "anime key frame, cel shading, expressive linework",
        VisualStyle::Sketch => "storyboard pencil sketch, loose linework, grayscale shading",
    }
}

/// Document-level style guidance from style, tone and palette.
#[must_use]
pub fn style_guidance(style: VisualStyle, tone: Tone, palette: &[String]) -> String {
    let mut guidance = format!(
        "{}; {} mood under {}",
        style_suffix(style),
        tone_mood(tone),
        tone_lighting(tone)
    );
    if !palette.is_empty() {
        guidance.push_str("; keep colors anchored on ");
        guidance.push_str(&palette.join(", "));
    }
    guidance
}

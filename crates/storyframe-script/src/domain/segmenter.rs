//! Scene segmentation.
//!
//! Structural segmentation splits on scene headings and scene-break markers
//! when at least two are present. Otherwise paragraphs are grouped into a
//! target number of scenes derived from shot preference and text length,
//! assigning each paragraph to a bucket by its word midpoint so that scene
//! lengths stay balanced.

use std::sync::LazyLock;

use regex::Regex;
use storyframe_core::config::PipelineTuning;
use storyframe_core::error::StoryboardError;
use storyframe_core::settings::ShotPreference;

use crate::domain::normalizer::SCENE_BREAK;
use crate::domain::text::{count_words, is_all_caps, title_case};

/// Whether a scene plays indoors or outdoors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    /// `INT.`
    Interior,
    /// `EXT.` / `EST.`
    Exterior,
    /// `INT./EXT.` / `I/E`
    Mixed,
    /// No slugline information.
    Unknown,
}

/// Time-of-day cue from a scene heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    /// Daylight, morning or afternoon.
    Day,
    /// Night.
    Night,
    /// Dawn or sunrise.
    Dawn,
    /// Dusk, sunset or evening.
    Dusk,
    /// Continuous with the previous scene.
    Continuous,
}

const TIME_OF_DAY_TABLE: &[(TimeOfDay, &[&str])] = &[
    (
        TimeOfDay::Night,
        &["NIGHT", "MIDNIGHT", "NOITE", "NOCHE", "NUIT", "NACHT", "NOTTE", "MADRUGADA"],
    ),
    (
        TimeOfDay::Dawn,
        &["DAWN", "SUNRISE", "AMANHECER", "AMANECER", "AUBE", "MORGENGRAUEN", "ALBA"],
    ),
    (
        TimeOfDay::Dusk,
        &[
            "DUSK", "SUNSET", "EVENING", "ENTARDECER", "ATARDECER", "CRÉPUSCULE", "SOIR", "ABEND",
            "TRAMONTO", "SERA", "TARDE",
        ],
    ),
    (
        TimeOfDay::Day,
        &[
            "DAY", "MORNING", "AFTERNOON", "NOON", "DIA", "DÍA", "MANHÃ", "MAÑANA", "JOUR",
            "MATIN", "TAG", "MORGEN", "GIORNO", "MATTINA",
        ],
    ),
    (
        TimeOfDay::Continuous,
        &["CONTINUOUS", "LATER", "MOMENTS LATER", "SAME", "CONTÍNUO", "CONTINUO", "SUITE"],
    ),
];

impl TimeOfDay {
    /// Parses a slugline time-of-day fragment.
    #[must_use]
    pub fn parse(fragment: &str) -> Option<Self> {
        let upper = fragment.trim().to_uppercase();
        TIME_OF_DAY_TABLE
            .iter()
            .find(|(_, words)| words.contains(&upper.as_str()))
            .map(|(time, _)| *time)
    }
}

/// A parsed scene heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneHeading {
    /// The heading line as written.
    pub raw: String,
    /// Interior/exterior setting.
    pub setting: Setting,
    /// Location name, if the heading names one.
    pub location: Option<String>,
    /// Time-of-day cue, if present.
    pub time_of_day: Option<TimeOfDay>,
    /// Explicit scene title (numbered or Markdown headers).
    pub label: Option<String>,
}

impl SceneHeading {
    /// Human-readable title derived from the heading.
    #[must_use]
    pub fn title(&self) -> String {
        if let Some(label) = &self.label {
            return label.clone();
        }
        let location = self.location.as_deref().map(title_case);
        let time = self.time_of_day_fragment().map(title_case);
        match (location, time) {
            (Some(location), Some(time)) => format!("{location} — {time}"),
            (Some(location), None) => location,
            (None, Some(time)) => time,
            (None, None) => self.raw.trim().to_owned(),
        }
    }

    fn time_of_day_fragment(&self) -> Option<&str> {
        self.time_of_day?;
        split_slug(&self.raw).last().copied()
    }
}

/// One scene's worth of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSegment {
    /// Parsed heading, when the scene started with one.
    pub heading: Option<SceneHeading>,
    /// Scene body text without the heading line.
    pub body: String,
}

static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(int\.?\s*/\s*ext\.?|ext\.?\s*/\s*int\.?|i\s*/\s*e\.?|int\.|ext\.|est\.)\s*(.*)$",
    )
    .expect("valid regex")
});

static SLUG_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(INTERIOR|EXTERIOR|INTERNA|EXTERNA|INTÉRIEUR|EXTÉRIEUR|INNEN|AUSSEN|AUẞEN)\b[\s.:\-–—]*(.*)$")
        .expect("valid regex")
});

static NUMBERED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(scene|cena|escena|scène|szene|scena|sc\.)\s*(\d+|[ivxlc]+)\b\s*[:.\-–—]?\s*(.*)$")
        .expect("valid regex")
});

static MARKDOWN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#{1,6}\s+(\S.*)$").expect("valid regex"));

static SLUG_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+-+\s+|\s*[—–]\s*").expect("valid regex"));

/// Numbered headers longer than this are prose, not headings.
const MAX_HEADER_WORDS: usize = 12;

fn split_slug(raw: &str) -> Vec<&str> {
    let rest = SLUG_RE
        .captures(raw)
        .or_else(|| SLUG_WORD_RE.captures(raw))
        .and_then(|caps| caps.get(2))
        .map_or(raw, |m| m.as_str());
    SLUG_SEPARATOR_RE
        .split(rest)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

fn setting_from_prefix(prefix: &str) -> Setting {
    let compact: String = prefix
        .chars()
        .filter(|c| c.is_alphabetic() || *c == '/')
        .collect::<String>()
        .to_uppercase();
    if compact.contains('/') {
        Setting::Mixed
    } else if compact.starts_with("INT") || compact == "INNEN" {
        Setting::Interior
    } else {
        Setting::Exterior
    }
}

fn parse_slugline(line: &str, prefix: &str) -> SceneHeading {
    let mut parts = split_slug(line);
    let time_of_day = parts.last().and_then(|last| TimeOfDay::parse(last));
    if time_of_day.is_some() {
        parts.pop();
    }
    let location = Some(parts.join(" - ")).filter(|l| !l.is_empty());
    SceneHeading {
        raw: line.trim().to_owned(),
        setting: setting_from_prefix(prefix),
        location,
        time_of_day,
        label: None,
    }
}

/// `KITCHEN - DAY`: an upper-case location and a time of day with no
/// interior/exterior prefix.
fn parse_bare_slug(line: &str) -> Option<SceneHeading> {
    if !is_all_caps(line) {
        return None;
    }
    let mut parts = split_slug(line);
    let time_of_day = TimeOfDay::parse(parts.last()?)?;
    parts.pop();
    if parts.is_empty() {
        return None;
    }
    Some(SceneHeading {
        raw: line.trim().to_owned(),
        setting: Setting::Unknown,
        location: Some(parts.join(" - ")),
        time_of_day: Some(time_of_day),
        label: None,
    })
}

/// Parses a heading line, returning `None` for ordinary text.
#[must_use]
pub fn parse_heading(line: &str) -> Option<SceneHeading> {
    if let Some(caps) = SLUG_RE.captures(line).or_else(|| SLUG_WORD_RE.captures(line)) {
        let prefix = caps.get(1).map_or("", |m| m.as_str());
        return Some(parse_slugline(line, prefix));
    }
    if count_words(line) > MAX_HEADER_WORDS {
        return None;
    }
    if let Some(heading) = parse_bare_slug(line) {
        return Some(heading);
    }
    if let Some(caps) = NUMBERED_RE.captures(line) {
        let rest = caps.get(3).map_or("", |m| m.as_str()).trim();
        let label = if rest.is_empty() {
            title_case(line.trim().trim_end_matches([':', '.']))
        } else {
            rest.to_owned()
        };
        return Some(SceneHeading {
            raw: line.trim().to_owned(),
            setting: Setting::Unknown,
            location: None,
            time_of_day: None,
            label: Some(label),
        });
    }
    MARKDOWN_RE.captures(line).map(|caps| SceneHeading {
        raw: line.trim().to_owned(),
        setting: Setting::Unknown,
        location: None,
        time_of_day: None,
        label: caps.get(1).map(|m| m.as_str().trim().to_owned()),
    })
}

/// Segments normalized text into scenes.
///
/// # Errors
///
/// Returns `StoryboardError::SegmentationFailure` if no scene with content
/// can be derived.
pub fn segment(
    text: &str,
    preference: ShotPreference,
    tuning: &PipelineTuning,
) -> Result<Vec<SceneSegment>, StoryboardError> {
    let markers = text
        .lines()
        .filter(|line| line.trim() == SCENE_BREAK || parse_heading(line).is_some())
        .count();

    let segments = if markers >= 2 {
        segment_structural(text)
    } else {
        segment_by_density(text, preference, tuning)
    };

    if segments.is_empty() {
        return Err(StoryboardError::SegmentationFailure(
            "no scene boundaries or paragraphs with narrative text".to_owned(),
        ));
    }
    Ok(segments)
}

/// Wraps the whole text in a single scene.
#[must_use]
pub fn single_scene(text: &str) -> Vec<SceneSegment> {
    vec![SceneSegment {
        heading: None,
        body: text.trim().to_owned(),
    }]
}

fn has_content(heading: Option<&SceneHeading>, body: &[&str]) -> bool {
    heading.is_some() || body.iter().any(|line| line.chars().any(char::is_alphanumeric))
}

fn segment_structural(text: &str) -> Vec<SceneSegment> {
    struct Open<'a> {
        heading: Option<SceneHeading>,
        body: Vec<&'a str>,
        closed_by_break: bool,
    }

    let mut closed: Vec<Open<'_>> = Vec::new();
    let mut current = Open {
        heading: None,
        body: Vec::new(),
        closed_by_break: false,
    };

    for line in text.lines() {
        if line.trim() == SCENE_BREAK {
            if has_content(current.heading.as_ref(), &current.body) {
                current.closed_by_break = true;
                closed.push(current);
            }
            current = Open {
                heading: None,
                body: Vec::new(),
                closed_by_break: false,
            };
            continue;
        }
        if let Some(heading) = parse_heading(line) {
            if has_content(current.heading.as_ref(), &current.body) {
                closed.push(current);
            }
            current = Open {
                heading: Some(heading),
                body: Vec::new(),
                closed_by_break: false,
            };
            continue;
        }
        current.body.push(line);
    }
    if has_content(current.heading.as_ref(), &current.body) {
        closed.push(current);
    }

    // A headingless prologue directly followed by a heading belongs to it.
    if closed.len() > 1
        && closed[0].heading.is_none()
        && !closed[0].closed_by_break
        && closed[1].heading.is_some()
    {
        let prologue = closed.remove(0);
        let mut body = prologue.body;
        body.push("");
        body.append(&mut closed[0].body);
        closed[0].body = body;
    }

    closed
        .into_iter()
        .map(|open| SceneSegment {
            heading: open.heading,
            body: open.body.join("\n").trim().to_owned(),
        })
        .collect()
}

fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() || line.trim() == SCENE_BREAK {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
            continue;
        }
        current.push(line);
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }
    paragraphs
        .into_iter()
        .filter(|p| p.chars().any(char::is_alphanumeric))
        .collect()
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn segment_by_density(
    text: &str,
    preference: ShotPreference,
    tuning: &PipelineTuning,
) -> Vec<SceneSegment> {
    let mut paragraphs = split_paragraphs(text);

    // A lone heading on the first line still names the first scene.
    let mut first_heading = None;
    if let Some(first) = paragraphs.first_mut() {
        let mut lines = first.lines();
        if let Some(heading) = lines.next().and_then(parse_heading) {
            let rest = lines.collect::<Vec<_>>().join("\n");
            first_heading = Some(heading);
            *first = rest;
        }
    }
    if paragraphs.first().is_some_and(|p| p.trim().is_empty()) && paragraphs.len() > 1 {
        paragraphs.remove(0);
    }
    if paragraphs.is_empty() && first_heading.is_none() {
        return Vec::new();
    }

    let weights: Vec<usize> = paragraphs.iter().map(|p| count_words(p).max(1)).collect();
    let total: usize = weights.iter().sum::<usize>().max(1);
    let per_scene = tuning.words_per_scene.get(preference);
    let target = total
        .div_ceil(per_scene)
        .min(paragraphs.len())
        .min(tuning.max_scenes)
        .max(1);

    let mut groups: Vec<Vec<String>> = Vec::new();
    let mut last_bucket = None;
    let mut cumulative = 0usize;
    for (paragraph, weight) in paragraphs.into_iter().zip(weights) {
        let midpoint = cumulative as f64 + weight as f64 / 2.0;
        let bucket = ((midpoint * target as f64 / total as f64) as usize).min(target - 1);
        cumulative += weight;
        if last_bucket == Some(bucket) {
            if let Some(group) = groups.last_mut() {
                group.push(paragraph);
            }
        } else {
            groups.push(vec![paragraph]);
            last_bucket = Some(bucket);
        }
    }

    let mut segments: Vec<SceneSegment> = groups
        .into_iter()
        .map(|group| SceneSegment {
            heading: None,
            body: group.join("\n\n").trim().to_owned(),
        })
        .collect();
    if let Some(heading) = first_heading {
        if segments.is_empty() {
            segments.push(SceneSegment {
                heading: Some(heading),
                body: String::new(),
            });
        } else {
            segments[0].heading = Some(heading);
        }
    }
    segments
}

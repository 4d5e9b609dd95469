//! Beat extraction.
//!
//! A scene body is first cut into units (sentences, dialogue lines, explicit
//! shots), then adjacent units are merged into beats until something implies
//! a new visual moment. The rhythm policy caps how many beats a scene may
//! hold and how many words fit in one beat.

use std::sync::LazyLock;

use regex::Regex;
use storyframe_core::config::PipelineTuning;
use storyframe_core::settings::{ShotPreference, Tone};

use crate::domain::lexicon;
use crate::domain::normalizer::SHOT_PREFIX;
use crate::domain::segmenter::SceneHeading;
use crate::domain::text::{
    clean_token, count_words, is_all_caps, is_capitalized, split_sentences, title_case,
};

/// Beat density limits for one scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RhythmPolicy {
    /// Maximum beats per scene.
    pub max_beats: usize,
    /// Words after which a beat closes.
    pub word_budget: usize,
    /// Beats shorter than this never close on a soft boundary.
    pub min_words: usize,
}

impl RhythmPolicy {
    /// Derives the policy from shot preference and tone.
    #[must_use]
    pub fn for_settings(preference: ShotPreference, tone: Tone, tuning: &PipelineTuning) -> Self {
        let tone_bonus = match tone {
            Tone::Dramatic | Tone::Dark | Tone::Playful => 1,
            Tone::Neutral | Tone::Uplifting => 0,
        };
        Self {
            max_beats: tuning.beat_cap.get(preference) + tone_bonus,
            word_budget: tuning.beat_word_budget.get(preference),
            min_words: tuning.min_beat_words,
        }
    }
}

/// What a unit of scene text represents.
#[derive(Debug, Clone, PartialEq, Eq)]
enum UnitKind {
    Action,
    Dialogue { speaker: String },
    Shot,
}

#[derive(Debug, Clone)]
struct Unit {
    text: String,
    kind: UnitKind,
    words: usize,
    subject: Option<String>,
    transition: bool,
    forced: bool,
}

/// A beat before prompt composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeatDraft {
    /// Script excerpt.
    pub narration: String,
    /// Speakers of dialogue inside the beat, in order.
    pub speakers: Vec<String>,
    /// Whether the beat holds any dialogue.
    pub has_dialogue: bool,
    /// Whether the beat came from an explicit `SHOT:` marker.
    pub explicit_shot: bool,
    /// Word count used for timing.
    pub words: usize,
}

static INLINE_DIALOGUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([\p{Lu}][\p{L}'’.\-]*(?:\s+[\p{Lu}][\p{L}'’.\-]*){0,2})\s*:\s+(\S.*)$")
        .expect("valid regex")
});

static TRANSITION_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(fade in|fade out|fade to black|cut to|smash cut to|match cut to|dissolve to|corte para|corte a|fundido a negro|fondu|cut)\s*[:.]?\s*$",
    )
    .expect("valid regex")
});

static EXTENSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]*\)\s*$").expect("valid regex"));

/// Returns the speaker name when `line` is a screenplay character cue.
fn speaker_cue(line: &str) -> Option<String> {
    let name = EXTENSION_RE.replace(line.trim(), "");
    let name = name.trim();
    let words = name.split_whitespace().count();
    if (1..=4).contains(&words)
        && name.chars().count() <= 32
        && is_all_caps(name)
        && !name.ends_with(':')
        && !name.chars().any(|c| matches!(c, '.' | '!' | '?' | '—' | '–'))
        && !name.contains(" - ")
        && !lexicon::is_non_name(name)
    {
        Some(title_case(name))
    } else {
        None
    }
}

/// First capitalized token that can be a name, normalized to title case.
fn lead_subject(text: &str) -> Option<String> {
    text.split_whitespace()
        .map(clean_token)
        .find(|token| {
            token.chars().count() > 1
                && is_capitalized(token)
                && token.chars().next().is_some_and(char::is_alphabetic)
                && !lexicon::is_non_name(token)
        })
        .map(title_case)
}

fn action_unit(text: &str, forced: bool) -> Unit {
    Unit {
        text: text.to_owned(),
        kind: UnitKind::Action,
        words: count_words(text),
        subject: lead_subject(text),
        transition: lexicon::opens_with_transition(text),
        forced,
    }
}

fn dialogue_unit(speaker: String, line: &str, forced: bool) -> Unit {
    let text = format!("{speaker}: {line}");
    Unit {
        words: count_words(line),
        text,
        subject: Some(speaker.clone()),
        kind: UnitKind::Dialogue { speaker },
        transition: false,
        forced,
    }
}

/// Splits buffered prose into sentence units.
fn flush_prose(prose: &mut Vec<&str>, units: &mut Vec<Unit>, force_next: &mut bool) {
    if prose.is_empty() {
        return;
    }
    let paragraph = prose.join(" ");
    prose.clear();
    for sentence in split_sentences(&paragraph) {
        units.push(action_unit(sentence, *force_next));
        *force_next = false;
    }
}

fn split_units(body: &str) -> Vec<Unit> {
    let lines: Vec<&str> = body.lines().map(str::trim).collect();
    let mut units = Vec::new();
    let mut prose: Vec<&str> = Vec::new();
    let mut force_next = false;
    let mut pending_speaker: Option<String> = None;
    let mut parenthetical = String::new();

    for (i, line) in lines.iter().copied().enumerate() {
        if line.is_empty() {
            flush_prose(&mut prose, &mut units, &mut force_next);
            pending_speaker = None;
            continue;
        }
        if TRANSITION_LINE_RE.is_match(line) {
            flush_prose(&mut prose, &mut units, &mut force_next);
            force_next = true;
            continue;
        }
        if let Some(rest) = line.strip_prefix(SHOT_PREFIX) {
            flush_prose(&mut prose, &mut units, &mut force_next);
            let rest = rest.trim();
            if rest.is_empty() {
                force_next = true;
            } else {
                units.push(Unit {
                    kind: UnitKind::Shot,
                    ..action_unit(rest, true)
                });
                force_next = false;
            }
            continue;
        }
        if let Some(speaker) = pending_speaker.clone() {
            if line.starts_with('(') && line.ends_with(')') {
                parenthetical = format!("{line} ");
                continue;
            }
            let spoken = format!("{parenthetical}{line}");
            parenthetical.clear();
            let continues = units.last().is_some_and(|u: &Unit| {
                matches!(&u.kind, UnitKind::Dialogue { speaker: s } if *s == speaker)
            });
            if continues {
                if let Some(last) = units.last_mut() {
                    last.text.push(' ');
                    last.text.push_str(&spoken);
                    last.words += count_words(&spoken);
                }
            } else {
                units.push(dialogue_unit(speaker, &spoken, force_next));
                force_next = false;
            }
            continue;
        }
        let next_is_text = lines.get(i + 1).is_some_and(|next| !next.is_empty());
        if prose.is_empty() && next_is_text {
            if let Some(speaker) = speaker_cue(line) {
                pending_speaker = Some(speaker);
                continue;
            }
        }
        if let Some(caps) = INLINE_DIALOGUE_RE.captures(line) {
            let speaker = caps.get(1).map_or("", |m| m.as_str());
            let spoken = caps.get(2).map_or("", |m| m.as_str());
            if !lexicon::is_non_name(speaker) {
                flush_prose(&mut prose, &mut units, &mut force_next);
                units.push(dialogue_unit(title_case(speaker), spoken, force_next));
                force_next = false;
                continue;
            }
        }
        prose.push(line);
    }
    flush_prose(&mut prose, &mut units, &mut force_next);
    units
}

fn is_boundary(current: &[Unit], current_words: usize, unit: &Unit, policy: RhythmPolicy) -> bool {
    let Some(last) = current.last() else {
        return false;
    };
    if unit.forced || unit.kind == UnitKind::Shot || last.kind == UnitKind::Shot {
        return true;
    }
    let kind_change = match (&last.kind, &unit.kind) {
        (UnitKind::Dialogue { speaker: a }, UnitKind::Dialogue { speaker: b }) => a != b,
        (UnitKind::Action, UnitKind::Action) => false,
        _ => true,
    };
    if kind_change {
        return true;
    }
    let subject_change = match (&current.iter().rev().find_map(|u| u.subject.clone()), &unit.subject) {
        (Some(a), Some(b)) => a != b,
        _ => false,
    };
    let soft = unit.transition || subject_change || current_words + unit.words > policy.word_budget;
    soft && current_words >= policy.min_words
}

fn into_draft(units: Vec<Unit>) -> BeatDraft {
    let mut speakers: Vec<String> = Vec::new();
    for unit in &units {
        if let UnitKind::Dialogue { speaker } = &unit.kind {
            if !speakers.contains(speaker) {
                speakers.push(speaker.clone());
            }
        }
    }
    BeatDraft {
        narration: units.iter().map(|u| u.text.as_str()).collect::<Vec<_>>().join(" "),
        has_dialogue: !speakers.is_empty(),
        speakers,
        explicit_shot: units.iter().any(|u| u.kind == UnitKind::Shot),
        words: units.iter().map(|u| u.words).sum(),
    }
}

fn merge_pair(first: BeatDraft, second: BeatDraft) -> BeatDraft {
    let mut speakers = first.speakers;
    for speaker in second.speakers {
        if !speakers.contains(&speaker) {
            speakers.push(speaker);
        }
    }
    BeatDraft {
        narration: format!("{} {}", first.narration, second.narration),
        has_dialogue: first.has_dialogue || second.has_dialogue,
        speakers,
        explicit_shot: first.explicit_shot || second.explicit_shot,
        words: first.words + second.words,
    }
}

/// Merges the adjacent pair with the smallest combined length until the
/// scene fits within `max_beats`.
fn enforce_cap(mut beats: Vec<BeatDraft>, max_beats: usize) -> Vec<BeatDraft> {
    while beats.len() > max_beats.max(1) {
        let Some(at) = (0..beats.len() - 1).min_by_key(|i| beats[*i].words + beats[i + 1].words)
        else {
            break;
        };
        let second = beats.remove(at + 1);
        let first = beats.remove(at);
        beats.insert(at, merge_pair(first, second));
    }
    beats
}

/// Splits a scene body into beats. Always returns at least one beat; a
/// heading-only scene becomes a single establishing beat.
#[must_use]
pub fn extract_beats(
    body: &str,
    heading: Option<&SceneHeading>,
    policy: RhythmPolicy,
) -> Vec<BeatDraft> {
    let mut beats = Vec::new();
    let mut current: Vec<Unit> = Vec::new();
    let mut current_words = 0;

    for unit in split_units(body) {
        if is_boundary(&current, current_words, &unit, policy) {
            beats.push(into_draft(std::mem::take(&mut current)));
            current_words = 0;
        }
        current_words += unit.words;
        current.push(unit);
    }
    if !current.is_empty() {
        beats.push(into_draft(current));
    }

    if beats.is_empty() {
        let establishing = heading.map_or_else(|| body.trim().to_owned(), SceneHeading::title);
        beats.push(BeatDraft {
            words: count_words(&establishing).max(1),
            narration: establishing,
            speakers: Vec::new(),
            has_dialogue: false,
            explicit_shot: false,
        });
    }

    enforce_cap(beats, policy.max_beats)
}

//! Decomposes a normalized script into timed scene and beat drafts.
//!
//! Runs the Scene Segmenter and the Beat Extractor in document order and
//! assigns the stable scene and beat identifiers used by every later stage.

use storyframe_core::config::PipelineTuning;
use storyframe_core::error::StoryboardError;
use tracing::{debug, warn};

use crate::domain::beats::{BeatDraft, RhythmPolicy, extract_beats};
use crate::domain::document::ScriptDocument;
use crate::domain::segmenter::{SceneHeading, SceneSegment, segment, single_scene};
use crate::domain::text::{headline, split_sentences, truncate_words};
use crate::domain::timing::{beat_starts, scene_duration};

const TITLE_WORDS: usize = 6;
const SUMMARY_SENTENCES: usize = 2;
const SUMMARY_CHARS: usize = 200;

/// A beat with its identifier and absolute start offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedBeat {
    /// `{sceneId}.{n}`, 1-based.
    pub id: String,
    /// Seconds from the start of the storyboard.
    pub start_seconds: u32,
    /// Extracted beat content.
    pub draft: BeatDraft,
}

/// A scene ready for continuity tracking.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDraft {
    /// `scene-{n}`, 1-based.
    pub id: String,
    /// Zero-based position in the document.
    pub position: usize,
    /// Heading-derived or inferred title.
    pub title: String,
    /// Short narrative summary.
    pub summary: String,
    /// Parsed heading, if the scene had one.
    pub heading: Option<SceneHeading>,
    /// Scene body text.
    pub body: String,
    /// Ordered beats.
    pub beats: Vec<TimedBeat>,
    /// Offset of the scene's first beat.
    pub start_seconds: u32,
    /// Approximate scene length.
    pub duration_seconds: u32,
}

fn infer_title(segment: &SceneSegment, number: usize) -> String {
    if let Some(heading) = &segment.heading {
        return heading.title();
    }
    split_sentences(&segment.body)
        .first()
        .map(|sentence| headline(sentence, TITLE_WORDS))
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| format!("Scene {number}"))
}

fn summarize(segment: &SceneSegment, title: &str) -> String {
    let flattened = segment.body.split_whitespace().collect::<Vec<_>>().join(" ");
    let sentences = split_sentences(&flattened);
    if sentences.is_empty() {
        return title.to_owned();
    }
    let lead = sentences
        .iter()
        .take(SUMMARY_SENTENCES)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    truncate_words(&lead, SUMMARY_CHARS)
}

fn segments_for(document: &ScriptDocument, tuning: &PipelineTuning) -> Vec<SceneSegment> {
    match segment(document.text(), document.shot_preference(), tuning) {
        Ok(segments) => segments,
        Err(StoryboardError::SegmentationFailure(reason)) => {
            warn!(%reason, "segmentation failed, using a single scene");
            single_scene(document.text())
        }
        Err(e) => {
            warn!(error = %e, "unexpected segmentation error, using a single scene");
            single_scene(document.text())
        }
    }
}

/// Splits a document into ordered, timed scene drafts.
///
/// Never fails: a segmentation failure degrades to one scene holding the
/// whole text, and every scene carries at least one beat.
#[must_use]
pub fn decompose(document: &ScriptDocument, tuning: &PipelineTuning) -> Vec<SceneDraft> {
    let preference = document.shot_preference();
    let policy = RhythmPolicy::for_settings(preference, document.tone(), tuning);

    let mut scenes = Vec::new();
    let mut clock = 0u32;
    for (position, segment) in segments_for(document, tuning).into_iter().enumerate() {
        let number = position + 1;
        let id = format!("scene-{number}");
        let drafts = extract_beats(&segment.body, segment.heading.as_ref(), policy);

        let words: Vec<usize> = drafts.iter().map(|beat| beat.words).collect();
        let duration = scene_duration(words.iter().sum(), drafts.len(), preference, tuning);
        let starts = beat_starts(clock, duration, &words);

        let beats: Vec<TimedBeat> = drafts
            .into_iter()
            .zip(starts)
            .enumerate()
            .map(|(i, (draft, start_seconds))| TimedBeat {
                id: format!("{id}.{}", i + 1),
                start_seconds,
                draft,
            })
            .collect();

        let title = infer_title(&segment, number);
        let summary = summarize(&segment, &title);
        debug!(scene_id = %id, beats = beats.len(), duration, "scene decomposed");

        scenes.push(SceneDraft {
            id,
            position,
            title,
            summary,
            heading: segment.heading,
            body: segment.body,
            beats,
            start_seconds: clock,
            duration_seconds: duration,
        });
        clock = clock.saturating_add(duration);
    }
    scenes
}

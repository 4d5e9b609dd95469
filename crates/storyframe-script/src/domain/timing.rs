//! Approximate screen timing for scenes and beats.

use storyframe_core::config::PipelineTuning;
use storyframe_core::settings::ShotPreference;

/// Estimated scene length in whole seconds.
///
/// Narration pace sets the floor, and every beat gets at least the minimum
/// shot time.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn scene_duration(
    words: usize,
    beat_count: usize,
    preference: ShotPreference,
    tuning: &PipelineTuning,
) -> u32 {
    let narrated = (words as f64 / tuning.words_per_second * tuning.pace.get(preference)).ceil();
    let narrated = narrated.clamp(0.0, f64::from(u32::MAX)) as u32;
    let beats = u32::try_from(beat_count).unwrap_or(u32::MAX);
    narrated.max(beats.saturating_mul(tuning.min_shot_seconds)).max(1)
}

/// Distributes `duration` over beats proportionally to their word counts.
///
/// Returns absolute start offsets: the first equals `scene_start`, and each
/// following one is at least one second after its predecessor.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn beat_starts(scene_start: u32, duration: u32, beat_words: &[usize]) -> Vec<u32> {
    let total: usize = beat_words.iter().map(|w| (*w).max(1)).sum::<usize>().max(1);
    let mut starts = Vec::with_capacity(beat_words.len());
    let mut cumulative = 0usize;
    for words in beat_words {
        let offset = (cumulative as f64 * f64::from(duration) / total as f64).round() as u32;
        let mut start = scene_start.saturating_add(offset);
        if let Some(previous) = starts.last() {
            start = start.max(previous + 1);
        }
        starts.push(start);
        cumulative += (*words).max(1);
    }
    starts
}

/// Formats seconds as `MM:SS`, or `H:MM:SS` from one hour on.
#[must_use]
pub fn format_timecode(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

/// Formats a duration as `18s` or `1m 05s`.
#[must_use]
pub fn format_duration(seconds: u32) -> String {
    if seconds < 60 {
        format!("{seconds}s")
    } else {
        format!("{}m {:02}s", seconds / 60, seconds % 60)
    }
}

//! Pipeline configuration and heuristic tuning.
//!
//! Every heuristic threshold used by segmentation, beat extraction and
//! palette derivation lives in [`PipelineTuning`], so deployments can
//! override them from a YAML file without a rebuild.

use std::time::Duration;

use serde::Deserialize;

use crate::error::StoryboardError;
use crate::settings::ShotPreference;

/// Most swatches a single SHA-256 digest yields (four bytes each).
pub const MAX_CHARACTER_PALETTE: usize = 8;

/// A value chosen per shot preference.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ShotTable<T> {
    /// Value for `compact`.
    pub compact: T,
    /// Value for `balanced`.
    pub balanced: T,
    /// Value for `cinematic`.
    pub cinematic: T,
}

impl<T: Copy> ShotTable<T> {
    /// Returns the entry for `preference`.
    #[must_use]
    pub fn get(&self, preference: ShotPreference) -> T {
        match preference {
            ShotPreference::Compact => self.compact,
            ShotPreference::Balanced => self.balanced,
            ShotPreference::Cinematic => self.cinematic,
        }
    }

    fn values(&self) -> [T; 3] {
        [self.compact, self.balanced, self.cinematic]
    }
}

/// Tunable heuristic thresholds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineTuning {
    /// Target words per scene for paragraph-density segmentation.
    pub words_per_scene: ShotTable<usize>,
    /// Upper bound on scenes produced by the density fallback.
    pub max_scenes: usize,
    /// Maximum beats per scene before tone adjustment.
    pub beat_cap: ShotTable<usize>,
    /// Word budget after which a beat is closed.
    pub beat_word_budget: ShotTable<usize>,
    /// Beats shorter than this never close on a soft boundary.
    pub min_beat_words: usize,
    /// Narration pace used to estimate durations.
    pub words_per_second: f64,
    /// Duration multiplier per shot preference.
    pub pace: ShotTable<f64>,
    /// Minimum screen time of a single beat, in seconds.
    pub min_shot_seconds: u32,
    /// Maximum colors in the document palette.
    pub palette_max: usize,
    /// Colors derived for each character, at most
    /// [`MAX_CHARACTER_PALETTE`].
    pub character_palette_size: usize,
}

impl Default for PipelineTuning {
    fn default() -> Self {
        Self {
            words_per_scene: ShotTable {
                compact: 220,
                balanced: 130,
                cinematic: 70,
            },
            max_scenes: 24,
            beat_cap: ShotTable {
                compact: 3,
                balanced: 5,
                cinematic: 8,
            },
            beat_word_budget: ShotTable {
                compact: 60,
                balanced: 38,
                cinematic: 22,
            },
            min_beat_words: 4,
            words_per_second: 2.5,
            pace: ShotTable {
                compact: 0.85,
                balanced: 1.0,
                cinematic: 1.25,
            },
            min_shot_seconds: 2,
            palette_max: 8,
            character_palette_size: 4,
        }
    }
}

impl PipelineTuning {
    /// Parses tuning overrides from YAML; omitted keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `StoryboardError::Validation` if the YAML is malformed or a
    /// threshold is out of range.
    pub fn from_yaml_str(source: &str) -> Result<Self, StoryboardError> {
        let tuning: Self = serde_yaml::from_str(source)
            .map_err(|e| StoryboardError::Validation(format!("invalid tuning file: {e}")))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Checks that every threshold is usable.
    ///
    /// # Errors
    ///
    /// Returns `StoryboardError::Validation` naming the first bad field.
    pub fn validate(&self) -> Result<(), StoryboardError> {
        let invalid = |field: &str| {
            Err(StoryboardError::Validation(format!(
                "tuning field `{field}` must be positive"
            )))
        };
        if self.words_per_scene.values().contains(&0) {
            return invalid("words_per_scene");
        }
        if self.beat_cap.values().contains(&0) {
            return invalid("beat_cap");
        }
        if self.beat_word_budget.values().contains(&0) {
            return invalid("beat_word_budget");
        }
        if self.pace.values().iter().any(|p| *p <= 0.0) {
            return invalid("pace");
        }
        if self.max_scenes == 0 {
            return invalid("max_scenes");
        }
        if self.words_per_second <= 0.0 {
            return invalid("words_per_second");
        }
        if self.min_shot_seconds == 0 {
            return invalid("min_shot_seconds");
        }
        if self.palette_max == 0 {
            return invalid("palette_max");
        }
        if self.character_palette_size == 0 {
            return invalid("character_palette_size");
        }
        if self.character_palette_size > MAX_CHARACTER_PALETTE {
            return Err(StoryboardError::Validation(format!(
                "tuning field `character_palette_size` must be at most {MAX_CHARACTER_PALETTE}"
            )));
        }
        Ok(())
    }
}

/// Runtime configuration for one pipeline instance.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Heuristic thresholds.
    pub tuning: PipelineTuning,
    /// Budget for each enrichment call.
    pub enrichment_timeout: Duration,
    /// Maximum enrichment calls in flight per run.
    pub compose_concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tuning: PipelineTuning::default(),
            enrichment_timeout: Duration::from_millis(2500),
            compose_concurrency: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults_for_missing_keys() {
        let yaml = "palette_max: 5\nbeat_cap:\n  compact: 2\n  balanced: 4\n  cinematic: 9\n";

        let tuning = PipelineTuning::from_yaml_str(yaml).unwrap();

        assert_eq!(tuning.palette_max, 5);
        assert_eq!(tuning.beat_cap.get(ShotPreference::Cinematic), 9);
        assert_eq!(tuning.min_shot_seconds, 2);
    }

    #[test]
    fn test_zero_palette_is_rejected() {
        let result = PipelineTuning::from_yaml_str("palette_max: 0\n");

        match result.unwrap_err() {
            StoryboardError::Validation(msg) => assert!(msg.contains("palette_max")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_character_palette_larger_than_one_digest_is_rejected() {
        // Arrange
        let at_limit = format!("character_palette_size: {MAX_CHARACTER_PALETTE}\n");
        let over_limit = format!("character_palette_size: {}\n", MAX_CHARACTER_PALETTE + 1);

        // Act
        let accepted = PipelineTuning::from_yaml_str(&at_limit);
        let rejected = PipelineTuning::from_yaml_str(&over_limit);

        // Assert
        assert_eq!(accepted.unwrap().character_palette_size, MAX_CHARACTER_PALETTE);
        match rejected.unwrap_err() {
            StoryboardError::Validation(msg) => assert!(msg.contains("at most 8")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_yaml_is_rejected() {
        assert!(PipelineTuning::from_yaml_str("palette_max: [").is_err());
    }

    #[test]
    fn test_default_caps_grow_with_shot_preference() {
        let tuning = PipelineTuning::default();
        assert!(
            tuning.beat_cap.get(ShotPreference::Compact)
                <= tuning.beat_cap.get(ShotPreference::Cinematic)
        );
        assert!(
            tuning.words_per_scene.get(ShotPreference::Compact)
                >= tuning.words_per_scene.get(ShotPreference::Cinematic)
        );
    }
}

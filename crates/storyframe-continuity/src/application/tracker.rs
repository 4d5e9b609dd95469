//! Single linear pass that builds the continuity registry.
//!
//! Beats register in strict document order. The context handed to the
//! prompt composer for a beat is a snapshot taken right after that beat
//! registered, so later beats never change earlier prompts.

use storyframe_core::config::PipelineTuning;
use storyframe_script::application::decompose::SceneDraft;
use storyframe_script::domain::text::title_case;
use tracing::{info, warn};

use crate::domain::extraction::{
    Descriptors, corroborated_name_words, describe, observe_beat, parse_guide,
};
use crate::domain::registry::{CharacterView, ContinuityRegistry, Observed};

/// Registry state relevant to one beat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeatContext {
    /// Beat identifier.
    pub beat_id: String,
    /// Characters referenced by the beat, in order of first reference.
    pub characters: Vec<CharacterView>,
    /// Environments active in the scene so far.
    pub environments: Vec<String>,
    /// Motifs active in the scene so far.
    pub motifs: Vec<String>,
    /// Props seen in the beat.
    pub props: Vec<String>,
}

/// Per-scene continuity context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneContext {
    /// Scene identifier.
    pub scene_id: String,
    /// Beat contexts, in beat order.
    pub beats: Vec<BeatContext>,
}

/// Result of tracking a whole script.
#[derive(Debug, Clone)]
pub struct TrackingOutcome {
    /// Final registry.
    pub registry: ContinuityRegistry,
    /// Per-scene contexts, in scene order.
    pub scenes: Vec<SceneContext>,
}

fn push_unique(list: &mut Vec<String>, value: Option<String>) {
    if let Some(value) = value {
        if !list.contains(&value) {
            list.push(value);
        }
    }
}

fn register_guide(registry: &mut ContinuityRegistry, guide: &str) {
    for (name, description) in parse_guide(guide) {
        let index = match registry.resolve(&name) {
            Some(index) => index,
            None => registry.create_character(&name, Some(&description)),
        };
        registry.merge_descriptors(index, &describe(&description), None);
    }
}

/// Tracks characters, environments and motifs across all scenes.
#[must_use]
pub fn track(
    scenes: &[SceneDraft],
    character_guide: Option<&str>,
    tuning: &PipelineTuning,
) -> TrackingOutcome {
    let mut registry = ContinuityRegistry::new(tuning.character_palette_size);
    if let Some(guide) = character_guide {
        register_guide(&mut registry, guide);
    }

    let scene_texts: Vec<String> = scenes
        .iter()
        .map(|scene| {
            scene
                .beats
                .iter()
                .map(|beat| beat.draft.narration.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    let corroborated = corroborated_name_words(scene_texts.iter().map(String::as_str));

    let mut contexts = Vec::with_capacity(scenes.len());
    for scene in scenes {
        let mut environments: Vec<String> = Vec::new();
        let mut motifs: Vec<String> = Vec::new();
        let mut last_subject: Option<String> = None;

        if let Some(location) = scene.heading.as_ref().and_then(|h| h.location.as_deref()) {
            push_unique(&mut environments, registry.register_environment(&title_case(location)));
        }

        let mut beats = Vec::with_capacity(scene.beats.len());
        for beat in &scene.beats {
            let at = Observed {
                scene_index: scene.position,
                beat_id: beat.id.clone(),
            };
            let mut referenced: Vec<usize> = Vec::new();

            for speaker in &beat.draft.speakers {
                let (index, _) = registry.register_character(speaker, &Descriptors::default(), Some(&at));
                if !referenced.contains(&index) {
                    referenced.push(index);
                }
            }

            let observations =
                observe_beat(&beat.draft.narration, &registry, &corroborated, &mut last_subject);
            for mention in &observations.mentions {
                let (index, conflicts) =
                    registry.register_character(&mention.name, &mention.descriptors, Some(&at));
                for conflict in &conflicts {
                    warn!(
                        character_id = %conflict.character_id,
                        error = %conflict.to_error(),
                        "continuity conflict recorded"
                    );
                }
                if !referenced.contains(&index) {
                    referenced.push(index);
                }
            }
            for index in &referenced {
                registry.record_reference(*index);
            }

            for environment in &observations.environments {
                push_unique(&mut environments, registry.register_environment(environment));
            }
            for word in &observations.atmosphere {
                push_unique(&mut motifs, registry.register_motif(word));
            }
            for prop in &observations.props {
                push_unique(&mut motifs, registry.record_prop(prop, &beat.id));
            }
            for color in &observations.color_cues {
                registry.record_color_cue(color);
            }

            beats.push(BeatContext {
                beat_id: beat.id.clone(),
                characters: referenced.iter().filter_map(|i| registry.view(*i)).collect(),
                environments: environments.clone(),
                motifs: motifs.clone(),
                props: observations.props.clone(),
            });
        }

        contexts.push(SceneContext {
            scene_id: scene.id.clone(),
            beats,
        });
    }

    info!(
        characters = registry.characters().len(),
        environments = registry.environments().len(),
        motifs = registry.motifs().len(),
        conflicts = registry.conflicts().len(),
        "continuity tracked"
    );

    TrackingOutcome {
        registry,
        scenes: contexts,
    }
}

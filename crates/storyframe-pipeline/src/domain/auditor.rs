//! Consistency audit of composed scenes against the final registry.

use storyframe_continuity::domain::registry::{
    ContinuityConflict, ContinuityRegistry, GarmentObservation,
};
use storyframe_core::error::StoryboardError;
use storyframe_prompt::application::compose::ComposedScene;

fn conflict_note(conflict: &ContinuityConflict) -> String {
    let origin = match conflict.established_scene {
        Some(scene) => format!("in scene {}", scene + 1),
        None => "in the character guide".to_owned(),
    };
    format!(
        "{}'s {} is {} in {} but was established as {} {}",
        conflict.name,
        conflict.attribute,
        conflict.observed,
        conflict.beat_id,
        conflict.established,
        origin
    )
}

fn garment_notes(scene_index: usize, garments: &[GarmentObservation]) -> Vec<String> {
    // (character id, garment) -> distinct (colour, first beat) in order
    let mut groups: Vec<((&str, &str), Vec<(&str, &str)>)> = Vec::new();
    for observation in garments.iter().filter(|g| g.scene_index == scene_index) {
        let key = (observation.character_id.as_str(), observation.garment.as_str());
        let position = match groups.iter().position(|(k, _)| *k == key) {
            Some(position) => position,
            None => {
                groups.push((key, Vec::new()));
                groups.len() - 1
            }
        };
        let colors = &mut groups[position].1;
        if !colors.iter().any(|(color, _)| *color == observation.color) {
            colors.push((observation.color, observation.beat_id.as_str()));
        }
    }

    groups
        .into_iter()
        .filter(|(_, colors)| colors.len() > 1)
        .filter_map(|((character_id, garment), colors)| {
            let name = garments
                .iter()
                .find(|g| g.character_id == character_id)
                .map(|g| g.name.as_str())?;
            let seen: Vec<String> = colors
                .iter()
                .map(|(color, beat)| format!("{color} in {beat}"))
                .collect();
            Some(format!(
                "{name}'s {garment} changes color within the scene: {}",
                seen.join(", ")
            ))
        })
        .collect()
}

/// Produces the ordered consistency notes for every scene.
///
/// Descriptor drift becomes a note on the scene where it was observed;
/// disagreeing garment colours within one scene become a palette note.
///
/// # Errors
///
/// Returns `StoryboardError::InternalInvariantViolation` if a beat names a
/// character that has no registry entry.
pub fn audit(
    scenes: &[ComposedScene],
    registry: &ContinuityRegistry,
) -> Result<Vec<Vec<String>>, StoryboardError> {
    let mut notes = Vec::with_capacity(scenes.len());
    for (index, scene) in scenes.iter().enumerate() {
        for composed in &scene.beats {
            for name in &composed.beat.continuity.characters {
                let entries = registry
                    .characters()
                    .iter()
                    .filter(|record| record.name() == name)
                    .count();
                if entries != 1 {
                    return Err(StoryboardError::InternalInvariantViolation(format!(
                        "beat {} references character {name} with {entries} registry entries",
                        composed.beat.beat_id
                    )));
                }
            }
        }

        let mut scene_notes: Vec<String> = registry
            .conflicts()
            .iter()
            .filter(|conflict| conflict.scene_index == index)
            .map(conflict_note)
            .collect();
        scene_notes.extend(garment_notes(index, registry.garments()));
        scene_notes.dedup();
        notes.push(scene_notes);
    }
    Ok(notes)
}

#[cfg(test)]
mod tests {
    use storyframe_continuity::application::tracker::{TrackingOutcome, track};
    use storyframe_core::config::PipelineTuning;
    use storyframe_core::settings::{ScriptLanguage, ShotPreference, Tone, VisualStyle};
    use storyframe_prompt::application::compose::compose_scenes;
    use storyframe_prompt::domain::composer::ComposeSettings;
    use storyframe_script::application::decompose::decompose;
    use storyframe_script::domain::document::ScriptDocument;

    use super::*;

    fn prepare(script: &str, guide: Option<&str>) -> (Vec<ComposedScene>, TrackingOutcome) {
        let tuning = PipelineTuning::default();
        let document = ScriptDocument::new(
            "Test".to_owned(),
            script.to_owned(),
            ScriptLanguage::En,
            VisualStyle::Realistic,
            Tone::Neutral,
            ShotPreference::Balanced,
            guide.map(ToOwned::to_owned),
        );
        let drafts = decompose(&document, &tuning);
        let outcome = track(&drafts, guide, &tuning);
        let composed = compose_scenes(
            &drafts,
            &outcome.scenes,
            ComposeSettings {
                visual_style: VisualStyle::Realistic,
                tone: Tone::Neutral,
                shot_preference: ShotPreference::Balanced,
            },
        )
        .unwrap();
        (composed, outcome)
    }

    #[test]
    fn test_clean_script_has_no_notes() {
        let (scenes, outcome) = prepare("Maria enters the old kitchen. She lights a candle.", None);

        let notes = audit(&scenes, &outcome.registry).unwrap();

        assert_eq!(notes, vec![Vec::<String>::new()]);
    }

    #[test]
    fn test_age_drift_is_noted_on_the_observed_scene() {
        // Arrange
        let script = "INT. HOUSE - DAY\nYoung Maria plays in the garden.\n\n\
                      INT. SCHOOL - DAY\nJoão reads quietly.\n\n\
                      INT. HOUSE - NIGHT\nMaria, now elderly, sits by the window.";
        let (scenes, outcome) = prepare(script, None);

        // Act
        let notes = audit(&scenes, &outcome.registry).unwrap();

        // Assert
        assert_eq!(notes.len(), 3);
        assert!(notes[0].is_empty());
        assert!(notes[1].is_empty());
        assert_eq!(
            notes[2],
            vec!["Maria's age is elderly in scene-3.1 but was established as young in scene 1".to_owned()]
        );
    }

    #[test]
    fn test_guide_drift_references_the_character_guide() {
        let (scenes, outcome) =
            prepare("Young Maria runs to school.", Some("Maria: elderly woman"));

        let notes = audit(&scenes, &outcome.registry).unwrap();

        assert_eq!(notes[0].len(), 1);
        assert!(notes[0][0].ends_with("established as elderly in the character guide"));
    }

    #[test]
    fn test_garment_color_change_within_a_scene_is_noted() {
        // Arrange
        let script = "Maria wears a red scarf.\n\nSHOT: Maria wears a blue scarf.";
        let (scenes, outcome) = prepare(script, None);

        // Act
        let notes = audit(&scenes, &outcome.registry).unwrap();

        // Assert
        assert_eq!(
            notes[0],
            vec![
                "Maria's scarf changes color within the scene: red in scene-1.1, blue in scene-1.2"
                    .to_owned()
            ]
        );
    }

    #[test]
    fn test_unregistered_character_is_an_internal_fault() {
        // Arrange
        let (scenes, _) = prepare("Maria enters the old kitchen. She lights a candle.", None);
        let empty = ContinuityRegistry::new(5);

        // Act
        let result = audit(&scenes, &empty);

        // Assert
        assert!(matches!(result, Err(StoryboardError::InternalInvariantViolation(_))));
    }
}

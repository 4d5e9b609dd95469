//! The continuity registry.
//!
//! Holds every character, environment and motif seen so far in one
//! generation run. Character lookup goes through an alias index; creating a
//! character and merging new descriptors into it are separate operations,
//! and a merge never overwrites an established exclusive attribute.

use std::collections::HashMap;

use storyframe_core::error::StoryboardError;
use storyframe_core::storyboard::CharacterEntity;
use storyframe_script::domain::text::normalize_key;

use crate::domain::extraction::{Descriptors, NameOracle};
use crate::domain::lexicon::{self, AgeGroup};
use crate::domain::palette::character_palette;

/// Where in the script an observation was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observed {
    /// Zero-based scene position.
    pub scene_index: usize,
    /// Beat identifier.
    pub beat_id: String,
}

/// An exclusive attribute that disagreed with its established value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuityConflict {
    /// Character identifier.
    pub character_id: String,
    /// Character display name.
    pub name: String,
    /// `age` or `hair`.
    pub attribute: &'static str,
    /// Value kept by the registry.
    pub established: String,
    /// Value seen in the script.
    pub observed: String,
    /// Scene where the established value came from; `None` for the guide.
    pub established_scene: Option<usize>,
    /// Scene where the disagreement was observed.
    pub scene_index: usize,
    /// Beat where the disagreement was observed.
    pub beat_id: String,
}

impl ContinuityConflict {
    /// The soft error this conflict is reported as.
    #[must_use]
    pub fn to_error(&self) -> StoryboardError {
        StoryboardError::ContinuityConflict {
            entity: self.name.clone(),
            detail: format!(
                "{} {} in {} contradicts established {}",
                self.attribute, self.observed, self.beat_id, self.established
            ),
        }
    }
}

/// A coloured garment worn by a character in a specific beat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GarmentObservation {
    /// Character identifier.
    pub character_id: String,
    /// Character display name.
    pub name: String,
    /// Garment word.
    pub garment: String,
    /// Canonical colour name.
    pub color: &'static str,
    /// Zero-based scene position.
    pub scene_index: usize,
    /// Beat identifier.
    pub beat_id: String,
}

#[derive(Debug, Clone)]
struct Established<T> {
    value: T,
    scene: Option<usize>,
}

/// A tracked character.
#[derive(Debug, Clone)]
pub struct CharacterRecord {
    id: String,
    name: String,
    guide_description: Option<String>,
    fragments: Vec<String>,
    palette_seed: String,
    age: Option<Established<AgeGroup>>,
    hair: Option<Established<&'static str>>,
    explicit_colors: Vec<&'static str>,
    palette: Vec<String>,
    props: Vec<String>,
    beat_refs: usize,
    sequence: usize,
}

impl CharacterRecord {
    /// Stable identifier (`char-{n}`).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name as first seen.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current description: the guide text plus every descriptor the guide
    /// does not already mention.
    #[must_use]
    pub fn description(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(guide) = &self.guide_description {
            parts.push(guide.clone());
        }
        let guide_lower = self.guide_description.as_deref().unwrap_or("").to_lowercase();
        for fragment in &self.fragments {
            if !guide_lower.contains(&fragment.to_lowercase()) {
                parts.push(fragment.clone());
            }
        }
        parts.join(", ")
    }

    /// Colour palette.
    #[must_use]
    pub fn palette(&self) -> &[String] {
        &self.palette
    }

    /// Props handled by the character, in first-seen order.
    #[must_use]
    pub fn props(&self) -> &[String] {
        &self.props
    }

    /// Number of beats that referenced the character.
    #[must_use]
    pub fn beat_refs(&self) -> usize {
        self.beat_refs
    }

    fn push_fragment(&mut self, fragment: String) {
        if !self.fragments.contains(&fragment) {
            self.fragments.push(fragment);
        }
    }
}

/// A read-only copy of a character at one point of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterView {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Description at snapshot time.
    pub description: String,
    /// Palette at snapshot time.
    pub palette: Vec<String>,
}

#[derive(Debug, Clone)]
struct KeyedText {
    key: String,
    display: String,
}

#[derive(Debug, Clone)]
struct ColorCue {
    hex: &'static str,
    count: usize,
    sequence: usize,
}

/// Request-scoped continuity state.
#[derive(Debug, Clone)]
pub struct ContinuityRegistry {
    characters: Vec<CharacterRecord>,
    aliases: HashMap<String, usize>,
    environments: Vec<KeyedText>,
    motifs: Vec<KeyedText>,
    prop_beats: HashMap<String, Vec<String>>,
    color_cues: Vec<ColorCue>,
    conflicts: Vec<ContinuityConflict>,
    garments: Vec<GarmentObservation>,
    palette_size: usize,
    next_sequence: usize,
}

fn alias_key(name: &str) -> String {
    normalize_key(name)
}

impl ContinuityRegistry {
    /// Creates an empty registry deriving `palette_size` colours per
    /// character.
    #[must_use]
    pub fn new(palette_size: usize) -> Self {
        Self {
            characters: Vec::new(),
            aliases: HashMap::new(),
            environments: Vec::new(),
            motifs: Vec::new(),
            prop_beats: HashMap::new(),
            color_cues: Vec::new(),
            conflicts: Vec::new(),
            garments: Vec::new(),
            palette_size,
            next_sequence: 0,
        }
    }

    fn bump_sequence(&mut self) -> usize {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        sequence
    }

    /// Resolves `name` to a character index.
    ///
    /// Tries an exact match on the normalized alias first, then a
    /// whole-token match (`Maria` ↔ `Maria Silva`). A shorter name resolves
    /// through any alias that contains all of its tokens; a longer name only
    /// resolves when a canonical name covers part of it, so `João Silva`
    /// never folds into `Maria Silva` through the alias `Silva`. When several
    /// characters match on tokens, the earliest created wins.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<usize> {
        let key = alias_key(name);
        if key.is_empty() {
            return None;
        }
        if let Some(index) = self.aliases.get(&key) {
            return Some(*index);
        }
        let tokens: Vec<&str> = key.split(' ').collect();
        let within = |other: &str| {
            let other_tokens: Vec<&str> = other.split(' ').collect();
            tokens.iter().all(|t| other_tokens.contains(t))
        };
        let covers = |canonical: &str| canonical.split(' ').all(|t| tokens.contains(&t));

        let by_alias = self
            .aliases
            .iter()
            .filter(|(alias, _)| within(alias.as_str()))
            .map(|(_, index)| *index)
            .min();
        let by_name = self
            .characters
            .iter()
            .position(|record| covers(alias_key(&record.name).as_str()));
        match (by_alias, by_name) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Creates a new character and indexes its name.
    pub fn create_character(&mut self, name: &str, description: Option<&str>) -> usize {
        let index = self.characters.len();
        let sequence = self.bump_sequence();
        let guide_description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(ToOwned::to_owned);
        let palette_seed = guide_description.clone().unwrap_or_default();
        let palette = character_palette(name, &palette_seed, &[], self.palette_size);
        self.characters.push(CharacterRecord {
            id: format!("char-{}", index + 1),
            name: name.to_owned(),
            guide_description,
            fragments: Vec::new(),
            palette_seed,
            age: None,
            hair: None,
            explicit_colors: Vec::new(),
            palette,
            props: Vec::new(),
            beat_refs: 0,
            sequence,
        });
        self.aliases.insert(alias_key(name), index);
        index
    }

    /// Adds `alias` as another way to refer to the character at `index`.
    pub fn add_alias(&mut self, index: usize, alias: &str) {
        let key = alias_key(alias);
        if !key.is_empty() {
            self.aliases.entry(key).or_insert(index);
        }
    }

    /// Merges descriptors into an existing character.
    ///
    /// Additive for props, garments and fresh attributes. An age or hair
    /// colour that contradicts the established value is kept out of the
    /// record and returned as a conflict. `at` is `None` for descriptors
    /// that come from the character guide.
    pub fn merge_descriptors(
        &mut self,
        index: usize,
        descriptors: &Descriptors,
        at: Option<&Observed>,
    ) -> Vec<ContinuityConflict> {
        let mut conflicts = Vec::new();
        let Some(record) = self.characters.get_mut(index) else {
            return conflicts;
        };
        let scene = at.map(|o| o.scene_index);

        if let Some(age) = descriptors.age {
            match record.age.as_ref().map(|e| (e.value, e.scene)) {
                None => {
                    record.age = Some(Established { value: age, scene });
                    record.push_fragment(age.as_str().to_owned());
                }
                Some((established, established_scene)) if established != age => {
                    if let Some(observed) = at {
                        conflicts.push(ContinuityConflict {
                            character_id: record.id.clone(),
                            name: record.name.clone(),
                            attribute: "age",
                            established: established.as_str().to_owned(),
                            observed: age.as_str().to_owned(),
                            established_scene,
                            scene_index: observed.scene_index,
                            beat_id: observed.beat_id.clone(),
                        });
                    }
                }
                Some(_) => {}
            }
        }

        if let Some(hair) = descriptors.hair {
            match record.hair.as_ref().map(|e| (e.value, e.scene)) {
                None => {
                    record.hair = Some(Established { value: hair, scene });
                    record.push_fragment(format!("{hair} hair"));
                }
                Some((established, established_scene)) if established != hair => {
                    if let Some(observed) = at {
                        conflicts.push(ContinuityConflict {
                            character_id: record.id.clone(),
                            name: record.name.clone(),
                            attribute: "hair",
                            established: established.to_owned(),
                            observed: hair.to_owned(),
                            established_scene,
                            scene_index: observed.scene_index,
                            beat_id: observed.beat_id.clone(),
                        });
                    }
                }
                Some(_) => {}
            }
        }

        let mut palette_changed = false;
        for garment in &descriptors.garments {
            record.push_fragment(garment.label());
            if let Some(hex) = lexicon::color_hex(garment.color) {
                if !record.explicit_colors.contains(&hex) {
                    record.explicit_colors.push(hex);
                    palette_changed = true;
                }
            }
            if let Some(observed) = at {
                self.garments.push(GarmentObservation {
                    character_id: record.id.clone(),
                    name: record.name.clone(),
                    garment: garment.item.clone(),
                    color: garment.color,
                    scene_index: observed.scene_index,
                    beat_id: observed.beat_id.clone(),
                });
            }
        }
        if palette_changed {
            record.palette = character_palette(
                &record.name,
                &record.palette_seed,
                &record.explicit_colors,
                self.palette_size,
            );
        }

        for prop in &descriptors.props {
            if !record.props.contains(prop) {
                record.props.push(prop.clone());
            }
        }

        self.conflicts.extend(conflicts.iter().cloned());
        conflicts
    }

    /// Resolves or creates a character, then merges `descriptors` into it.
    /// Returns the character index and any conflicts raised by the merge.
    pub fn register_character(
        &mut self,
        name: &str,
        descriptors: &Descriptors,
        at: Option<&Observed>,
    ) -> (usize, Vec<ContinuityConflict>) {
        let index = match self.resolve(name) {
            Some(index) => {
                self.add_alias(index, name);
                index
            }
            None => self.create_character(name, None),
        };
        let conflicts = self.merge_descriptors(index, descriptors, at);
        (index, conflicts)
    }

    /// Counts one more beat referencing the character at `index`.
    pub fn record_reference(&mut self, index: usize) {
        if let Some(record) = self.characters.get_mut(index) {
            record.beat_refs += 1;
        }
    }

    /// Adds an environment, deduplicated by normalized text. Returns the
    /// display text of the stored entry.
    pub fn register_environment(&mut self, text: &str) -> Option<String> {
        register_keyed(&mut self.environments, text)
    }

    /// Adds a visual motif, deduplicated by normalized text. Returns the
    /// display text of the stored entry.
    pub fn register_motif(&mut self, text: &str) -> Option<String> {
        register_keyed(&mut self.motifs, text)
    }

    /// Records that `prop` appeared in `beat_id`. A prop seen in two
    /// different beats becomes a motif, whose display text is returned.
    pub fn record_prop(&mut self, prop: &str, beat_id: &str) -> Option<String> {
        let beats = self.prop_beats.entry(prop.to_owned()).or_default();
        if !beats.iter().any(|b| b == beat_id) {
            beats.push(beat_id.to_owned());
        }
        if beats.len() >= 2 {
            self.register_motif(prop)
        } else {
            None
        }
    }

    /// Counts an explicit colour cue from the script.
    pub fn record_color_cue(&mut self, color: &str) {
        let Some(hex) = lexicon::color_hex(color) else {
            return;
        };
        if let Some(cue) = self.color_cues.iter_mut().find(|c| c.hex == hex) {
            cue.count += 1;
            return;
        }
        let sequence = self.bump_sequence();
        self.color_cues.push(ColorCue {
            hex,
            count: 1,
            sequence,
        });
    }

    /// Derives the document palette.
    ///
    /// Character colours are weighted by how many beats reference the
    /// character and script cues by occurrence count. Colours are ordered by
    /// weight, then first-seen order, and capped at `max`.
    #[must_use]
    pub fn derive_palette(&self, max: usize) -> Vec<String> {
        let mut weighted: Vec<(String, usize, usize)> = Vec::new();
        let mut add = |hex: &str, weight: usize, sequence: usize| {
            if let Some(entry) = weighted.iter_mut().find(|(h, _, _)| h == hex) {
                entry.1 += weight;
                entry.2 = entry.2.min(sequence);
            } else {
                weighted.push((hex.to_owned(), weight, sequence));
            }
        };
        for record in &self.characters {
            for hex in &record.palette {
                add(hex, record.beat_refs.max(1), record.sequence);
            }
        }
        for cue in &self.color_cues {
            add(cue.hex, cue.count, cue.sequence);
        }
        weighted.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        weighted.into_iter().take(max).map(|(hex, _, _)| hex).collect()
    }

    /// Character at `index`.
    #[must_use]
    pub fn character(&self, index: usize) -> Option<&CharacterRecord> {
        self.characters.get(index)
    }

    /// Every character in creation order.
    #[must_use]
    pub fn characters(&self) -> &[CharacterRecord] {
        &self.characters
    }

    /// Snapshot of the character at `index`.
    #[must_use]
    pub fn view(&self, index: usize) -> Option<CharacterView> {
        self.characters.get(index).map(|record| CharacterView {
            id: record.id.clone(),
            name: record.name.clone(),
            description: record.description(),
            palette: record.palette.clone(),
        })
    }

    /// Environments in first-seen order.
    #[must_use]
    pub fn environments(&self) -> Vec<String> {
        self.environments.iter().map(|e| e.display.clone()).collect()
    }

    /// Visual motifs in first-seen order.
    #[must_use]
    pub fn motifs(&self) -> Vec<String> {
        self.motifs.iter().map(|m| m.display.clone()).collect()
    }

    /// Every conflict recorded so far, in document order.
    #[must_use]
    pub fn conflicts(&self) -> &[ContinuityConflict] {
        &self.conflicts
    }

    /// Every garment observation, in document order.
    #[must_use]
    pub fn garments(&self) -> &[GarmentObservation] {
        &self.garments
    }

    /// Character entities for the response.
    #[must_use]
    pub fn to_entities(&self) -> Vec<CharacterEntity> {
        self.characters
            .iter()
            .map(|record| CharacterEntity {
                id: record.id.clone(),
                name: record.name.clone(),
                description: record.description(),
                color_palette: record.palette.clone(),
                recurring_props: record.props.clone(),
            })
            .collect()
    }
}

impl NameOracle for ContinuityRegistry {
    fn is_known(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }
}

fn register_keyed(list: &mut Vec<KeyedText>, text: &str) -> Option<String> {
    let key = normalize_key(text);
    if key.is_empty() {
        return None;
    }
    if let Some(existing) = list.iter().find(|entry| entry.key == key) {
        return Some(existing.display.clone());
    }
    let display = text.trim().to_owned();
    list.push(KeyedText {
        key,
        display: display.clone(),
    });
    Some(display)
}

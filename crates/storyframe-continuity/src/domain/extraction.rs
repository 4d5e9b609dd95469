//! Entity and descriptor extraction from beat narration.
//!
//! Works sentence by sentence. Capitalized name candidates become anchors;
//! descriptors (age, hair colour, coloured garments) and props attach to the
//! nearest anchor. A sentence opening with a subject pronoun and naming
//! nobody anchors on the last character mentioned in the scene.

use std::collections::HashSet;

use storyframe_script::domain::lexicon as script_lexicon;
use storyframe_script::domain::text::{
    clean_token, is_all_caps, is_capitalized, split_sentences, title_case,
};

use crate::domain::lexicon::{self, AgeGroup};

/// Extra sentence openers that are never names.
const OPENERS: &[&str] = &[
    "somewhere", "nothing", "something", "everything", "anyone", "nearby", "upstairs",
    "downstairs", "across", "along", "through", "without", "under", "over", "around", "beyond",
    "together", "alone", "soon", "once", "twice", "today", "tonight", "tomorrow", "yesterday",
    "sometimes", "always", "never", "yet", "because", "although", "though", "since", "until",
    "unless", "whatever", "music", "nada", "algo", "tudo", "todos", "rien", "tout", "nichts",
    "alles", "niente", "tutto",
];

const CONJUNCTIONS: &[&str] = &["and", "e", "y", "et", "und", "ed"];

/// Words after which an age word describes the subject.
const COPULAS: &[&str] = &[
    "is", "was", "looks", "seems", "became", "becomes", "grows", "grew", "now", "é", "está",
    "era", "parece", "es", "est", "était", "semble", "ist", "war", "wirkt", "è", "sembra",
];

/// A garment seen in a given colour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Garment {
    /// Lower-cased garment word.
    pub item: String,
    /// Canonical colour name.
    pub color: &'static str,
}

impl Garment {
    /// Display form such as `red scarf`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.color, self.item)
    }
}

/// Descriptors observed for one character in one place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descriptors {
    /// Age group, if stated.
    pub age: Option<AgeGroup>,
    /// Canonical hair colour, if stated.
    pub hair: Option<&'static str>,
    /// Coloured garments.
    pub garments: Vec<Garment>,
    /// Props handled by the character.
    pub props: Vec<String>,
}

impl Descriptors {
    /// Returns `true` when nothing was observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.age.is_none() && self.hair.is_none() && self.garments.is_empty() && self.props.is_empty()
    }

    fn add_prop(&mut self, prop: &str) {
        if !self.props.iter().any(|p| p == prop) {
            self.props.push(prop.to_owned());
        }
    }
}

/// A named character with what the sentence says about them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mention {
    /// Name as written, title-cased.
    pub name: String,
    /// Descriptors attached to this mention.
    pub descriptors: Descriptors,
}

/// Everything extracted from one beat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeatObservations {
    /// Character mentions, merged per name, in order of first mention.
    pub mentions: Vec<Mention>,
    /// Location phrases (`the old kitchen` → `Old Kitchen`).
    pub environments: Vec<String>,
    /// Atmosphere words.
    pub atmosphere: Vec<String>,
    /// Props seen in the beat, attached or not.
    pub props: Vec<String>,
    /// Canonical colour names mentioned outside hair descriptions.
    pub color_cues: Vec<&'static str>,
}

impl BeatObservations {
    fn mention_mut(&mut self, name: &str) -> &mut Mention {
        let position = self.mentions.iter().position(|m| m.name == name);
        let index = position.unwrap_or_else(|| {
            self.mentions.push(Mention {
                name: name.to_owned(),
                descriptors: Descriptors::default(),
            });
            self.mentions.len() - 1
        });
        &mut self.mentions[index]
    }
}

/// Name lookups the extractor needs from the caller.
pub trait NameOracle {
    /// Returns `true` when `name` resolves to a registered character.
    fn is_known(&self, name: &str) -> bool;
}

struct Token<'a> {
    raw: &'a str,
    word: &'a str,
    lower: String,
}

impl Token<'_> {
    fn breaks_after(&self) -> bool {
        self.raw.chars().last().is_some_and(|c| !c.is_alphanumeric())
    }
}

fn tokenize(sentence: &str) -> Vec<Token<'_>> {
    sentence
        .split_whitespace()
        .map(|raw| {
            let word = clean_token(raw);
            Token {
                raw,
                word,
                lower: word.to_lowercase(),
            }
        })
        .filter(|token| !token.word.is_empty())
        .collect()
}

/// Returns `true` when a word looks like part of a personal name.
fn is_name_word(word: &str, lower: &str) -> bool {
    word.chars().count() > 1
        && word.chars().next().is_some_and(char::is_alphabetic)
        && is_capitalized(word)
        && !is_all_caps(word)
        && !word.chars().any(|c| c.is_ascii_digit())
        && !script_lexicon::is_non_name(lower)
        && !lexicon::is_tracked_noun(lower)
        && !OPENERS.contains(&lower)
}

/// Lower-cased name words that corroborate a bare capitalized word at the
/// start of a sentence.
///
/// A word qualifies when it is seen at least twice across `texts`, or when
/// it opens a sentence on its own and the next sentence of the same text
/// starts with a personal pronoun (`Nina waits. She ...`). Pass one text per
/// scene so a pronoun never reaches back into the previous scene.
#[must_use]
pub fn corroborated_name_words<'a>(texts: impl IntoIterator<Item = &'a str>) -> HashSet<String> {
    let mut seen = HashSet::new();
    let mut corroborated = HashSet::new();
    for text in texts {
        let sentences: Vec<Vec<Token<'_>>> = split_sentences(text).into_iter().map(tokenize).collect();
        for (position, tokens) in sentences.iter().enumerate() {
            for token in tokens {
                if is_name_word(token.word, &token.lower) && !seen.insert(token.lower.clone()) {
                    corroborated.insert(token.lower.clone());
                }
            }

            let Some(first) = tokens.first() else {
                continue;
            };
            let single = tokens
                .get(1)
                .is_none_or(|next| first.breaks_after() || !is_name_word(next.word, &next.lower));
            let pronoun_follows = sentences
                .get(position + 1)
                .and_then(|next| next.first())
                .is_some_and(|next| lexicon::is_subject_pronoun(&next.lower));
            if single && pronoun_follows && is_name_word(first.word, &first.lower) {
                corroborated.insert(first.lower.clone());
            }
        }
    }
    corroborated
}

struct Anchor {
    start: usize,
    end: usize,
    name: String,
}

/// Finds the character names in one sentence.
///
/// A lone capitalized word opening a sentence is only a name when something
/// else backs it up: the registry knows it, or it is in `corroborated`.
/// Anywhere else in the sentence capitalization is enough, except after a
/// place preposition or article.
fn find_anchors(
    tokens: &[Token<'_>],
    oracle: &dyn NameOracle,
    corroborated: &HashSet<String>,
) -> Vec<Anchor> {
    let mut anchors = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        if !is_name_word(tokens[i].word, &tokens[i].lower) {
            i += 1;
            continue;
        }
        let mut end = i;
        while end + 1 < tokens.len()
            && !tokens[end].breaks_after()
            && is_name_word(tokens[end + 1].word, &tokens[end + 1].lower)
        {
            end += 1;
        }
        let name = title_case(
            &tokens[i..=end]
                .iter()
                .map(|t| t.word)
                .collect::<Vec<_>>()
                .join(" "),
        );

        let previous = i.checked_sub(1).map(|p| &tokens[p]);
        let after_place_word = previous.is_some_and(|p| {
            !p.breaks_after()
                && (lexicon::is_place_preposition(&p.lower) || script_lexicon::is_article(&p.lower))
        });
        let sentence_initial = previous.is_none();
        // spoken text after a `Speaker:` cue only names people already seen
        let in_speech = tokens[..i].iter().any(|t| t.raw.ends_with(':'));

        let accepted = oracle.is_known(&name)
            || corroborated.contains(&tokens[i].lower)
            || (!in_speech
                && ((!sentence_initial && !after_place_word)
                    || (sentence_initial && end > i)));
        if accepted {
            anchors.push(Anchor { start: i, end, name });
        }
        i = end + 1;
    }
    anchors
}

/// Index of the anchor nearest before `k`, else the first after it.
fn nearest_anchor(anchors: &[Anchor], k: usize) -> Option<usize> {
    anchors
        .iter()
        .rposition(|a| a.start <= k)
        .or_else(|| (!anchors.is_empty()).then_some(0))
}

/// Anchor described by an age word at `k`.
fn age_anchor(tokens: &[Token<'_>], anchors: &[Anchor], k: usize) -> Option<usize> {
    if let Some(before) = anchors.iter().position(|a| {
        a.start == k + 1
            || (a.start == k + 2 && !tokens[k].breaks_after() && lexicon::is_person_noun(&tokens[k + 1].lower))
    }) {
        return Some(before);
    }
    let after = anchors.iter().rposition(|a| a.end < k && k <= a.end + 4)?;
    let blocked = anchors.iter().any(|a| a.start > anchors[after].end && a.start < k);
    let predicative = k
        .checked_sub(1)
        .is_some_and(|p| COPULAS.contains(&tokens[p].lower.as_str()));
    let closes = predicative
        || tokens[k].breaks_after()
        || tokens.get(k + 1).is_none_or(|next| {
            lexicon::is_person_noun(&next.lower) || CONJUNCTIONS.contains(&next.lower.as_str())
        });
    (!blocked && closes).then_some(after)
}

/// Location phrase ending at the location noun `k`, requiring an article
/// within the two preceding words.
fn location_phrase(tokens: &[Token<'_>], k: usize) -> Option<String> {
    let earliest = k.saturating_sub(3);
    (earliest..k).rev().find_map(|j| {
        if !script_lexicon::is_article(&tokens[j].lower) || tokens[j].breaks_after() {
            return None;
        }
        let words = &tokens[j + 1..=k];
        let clean = words[..words.len() - 1]
            .iter()
            .all(|t| !t.breaks_after() && t.word.chars().all(|c| c.is_lowercase() || c == '-'));
        clean.then(|| {
            title_case(&words.iter().map(|t| t.lower.as_str()).collect::<Vec<_>>().join(" "))
        })
    })
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}

fn observe_sentence(
    sentence: &str,
    oracle: &dyn NameOracle,
    corroborated: &HashSet<String>,
    last_subject: &mut Option<String>,
    out: &mut BeatObservations,
) {
    let tokens = tokenize(sentence);
    let mut anchors = find_anchors(&tokens, oracle, corroborated);
    if anchors.is_empty() {
        if let (Some(first), Some(subject)) = (tokens.first(), last_subject.as_ref()) {
            if lexicon::is_subject_pronoun(&first.lower) {
                anchors.push(Anchor {
                    start: 0,
                    end: 0,
                    name: subject.clone(),
                });
            }
        }
    }
    for anchor in &anchors {
        out.mention_mut(&anchor.name);
    }

    let mut hair_colors: HashSet<usize> = HashSet::new();
    for (k, token) in tokens.iter().enumerate() {
        let lower = token.lower.as_str();

        if let Some(age) = lexicon::age_group(lower) {
            if let Some(a) = age_anchor(&tokens, &anchors, k) {
                out.mention_mut(&anchors[a].name).descriptors.age = Some(age);
            }
        }

        let hair = if lower.ends_with("-haired") {
            lexicon::color(lower).map(|(name, _)| (name, k))
        } else if lexicon::is_hair(lower) {
            let before = k.checked_sub(1).filter(|b| !tokens[*b].breaks_after());
            before
                .and_then(|b| lexicon::color(&tokens[b].lower).map(|(name, _)| (name, b)))
                .or_else(|| {
                    tokens
                        .get(k + 1)
                        .filter(|_| !token.breaks_after())
                        .and_then(|next| lexicon::color(&next.lower))
                        .map(|(name, _)| (name, k + 1))
                })
        } else {
            None
        };
        if let Some((color, at)) = hair {
            hair_colors.insert(at);
            if let Some(a) = nearest_anchor(&anchors, k) {
                out.mention_mut(&anchors[a].name).descriptors.hair = Some(color);
            }
        }

        if lexicon::is_garment(lower) {
            let before = k
                .checked_sub(1)
                .filter(|b| !tokens[*b].breaks_after())
                .and_then(|b| lexicon::color(&tokens[b].lower));
            let after = tokens
                .get(k + 1)
                .filter(|_| !token.breaks_after())
                .and_then(|next| lexicon::color(&next.lower));
            if let Some((color, _)) = before.or(after) {
                let garment = Garment {
                    item: lower.to_owned(),
                    color,
                };
                if let Some(a) = nearest_anchor(&anchors, k) {
                    let descriptors = &mut out.mention_mut(&anchors[a].name).descriptors;
                    if !descriptors.garments.contains(&garment) {
                        descriptors.garments.push(garment);
                    }
                }
            }
        }

        if lexicon::is_prop(lower) {
            push_unique(&mut out.props, lower.to_owned());
            if let Some(a) = nearest_anchor(&anchors, k) {
                out.mention_mut(&anchors[a].name).descriptors.add_prop(lower);
            }
        }

        if lexicon::is_atmosphere(lower) {
            push_unique(&mut out.atmosphere, lower.to_owned());
        }

        if lexicon::is_location_noun(lower) {
            if let Some(phrase) = location_phrase(&tokens, k) {
                push_unique(&mut out.environments, phrase);
            }
        }
    }

    for (k, token) in tokens.iter().enumerate() {
        if hair_colors.contains(&k) || token.lower.ends_with("-haired") {
            continue;
        }
        if let Some((color, _)) = lexicon::color(&token.lower) {
            if !out.color_cues.contains(&color) {
                out.color_cues.push(color);
            }
        }
    }

    if let Some(last) = anchors.last() {
        *last_subject = Some(last.name.clone());
    }
}

/// Extracts characters, descriptors and scene cues from one beat.
///
/// `corroborated` comes from [`corroborated_name_words`]. `last_subject`
/// carries the most recent character of the scene across beats and is
/// updated in place.
#[must_use]
pub fn observe_beat(
    narration: &str,
    oracle: &dyn NameOracle,
    corroborated: &HashSet<String>,
    last_subject: &mut Option<String>,
) -> BeatObservations {
    let mut out = BeatObservations::default();
    for sentence in split_sentences(narration) {
        observe_sentence(sentence, oracle, corroborated, last_subject, &mut out);
    }
    out
}

/// Collects every descriptor in a free-form description, without anchors.
#[must_use]
pub fn describe(text: &str) -> Descriptors {
    let tokens = tokenize(text);
    let mut descriptors = Descriptors::default();
    for (k, token) in tokens.iter().enumerate() {
        let lower = token.lower.as_str();
        if descriptors.age.is_none() {
            descriptors.age = lexicon::age_group(lower);
        }
        if lower.ends_with("-haired") {
            descriptors.hair = lexicon::color(lower).map(|(name, _)| name);
        } else if lexicon::is_hair(lower) {
            let before = k.checked_sub(1).and_then(|b| lexicon::color(&tokens[b].lower));
            let after = tokens.get(k + 1).and_then(|next| lexicon::color(&next.lower));
            if let Some((color, _)) = before.or(after) {
                descriptors.hair = Some(color);
            }
        }
        if lexicon::is_garment(lower) {
            let before = k.checked_sub(1).and_then(|b| lexicon::color(&tokens[b].lower));
            let after = tokens.get(k + 1).and_then(|next| lexicon::color(&next.lower));
            if let Some((color, _)) = before.or(after) {
                descriptors.garments.push(Garment {
                    item: lower.to_owned(),
                    color,
                });
            }
        }
        if lexicon::is_prop(lower) {
            descriptors.add_prop(lower);
        }
    }
    descriptors
}

/// Parses a character guide of `Name: description` lines.
#[must_use]
pub fn parse_guide(guide: &str) -> Vec<(String, String)> {
    guide
        .lines()
        .filter_map(|line| {
            let line = line.trim().trim_start_matches(['-', '*', '•']).trim();
            let (name, description) = line
                .split_once(':')
                .or_else(|| line.split_once(" — "))
                .or_else(|| line.split_once(" - "))?;
            let name = name.trim();
            let words = name.split_whitespace().count();
            ((1..=4).contains(&words) && name.chars().any(char::is_alphabetic)).then(|| {
                (title_case(name), description.trim().to_owned())
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Known(Vec<&'static str>);

    impl NameOracle for Known {
        fn is_known(&self, name: &str) -> bool {
            self.0.iter().any(|known| known.eq_ignore_ascii_case(name))
        }
    }

    fn observe(text: &str, known: &[&'static str]) -> BeatObservations {
        let corroborated = corroborated_name_words([text]);
        observe_beat(text, &Known(known.to_vec()), &corroborated, &mut None)
    }

    fn names(observations: &BeatObservations) -> Vec<&str> {
        observations.mentions.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_sentence_initial_name_backed_by_a_pronoun_is_a_character() {
        let observations = observe("Maria enters the old kitchen. She lights a candle.", &[]);

        assert_eq!(names(&observations), vec!["Maria"]);
        assert_eq!(observations.environments, vec!["Old Kitchen".to_owned()]);
    }

    #[test]
    fn test_lone_sentence_initial_capital_is_not_a_character() {
        let light = observe("Maria enters the kitchen. Light spills across the floor. Maria smiles.", &[]);
        let flour = observe("Maria walks into the bakery. Flour covers every surface. Maria laughs.", &[]);
        let unknown = observe("Water drips from the ceiling.", &[]);

        assert_eq!(names(&light), vec!["Maria"]);
        assert_eq!(names(&flour), vec!["Maria"]);
        assert!(unknown.mentions.is_empty());
    }

    #[test]
    fn test_known_name_needs_no_corroboration() {
        let observations = observe("Tomas stares at the door.", &["Tomas"]);

        assert_eq!(names(&observations), vec!["Tomas"]);
    }

    #[test]
    fn test_corroboration_from_recurrence_and_pronouns() {
        // Act
        let words = corroborated_name_words([
            "Nina wipes the counter. She smiles.",
            "Steam rises. Tomas waits by the door and watches Tomas in the mirror.",
        ]);

        // Assert
        assert!(words.contains("nina"));
        assert!(words.contains("tomas"));
        assert!(!words.contains("steam"));
    }

    #[test]
    fn test_old_kitchen_is_not_an_age_descriptor() {
        let observations = observe("Maria enters the old kitchen.", &[]);

        assert_eq!(observations.mentions[0].descriptors.age, None);
    }

    #[test]
    fn test_age_before_and_after_name() {
        let before = observe("Young Maria runs across the field.", &["Maria"]);
        let after = observe("Years later, Maria, now elderly, returns.", &[]);

        assert_eq!(before.mentions[0].descriptors.age, Some(AgeGroup::Young));
        assert_eq!(after.mentions[0].descriptors.age, Some(AgeGroup::Elderly));
    }

    #[test]
    fn test_pronoun_sentence_describes_last_subject() {
        // Arrange
        let corroborated = HashSet::new();
        let mut last_subject = Some("Maria".to_owned());

        // Act
        let observations = observe_beat(
            "She is elderly now.",
            &Known(vec!["Maria"]),
            &corroborated,
            &mut last_subject,
        );

        // Assert
        assert_eq!(observations.mentions[0].name, "Maria");
        assert_eq!(observations.mentions[0].descriptors.age, Some(AgeGroup::Elderly));
    }

    #[test]
    fn test_garments_hair_and_props_attach_to_nearest_character() {
        let observations = observe(
            "Maria wears a red scarf and holds a letter. João, black-haired, waits in the rain.",
            &["Maria", "João"],
        );

        let maria = &observations.mentions[0].descriptors;
        assert_eq!(maria.garments, vec![Garment { item: "scarf".into(), color: "red" }]);
        assert_eq!(maria.props, vec!["letter".to_owned()]);
        assert_eq!(observations.mentions[1].descriptors.hair, Some("black"));
        assert_eq!(observations.atmosphere, vec!["rain".to_owned()]);
        assert_eq!(observations.color_cues, vec!["red"]);
    }

    #[test]
    fn test_multi_word_names_are_joined() {
        let observations = observe("Later, Maria Silva opens the door.", &[]);

        assert_eq!(observations.mentions[0].name, "Maria Silva");
    }

    #[test]
    fn test_spoken_words_only_name_known_characters() {
        let observations = observe("Tomas: (quietly) Make it a double, Nina.", &["Tomas", "Nina"]);

        let names: Vec<&str> = observations.mentions.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Tomas", "Nina"]);
    }

    #[test]
    fn test_places_after_prepositions_are_not_characters() {
        let observations = observe("The train leaves for Lisbon at dawn.", &[]);

        assert!(observations.mentions.is_empty());
    }

    #[test]
    fn test_parse_guide_lines() {
        let guide = "Maria: young woman with black hair, red scarf\n- JOÃO - her brother\nnot a guide line";

        let entries = parse_guide(guide);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "Maria");
        assert_eq!(entries[1], ("João".to_owned(), "her brother".to_owned()));
    }

    #[test]
    fn test_describe_collects_all_descriptors() {
        let descriptors = describe("young woman with black hair, red scarf");

        assert_eq!(descriptors.age, Some(AgeGroup::Young));
        assert_eq!(descriptors.hair, Some("black"));
        assert_eq!(descriptors.garments.len(), 1);
    }
}

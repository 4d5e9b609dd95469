//! Closed word lists used by the decomposition heuristics.
//!
//! Lists cover the request languages that separate words with spaces;
//! lookups are always on lower-cased tokens.

/// Capitalized words that are never names: pronouns, articles,
/// conjunctions and common sentence openers.
const NON_NAMES: &[&str] = &[
    // en
    "a", "an", "the", "he", "she", "it", "they", "we", "i", "you", "his", "her", "their", "its",
    "our", "my", "your", "this", "that", "these", "those", "there", "here", "then", "when",
    "while", "as", "and", "but", "or", "so", "if", "in", "on", "at", "by", "for", "from", "with",
    "into", "onto", "of", "to", "after", "before", "suddenly", "later", "meanwhile", "finally",
    "now", "still", "outside", "inside", "behind", "above", "below", "someone", "everyone",
    "nobody", "no", "yes", "oh", "okay", "ok", "hey", "hello", "what", "why", "how", "who",
    "where", "all", "both", "each", "every", "some", "one", "two", "three", "another", "again",
    "slowly", "quickly", "silence", "cut", "fade", "close", "angle", "wide", "pov", "int", "ext",
    "day", "night", "morning", "evening", "dawn", "dusk", "scene", "shot", "beat", "end",
    "continued", "moments", "not", "just", "only", "even", "maybe", "perhaps", "please", "thanks",
    "mr", "mrs", "ms", "dr", "sir", "madam",
    // pt / es
    "o", "os", "as", "um", "uma", "uns", "umas", "ele", "ela", "eles", "elas", "nós", "eu",
    "você", "seu", "sua", "isso", "isto", "aquele", "aquela", "então", "depois", "quando",
    "enquanto", "mas", "e", "ou", "de", "do", "da", "dos", "das", "em", "no", "na", "nos", "nas",
    "com", "para", "por", "sem", "agora", "ainda", "lá", "aqui", "de repente", "cena",
    "el", "la", "los", "las", "un", "una", "unos", "unas", "él", "ella", "ellos", "ellas",
    "nosotros", "yo", "tú", "usted", "su", "sus", "eso", "esto", "entonces", "luego", "cuando",
    "mientras", "pero", "y", "del", "al", "en", "con", "sin", "ahora", "aún", "allí", "aquí",
    "escena",
    // fr
    "le", "les", "une", "des", "il", "elle", "ils", "elles", "nous", "je", "tu", "vous", "son",
    "sa", "ses", "ce", "cette", "puis", "quand", "mais", "et", "ou", "du", "dans", "avec",
    "pour", "sans", "soudain", "maintenant", "encore", "là", "ici", "scène",
    // de
    "der", "die", "das", "ein", "eine", "einen", "einem", "er", "sie", "es", "wir", "ich", "du",
    "ihr", "sein", "seine", "dann", "als", "wenn", "aber", "und", "oder", "im", "mit", "für",
    "ohne", "plötzlich", "jetzt", "noch", "dort", "hier", "szene",
    // it
    "lo", "gli", "uno", "lui", "lei", "loro", "noi", "io", "suo", "sua", "poi", "quando", "ma",
    "con", "senza", "improvvisamente", "adesso", "ancora", "qui", "scena",
];

const ARTICLES: &[&str] = &[
    "a", "an", "the", "o", "os", "um", "uma", "el", "la", "los", "las", "un", "una", "le", "les",
    "une", "der", "die", "das", "ein", "eine", "lo", "gli", "il",
];

const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "sr", "sra", "srta", "st", "jr", "prof", "sgt", "capt", "lt", "mme",
    "mlle", "hr", "fr", "vs", "etc", "sta", "sto", "dra",
];

/// Words that open a new visual moment when they start a sentence.
const TRANSITION_CUES: &[&str] = &[
    // en
    "then", "suddenly", "later", "meanwhile", "moments later", "afterwards", "cut to",
    "at last", "finally", "instantly", "without warning", "all at once",
    // pt
    "de repente", "então", "depois", "mais tarde", "enquanto isso", "subitamente",
    // es
    "de pronto", "entonces", "luego", "más tarde", "mientras tanto", "repentinamente",
    // fr
    "soudain", "puis", "plus tard", "pendant ce temps", "tout à coup",
    // de
    "plötzlich", "dann", "später", "inzwischen", "auf einmal",
    // it
    "all'improvviso", "poi", "più tardi", "intanto", "improvvisamente",
    // ja / ko / zh / hi
    "突然", "その後", "갑자기", "그때", "然后", "忽然", "अचानक", "फिर",
];

/// Returns `true` for words that can never be a character name.
#[must_use]
pub fn is_non_name(word: &str) -> bool {
    NON_NAMES.contains(&word.to_lowercase().as_str())
}

/// Returns `true` for articles in the supported languages.
#[must_use]
pub fn is_article(word: &str) -> bool {
    ARTICLES.contains(&word)
}

/// Returns `true` when `text` ends with an abbreviation or an initial,
/// i.e. a following period does not end the sentence.
#[must_use]
pub fn ends_with_abbreviation(text: &str) -> bool {
    let Some(last) = text.split_whitespace().last() else {
        return false;
    };
    let token = last.trim_start_matches(|c: char| !c.is_alphanumeric());
    let mut chars = token.chars();
    if let (Some(only), None) = (chars.next(), chars.next()) {
        return only.is_uppercase();
    }
    ABBREVIATIONS.contains(&token.to_lowercase().as_str())
}

/// Returns `true` when `sentence` opens with a transition cue.
#[must_use]
pub fn opens_with_transition(sentence: &str) -> bool {
    let lowered = sentence
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    TRANSITION_CUES.iter().any(|cue| {
        lowered.strip_prefix(cue).is_some_and(|rest| {
            rest.chars().next().is_none_or(|c| !c.is_alphabetic()) || !cue.is_ascii()
        })
    })
}

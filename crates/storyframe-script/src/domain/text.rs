//! Text helpers shared by every decomposition stage.

use crate::domain::lexicon;

/// Characters that end a sentence.
fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '…' | '。' | '！' | '？' | '।')
}

/// Full-width terminators end a sentence even without a following space.
fn is_unspaced_terminal(c: char) -> bool {
    matches!(c, '。' | '！' | '？')
}

fn is_closer(c: char) -> bool {
    matches!(c, '"' | '\'' | '”' | '’' | ')' | ']' | '»' | '」' | '』')
}

fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{30ff}'
        | '\u{3400}'..='\u{4dbf}'
        | '\u{4e00}'..='\u{9fff}'
        | '\u{f900}'..='\u{faff}')
}

/// Counts words, treating every two CJK ideographs/kana as one word.
#[must_use]
pub fn count_words(text: &str) -> usize {
    text.split_whitespace()
        .filter(|token| token.chars().any(char::is_alphanumeric))
        .map(|token| {
            let cjk = token.chars().filter(|c| is_cjk(*c)).count();
            if cjk == 0 { 1 } else { cjk.div_ceil(2).max(1) }
        })
        .sum()
}

/// Splits text into trimmed sentences, keeping terminators and closing
/// quotes attached. Common abbreviations (`Mr.`, `Dr.`, `Sra.`) do not end a
/// sentence.
#[must_use]
pub fn split_sentences(text: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];
        if !is_terminal(c) {
            i += 1;
            continue;
        }

        let mut j = i + 1;
        while j < chars.len() && (is_terminal(chars[j].1) || is_closer(chars[j].1)) {
            j += 1;
        }
        let end = chars.get(j).map_or(text.len(), |(p, _)| *p);
        let at_boundary =
            j >= chars.len() || chars[j].1.is_whitespace() || is_unspaced_terminal(c);
        let abbreviated = c == '.' && lexicon::ends_with_abbreviation(&text[start..pos]);

        if at_boundary && !abbreviated {
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
        i = j;
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

/// Strips surrounding punctuation from a token, keeping inner apostrophes
/// and hyphens. A trailing possessive `'s` is removed.
#[must_use]
pub fn clean_token(token: &str) -> &str {
    let trimmed = token.trim_matches(|c: char| !c.is_alphanumeric());
    trimmed
        .strip_suffix("'s")
        .or_else(|| trimmed.strip_suffix("’s"))
        .unwrap_or(trimmed)
}

/// Returns `true` when the first letter is upper-case.
#[must_use]
pub fn is_capitalized(token: &str) -> bool {
    token.chars().next().is_some_and(char::is_uppercase)
}

/// Returns `true` when the text has letters and none are lower-case.
#[must_use]
pub fn is_all_caps(text: &str) -> bool {
    let mut letters = text.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(|c| !c.is_lowercase())
}

/// Upper-cases the first letter of every word and lower-cases the rest.
#[must_use]
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns the first `max_words` words, adding an ellipsis when truncated
/// and dropping trailing punctuation.
#[must_use]
pub fn headline(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let taken = words[..words.len().min(max_words)].join(" ");
    let trimmed = taken.trim_end_matches(|c: char| !c.is_alphanumeric() && c != ')' && c != '"');
    if words.len() > max_words {
        format!("{trimmed}…")
    } else {
        trimmed.to_owned()
    }
}

/// Truncates on a word boundary to at most `max_chars` characters.
#[must_use]
pub fn truncate_words(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let mut out = String::new();
    for word in text.split_whitespace() {
        if out.chars().count() + word.chars().count() + 1 > max_chars {
            break;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    if out.is_empty() {
        out = text.chars().take(max_chars).collect();
    }
    format!("{}…", out.trim_end_matches(|c: char| !c.is_alphanumeric()))
}

/// Normalizes a free-text key: lower-case, single spaces, leading article
/// removed.
#[must_use]
pub fn normalize_key(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut words: Vec<&str> = lowered
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .collect();
    if words.len() > 1 && lexicon::is_article(words[0]) {
        words.remove(0);
    }
    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sentences_keeps_terminators_and_quotes() {
        let sentences = split_sentences("Maria opens the door. \"Who's there?\" she asks! Silence…");

        assert_eq!(
            sentences,
            vec!["Maria opens the door.", "\"Who's there?\"", "she asks!", "Silence…"]
        );
    }

    #[test]
    fn test_split_sentences_skips_abbreviations() {
        let sentences = split_sentences("Dr. Ramos waits for Mr. Lee. They leave.");

        assert_eq!(sentences, vec!["Dr. Ramos waits for Mr. Lee.", "They leave."]);
    }

    #[test]
    fn test_split_sentences_handles_full_width_terminators() {
        let sentences = split_sentences("雨が降る。彼女は走る。");

        assert_eq!(sentences, vec!["雨が降る。", "彼女は走る。"]);
    }

    #[test]
    fn test_count_words_weights_cjk_runs() {
        assert_eq!(count_words("Maria walks home."), 3);
        assert_eq!(count_words("雨が降る"), 2);
        assert_eq!(count_words(" -- "), 0);
    }

    #[test]
    fn test_clean_token_strips_possessive_and_punctuation() {
        assert_eq!(clean_token("Maria's"), "Maria");
        assert_eq!(clean_token("(João),"), "João");
        assert_eq!(clean_token("ex-wife"), "ex-wife");
    }

    #[test]
    fn test_headline_truncates_with_ellipsis() {
        assert_eq!(headline("Maria enters the old kitchen at dawn.", 4), "Maria enters the old…");
        assert_eq!(headline("Maria waits.", 6), "Maria waits");
    }

    #[test]
    fn test_normalize_key_drops_leading_article() {
        assert_eq!(normalize_key("The  Old Kitchen"), "old kitchen");
        assert_eq!(normalize_key("a"), "a");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("MARIA'S APARTMENT"), "Maria's Apartment");
    }
}

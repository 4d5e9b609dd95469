//! Script normalization.
//!
//! Canonicalizes line endings and whitespace, collapses blank-line runs and
//! rewrites explicit scene/beat markers into the two canonical forms the
//! later stages look for: [`SCENE_BREAK`] and lines prefixed with
//! [`SHOT_PREFIX`].

use std::sync::LazyLock;

use regex::Regex;
use storyframe_core::error::StoryboardError;
use storyframe_core::storyboard::StoryboardRequest;

use crate::domain::document::ScriptDocument;

/// Canonical scene-break line.
pub const SCENE_BREAK: &str = "---";

/// Canonical prefix of an explicit beat/shot line.
pub const SHOT_PREFIX: &str = "SHOT:";

static SHOT_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:shot|beat|plano|toma|einstellung|inquadratura)\s*:\s*(.*)$")
        .expect("valid regex")
});

/// Returns the canonical form of a marker line, or the line unchanged.
fn canonicalize_marker(line: &str) -> String {
    let compact: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.len() >= 3
        && matches!(compact[0], '-' | '*' | '=' | '#' | '_')
        && compact.iter().all(|c| *c == compact[0])
    {
        return SCENE_BREAK.to_owned();
    }
    if let Some(caps) = SHOT_MARKER_RE.captures(line) {
        let rest = caps.get(1).map_or("", |m| m.as_str()).trim();
        return if rest.is_empty() {
            SHOT_PREFIX.to_owned()
        } else {
            format!("{SHOT_PREFIX} {rest}")
        };
    }
    line.to_owned()
}

/// Normalizes raw script text.
///
/// # Errors
///
/// Returns `StoryboardError::EmptyInput` if the text has no alphanumeric
/// content once trimmed.
pub fn normalize_text(raw: &str) -> Result<String, StoryboardError> {
    let unified = raw
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\u{feff}', "");

    let mut lines: Vec<String> = Vec::new();
    let mut previous_blank = true;
    for line in unified.split('\n') {
        let folded: String = line
            .chars()
            .map(|c| if c == '\t' || c == '\u{a0}' { ' ' } else { c })
            .collect();
        let trimmed = folded.trim_end();

        if trimmed.trim_start().is_empty() {
            if !previous_blank {
                lines.push(String::new());
            }
            previous_blank = true;
            continue;
        }
        previous_blank = false;
        lines.push(canonicalize_marker(trimmed));
    }
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }

    let text = lines.join("\n");
    if !text.chars().any(char::is_alphanumeric) {
        return Err(StoryboardError::EmptyInput);
    }
    Ok(text)
}

/// Builds an immutable [`ScriptDocument`] from a request.
///
/// # Errors
///
/// Returns `StoryboardError::EmptyInput` if the script is blank.
pub fn normalize_request(request: &StoryboardRequest) -> Result<ScriptDocument, StoryboardError> {
    let text = normalize_text(&request.script)?;
    let character_guide = request
        .character_guide
        .as_deref()
        .map(str::trim)
        .filter(|guide| !guide.is_empty())
        .map(ToOwned::to_owned);

    Ok(ScriptDocument::new(
        request.title.trim().to_owned(),
        text,
        request.script_language,
        request.visual_style,
        request.tone,
        request.shot_preference,
        character_guide,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_unifies_line_endings_and_collapses_blank_runs() {
        // Arrange
        let raw = "\r\n  Maria enters.  \r\n\r\n\r\n\r\nShe sits.\t\r\n\n";

        // Act
        let text = normalize_text(raw).unwrap();

        // Assert
        assert_eq!(text, "  Maria enters.\n\nShe sits.");
    }

    #[test]
    fn test_normalize_canonicalizes_markers() {
        let text = normalize_text("One.\n* * *\nbeat: close on the key\nShot:\nTwo.").unwrap();

        assert_eq!(text, "One.\n---\nSHOT: close on the key\nSHOT:\nTwo.");
    }

    #[test]
    fn test_whitespace_only_script_is_empty_input() {
        let result = normalize_text(" \n\t\r\n ");

        assert!(matches!(result, Err(StoryboardError::EmptyInput)));
    }

    #[test]
    fn test_punctuation_only_script_is_empty_input() {
        let result = normalize_text("... !!\n---\n?");

        assert!(matches!(result, Err(StoryboardError::EmptyInput)));
    }

    #[test]
    fn test_non_latin_script_is_accepted() {
        assert_eq!(normalize_text("雨が降る。").unwrap(), "雨が降る。");
    }
}

//! Text cleanup shared by the feed and email paths.

use html_escape::decode_html_entities;
use once_cell::sync::Lazy;
use regex::Regex;

/// Upper bound on excerpt length, in characters.
pub const MAX_EXCERPT_CHARS: usize = 800;

static RE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Strip tags, decode entities and collapse whitespace.
///
/// Tags are removed outright, which suits feed markup where inline tags sit
/// inside words (`<em>un</em>usual`).
pub fn clean_html(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let without_tags = RE_TAG.replace_all(text, "");
    collapse_whitespace(&decode_html_entities(&without_tags))
}

/// Like [`clean_html`] but each tag becomes a space.
///
/// Email templates put block-level tags between words without any
/// whitespace, so dropping them would glue words together.
pub fn strip_html(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let without_tags = RE_TAG.replace_all(text, " ");
    collapse_whitespace(&decode_html_entities(&without_tags))
}

pub fn collapse_whitespace(text: &str) -> String {
    RE_WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Bound `text` to `max_chars` characters.
///
/// Cuts after the last full stop when that stop lies past the midpoint of the
/// limit, otherwise at the last word boundary followed by an ellipsis.
pub fn truncate_excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let end = text
        .char_indices()
        .nth(max_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    let truncated = &text[..end];

    if let Some(period) = truncated.rfind('.') {
        if truncated[..period].chars().count() > max_chars / 2 {
            return truncated[..=period].to_string();
        }
    }

    let head = match truncated.rfind(' ') {
        Some(space) => &truncated[..space],
        None => truncated,
    };
    format!("{}…", head)
}

/// Clean a markup fragment and bound it to the excerpt limit.
pub fn excerpt_from_html(html: &str) -> String {
    truncate_excerpt(&clean_html(html), MAX_EXCERPT_CHARS)
}

/// Largest index `<= idx` that falls on a char boundary of `s`.
pub fn floor_boundary(s: &str, idx: usize) -> usize {
    let mut idx = idx.min(s.len());
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Smallest index `>= idx` that falls on a char boundary of `s`.
pub fn ceil_boundary(s: &str, idx: usize) -> usize {
    let mut idx = idx.min(s.len());
    while !s.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_html_decodes_entities_and_collapses() {
        assert_eq!(
            clean_html("<p>Tom &amp; Jerry\n\n  <b>return</b></p>"),
            "Tom & Jerry return"
        );
        assert_eq!(clean_html(""), "");
    }

    #[test]
    fn strip_html_keeps_words_apart() {
        assert_eq!(strip_html("<td>one</td><td>two</td>"), "one two");
        assert_eq!(clean_html("<td>one</td><td>two</td>"), "onetwo");
    }

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_excerpt("Short text.", 800), "Short text.");
    }

    #[test]
    fn truncates_at_sentence_past_midpoint() {
        let text = format!("{}. {}", "a".repeat(60), "b ".repeat(40));
        let out = truncate_excerpt(&text, 80);
        assert_eq!(out, format!("{}.", "a".repeat(60)));
    }

    #[test]
    fn falls_back_to_word_boundary_with_marker() {
        let text = format!("Hi. {}", "word ".repeat(40));
        let out = truncate_excerpt(&text, 50);
        assert!(out.ends_with('…'));
        assert!(!out.contains("wor…"));
        assert!(out.chars().count() <= 51);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let text = "é".repeat(900);
        let out = truncate_excerpt(&text, 800);
        assert_eq!(out.chars().count(), 801);
    }

    #[test]
    fn boundaries_respect_multibyte_chars() {
        let s = "aé";
        assert_eq!(floor_boundary(s, 2), 1);
        assert_eq!(ceil_boundary(s, 2), 3);
        assert_eq!(floor_boundary(s, 99), 3);
    }
}

//! Free-text cleanup for prompts bound to the AI backend.
//!
//! These helpers are for natural-language text only; diagram code goes
//! through [`crate::repair`] instead.

use regex::Regex;
use std::sync::OnceLock;

fn whitespace_run_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

/// Collapses every whitespace run (newlines included) to a single space and
/// trims the ends. Empty input yields an empty string.
pub fn clean_text(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    whitespace_run_regex()
        .replace_all(raw, " ")
        .trim()
        .to_string()
}

pub fn count_characters(text: &str) -> usize {
    text.chars().count()
}

pub fn is_within_char_limit(text: &str, limit: usize) -> bool {
    count_characters(text) <= limit
}

/// Truncates to `length` characters, appending an ellipsis when cut.
pub fn truncate_text(text: &str, length: usize) -> String {
    if count_characters(text) <= length {
        return text.to_string();
    }
    let cut: String = text.chars().take(length).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_collapses_whitespace_and_newlines() {
        assert_eq!(clean_text("a  b\n\nc\td"), "a b c d");
        assert_eq!(clean_text("  leading and trailing  "), "leading and trailing");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn count_characters_counts_scalars_not_bytes() {
        assert_eq!(count_characters("需求分析"), 4);
        assert!(is_within_char_limit("需求分析", 4));
        assert!(!is_within_char_limit("需求分析", 3));
    }

    #[test]
    fn truncate_text_appends_ellipsis_only_when_cut() {
        assert_eq!(truncate_text("short", 100), "short");
        assert_eq!(truncate_text("abcdef", 3), "abc...");
        assert_eq!(truncate_text("需求分析流程", 2), "需求...");
    }
}

//! Fact-shape patterns: numerals, quoted spans, proper nouns, enumerations

use once_cell::sync::Lazy;
use regex::Regex;

use super::text::{contains_any, is_negation, is_stop_word};
use super::wordlists::{CITATION_MARKERS, ENUMERATION_MARKERS};

static NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d+(?:[.,]\d+)*\b").unwrap());

static QUOTED_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"\n]{2,}?)"|“([^”\n]{2,}?)”"#).unwrap());

static PROPER_SEQUENCE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][\p{L}\d'-]*(?:[ \t]+[A-Z][\p{L}\d'-]*)+").unwrap());

static CAPITALIZED_WORD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][\p{L}]+").unwrap());

static ENUMERATED_LINE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*(?:[-*\u{2022}]|\d+[.)])\s+\S").unwrap());

static BRACKET_CITATION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\d+\]").unwrap());

/// A proper-noun candidate with its byte span in the source sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProperNoun {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Standalone numbers such as `2023`, `3.5` or `1,000`
pub fn numerals(text: &str) -> Vec<&str> {
    NUMBER_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
}

/// Inner text of double-quoted spans (straight or typographic quotes)
pub fn quoted_spans(text: &str) -> Vec<&str> {
    QUOTED_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Remove quoted spans, keeping the surrounding text
pub fn strip_quoted(text: &str) -> String {
    QUOTED_PATTERN.replace_all(text, " ").into_owned()
}

/// Runs of two or more capitalized words, with leading function words dropped
///
/// "The United States" yields "United States"; a lone "The System" yields "System".
pub fn proper_sequences(text: &str) -> Vec<ProperNoun> {
    let mut found: Vec<ProperNoun> = Vec::new();

    for m in PROPER_SEQUENCE_PATTERN.find_iter(text) {
        let raw = m.as_str();
        let mut offset = 0;
        let mut rest = raw;

        while let Some(word) = rest.split_whitespace().next() {
            let lower = word.to_lowercase();
            if !is_stop_word(&lower) && !is_negation(&lower) {
                break;
            }
            let skip = rest.find(word).unwrap_or(0) + word.len();
            offset += skip;
            rest = &rest[skip..];
        }

        let trimmed = rest.trim_start();
        offset += rest.len() - trimmed.len();

        if trimmed.is_empty() || found.iter().any(|p| p.text == trimmed) {
            continue;
        }

        found.push(ProperNoun {
            text: trimmed.to_string(),
            start: m.start() + offset,
            end: m.end(),
        });
    }

    found
}

/// Capitalized words that are not the first word of the sentence
pub fn mid_sentence_capitalized(sentence: &str) -> Vec<ProperNoun> {
    let first_word_start = sentence
        .char_indices()
        .find(|(_, c)| c.is_alphanumeric())
        .map(|(i, _)| i);

    CAPITALIZED_WORD_PATTERN
        .find_iter(sentence)
        .filter(|m| Some(m.start()) != first_word_start)
        .filter(|m| {
            let lower = m.as_str().to_lowercase();
            !is_stop_word(&lower) && !is_negation(&lower)
        })
        .map(|m| ProperNoun {
            text: m.as_str().to_string(),
            start: m.start(),
            end: m.end(),
        })
        .collect()
}

/// Bulleted or numbered lines, or enumeration words like "firstly"
pub fn has_enumeration(text: &str) -> bool {
    ENUMERATED_LINE_PATTERN.is_match(text) || contains_any(text, ENUMERATION_MARKERS)
}

/// Whether the text signals which source it drew from
pub fn has_citation_marker(text: &str) -> bool {
    BRACKET_CITATION_PATTERN.is_match(text) || contains_any(text, CITATION_MARKERS)
}

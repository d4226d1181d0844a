//! Rule-based query expansion
//!
//! Produces a fixed-order list of query variants: the original question, an
//! interrogative rewrite, a synonym substitution and a keyword-only form.
//! Generic rewrites pad the list when fewer than three distinct variants exist.

use std::collections::HashMap;

use crate::domain::lexicon::{is_negation, is_numeric, is_stop_word, words};

const MIN_VARIANTS: usize = 3;
const MAX_VARIANTS: usize = 4;

/// Rewrites for a leading question word
const INTERROGATIVE_REWRITES: &[(&str, &str)] = &[
    ("how", "explain"),
    ("why", "explain reasons for"),
    ("what", "describe"),
    ("which", "list"),
    ("when", "date of"),
];

/// Common document-vocabulary synonyms
fn synonym_map() -> HashMap<&'static str, &'static str> {
    let mut m = HashMap::new();
    m.insert("release", "launch");
    m.insert("released", "launched");
    m.insert("configure", "set up");
    m.insert("install", "set up");
    m.insert("error", "failure");
    m.insert("errors", "failures");
    m.insert("problem", "issue");
    m.insert("problems", "issues");
    m.insert("fix", "resolve");
    m.insert("create", "build");
    m.insert("remove", "delete");
    m.insert("change", "modify");
    m.insert("start", "begin");
    m.insert("stop", "halt");
    m.insert("use", "utilize");
    m.insert("cost", "price");
    m.insert("big", "large");
    m.insert("fast", "quick");
    m.insert("improve", "enhance");
    m.insert("find", "locate");
    m.insert("show", "display");
    m.insert("method", "approach");
    m
}

/// Replace the leading question word, if it has a known rewrite
fn interrogative_rewrite(question: &str) -> Option<String> {
    let lowered = question.to_lowercase();
    let first = lowered.split_whitespace().next()?;

    INTERROGATIVE_REWRITES
        .iter()
        .find(|(word, _)| first == *word)
        .map(|(word, alt)| lowered.replacen(word, alt, 1))
}

/// Swap every word that has a synonym, keeping surrounding punctuation
fn synonym_substitution(question: &str) -> Option<String> {
    let map = synonym_map();
    let mut changed = false;

    let rewritten: Vec<String> = question
        .split_whitespace()
        .map(|token| {
            let core = token.trim_matches(|c: char| !c.is_alphanumeric());
            match map.get(core.to_lowercase().as_str()) {
                Some(synonym) if !core.is_empty() => {
                    changed = true;
                    token.replacen(core, synonym, 1)
                }
                _ => token.to_string(),
            }
        })
        .collect();

    changed.then(|| rewritten.join(" "))
}

/// Content words only, in question order
fn keyword_form(question: &str) -> String {
    words(question)
        .into_iter()
        .filter(|w| !is_stop_word(w) && !is_negation(w))
        .filter(|w| is_numeric(w) || w.chars().count() >= 3)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Append a variant unless an earlier one has the same words
fn push_distinct(variants: &mut Vec<String>, variant: String) {
    let normalized = words(&variant);
    if !normalized.is_empty() && !variants.iter().any(|v| words(v) == normalized) {
        variants.push(variant);
    }
}

/// Derive 3-4 retrieval query variants from a question
///
/// The order is fixed, so merged retrieval results are deterministic.
pub fn expand_query(question: &str) -> Vec<String> {
    let original = question.trim();
    if original.is_empty() {
        return Vec::new();
    }

    let keywords = keyword_form(original);
    let subject = if keywords.is_empty() {
        original.to_lowercase()
    } else {
        keywords.clone()
    };

    let candidates = [
        Some(original.to_string()),
        interrogative_rewrite(original),
        synonym_substitution(original),
        Some(keywords),
    ];

    let mut variants: Vec<String> = Vec::new();
    for candidate in candidates.into_iter().flatten() {
        push_distinct(&mut variants, candidate);
    }

    for padding in [format!("explain {}", subject), format!("details about {}", subject)] {
        if variants.len() >= MIN_VARIANTS {
            break;
        }
        push_distinct(&mut variants, padding);
    }

    variants.truncate(MAX_VARIANTS);
    variants
}

//! Tokenization and bounded phrase matching

use std::collections::BTreeSet;

use unicode_segmentation::UnicodeSegmentation;

use super::wordlists::{HEDGE_PHRASES, NEGATION_MARKERS, STOP_WORDS};

/// Split text into lowercase words, normalizing typographic apostrophes
pub fn words(text: &str) -> Vec<String> {
    text.unicode_words().map(normalize_word).collect()
}

/// Number of words in the text
pub fn word_count(text: &str) -> usize {
    text.unicode_words().count()
}

/// Split text into trimmed, non-empty sentences
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.unicode_sentences()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn normalize_word(word: &str) -> String {
    word.replace('\u{2019}', "'").to_lowercase()
}

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

pub fn is_negation(word: &str) -> bool {
    NEGATION_MARKERS.contains(&word)
}

/// Digits with optional `.`/`,` group separators
pub fn is_numeric(word: &str) -> bool {
    word.chars().any(|c| c.is_ascii_digit())
        && word
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == ',')
}

/// Strip common English inflections so "released" and "release" compare equal
pub fn stem(word: &str) -> String {
    if is_numeric(word) {
        return word.to_string();
    }

    let word = word.strip_suffix("'s").unwrap_or(word);
    let len = word.chars().count();

    let stripped = if len > 5 && word.ends_with("ing") {
        &word[..word.len() - 3]
    } else if len > 4 && (word.ends_with("ed") || word.ends_with("es")) {
        &word[..word.len() - 2]
    } else if len > 3 && word.ends_with('s') && !word.ends_with("ss") {
        &word[..word.len() - 1]
    } else {
        word
    };

    let stripped = if stripped.chars().count() > 4 && stripped.ends_with('e') {
        &stripped[..stripped.len() - 1]
    } else {
        stripped
    };

    stripped.to_string()
}

/// Stemmed words that carry meaning: no stop words, no negations, no 1-2 letter tokens
pub fn content_terms(text: &str) -> BTreeSet<String> {
    words(text)
        .into_iter()
        .filter(|w| !is_stop_word(w) && !is_negation(w))
        .filter(|w| is_numeric(w) || w.chars().count() >= 3)
        .map(|w| stem(&w))
        .collect()
}

/// Whether the text contains a negation marker as a whole word
pub fn has_negation(text: &str) -> bool {
    words(text).iter().any(|w| is_negation(w))
}

/// Count case-insensitive occurrences of `needle` that are not part of a larger word
///
/// An alphanumeric edge of the needle must sit next to a non-alphanumeric
/// character (or the end of the text), so "3" does not match inside "2023".
pub fn count_term(haystack: &str, needle: &str) -> usize {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return 0;
    }

    let haystack = haystack.replace('\u{2019}', "'").to_lowercase();
    let needle = needle.replace('\u{2019}', "'");
    let opens_alnum = needle.chars().next().is_some_and(char::is_alphanumeric);
    let closes_alnum = needle.chars().next_back().is_some_and(char::is_alphanumeric);

    haystack
        .match_indices(needle.as_str())
        .filter(|(start, _)| {
            let end = start + needle.len();
            let before_ok = !opens_alnum
                || haystack[..*start]
                    .chars()
                    .next_back()
                    .is_none_or(|c| !c.is_alphanumeric());
            let after_ok = !closes_alnum
                || haystack[end..]
                    .chars()
                    .next()
                    .is_none_or(|c| !c.is_alphanumeric());
            before_ok && after_ok
        })
        .count()
}

/// Bounded, case-insensitive containment (see [`count_term`])
pub fn contains_term(haystack: &str, needle: &str) -> bool {
    count_term(haystack, needle) > 0
}

/// Whether any of the phrases occurs in the text
pub fn contains_any(haystack: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| contains_term(haystack, phrase))
}

/// Total number of hedge-phrase occurrences
pub fn hedge_count(text: &str) -> usize {
    HEDGE_PHRASES
        .iter()
        .map(|phrase| count_term(text, phrase))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_normalizes_apostrophes() {
        let tokens = words("It isn\u{2019}t Ready");
        assert_eq!(tokens, vec!["it", "isn't", "ready"]);
    }

    #[test]
    fn test_split_sentences() {
        let sentences = split_sentences("The system shipped in 2023. It won awards!  ");
        assert_eq!(sentences, vec!["The system shipped in 2023.", "It won awards!"]);
        assert!(split_sentences("   ").is_empty());
    }

    #[test]
    fn test_stem_collapses_inflections() {
        assert_eq!(stem("released"), stem("release"));
        assert_eq!(stem("releases"), stem("releasing"));
        assert_eq!(stem("systems"), "system");
        assert_eq!(stem("class"), "class");
        assert_eq!(stem("2023"), "2023");
    }

    #[test]
    fn test_content_terms_drop_stop_words_and_negations() {
        let terms = content_terms("The system is not released in 2023");
        let expected: BTreeSet<String> =
            ["system", "releas", "2023"].iter().map(|s| s.to_string()).collect();
        assert_eq!(terms, expected);
    }

    #[test]
    fn test_count_term_respects_word_boundaries() {
        assert!(!contains_term("Released in 2023.", "3"));
        assert!(contains_term("Released in 2023.", "2023"));
        assert!(contains_term("won 3 awards", "3"));
        assert!(!contains_term("an unlikely event", "likely"));
        assert_eq!(count_term("Maybe, maybe not. MAYBE.", "maybe"), 3);
    }

    #[test]
    fn test_count_term_with_punctuation_edges() {
        assert!(contains_term("Source: the 2022 annual report", "source:"));
        assert!(contains_term("a 100% success rate", "100%"));
        assert_eq!(count_term("anything", ""), 0);
    }

    #[test]
    fn test_has_negation() {
        assert!(has_negation("The API doesn't support batching"));
        assert!(has_negation("It is not available"));
        assert!(!has_negation("Nothingness is a concept"));
    }

    #[test]
    fn test_hedge_count() {
        assert_eq!(hedge_count("I'm not sure, maybe it was released recently."), 2);
        assert_eq!(hedge_count("The system was released in 2023."), 0);
    }

    #[test]
    fn test_is_numeric() {
        assert!(is_numeric("1,000"));
        assert!(is_numeric("3.5"));
        assert!(!is_numeric("v2"));
        assert!(!is_numeric(","));
    }
}

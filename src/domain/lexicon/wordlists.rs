//! Fixed wordlists shared by the quality and hallucination scorers
//!
//! Every entry is lowercase. Multi-word entries are matched as bounded phrases.

/// Function words ignored when comparing question, answer and context terms
pub const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "also", "am", "an", "and", "any", "are", "as",
    "at", "be", "been", "before", "being", "between", "both", "but", "by", "can", "could",
    "did", "do", "does", "doing", "during", "each", "for", "from", "had", "has", "have",
    "having", "he", "her", "here", "him", "his", "how", "i", "i'm", "if", "in", "into", "is",
    "it", "it's", "its", "just", "may", "me", "more", "much", "my", "of", "off", "on", "or",
    "other", "our", "out", "over", "own", "same", "shall", "she", "should", "so", "some",
    "such", "than", "that", "the", "their", "them", "then", "there", "these", "they", "this",
    "those", "through", "to", "too", "under", "up", "very", "was", "we", "were", "what",
    "when", "where", "which", "while", "who", "whom", "whose", "why", "will", "with",
    "would", "you", "your",
];

/// Phrases that signal the answer is hedging
pub const HEDGE_PHRASES: &[&str] = &[
    "maybe",
    "perhaps",
    "possibly",
    "probably",
    "might",
    "could be",
    "seem",
    "seems",
    "seemingly",
    "appears to",
    "apparently",
    "arguably",
    "presumably",
    "not sure",
    "not certain",
    "i think",
    "i believe",
];

/// Phrases that mark an answer as admittedly incomplete
pub const INCOMPLETE_INDICATORS: &[&str] = &[
    "i don't know",
    "i do not know",
    "not sure",
    "insufficient information",
    "not provided",
    "don't have enough information",
    "do not have enough information",
    "no information",
    "unclear",
    "cannot determine",
    "can't determine",
];

/// Absolute and superlative terms that overstate a claim
pub const ABSOLUTE_TERMS: &[&str] = &[
    "always",
    "never",
    "all",
    "none",
    "every",
    "everyone",
    "everything",
    "completely",
    "absolutely",
    "totally",
    "entirely",
    "definitely",
    "certainly",
    "undoubtedly",
    "best",
    "worst",
    "perfect",
    "perfectly",
    "guarantee",
    "guaranteed",
    "guarantees",
    "100%",
];

/// Single-word negation markers, compared against whole tokens
pub const NEGATION_MARKERS: &[&str] = &[
    "not", "no", "never", "cannot", "can't", "isn't", "aren't", "wasn't", "weren't",
    "doesn't", "don't", "didn't", "won't", "hasn't", "haven't", "hadn't", "shouldn't",
    "wouldn't", "couldn't", "neither", "nor", "nothing", "nobody",
];

/// Phrases that show an answer points back at its sources
pub const CITATION_MARKERS: &[&str] = &[
    "according to",
    "the document",
    "the documents",
    "the source",
    "the sources",
    "source:",
    "sources:",
    "based on the",
    "as stated in",
    "as described in",
    "as mentioned in",
    "the context",
    "the text",
    "cited in",
    "reference:",
    "references:",
];

/// Words that introduce an enumerated answer
pub const ENUMERATION_MARKERS: &[&str] = &[
    "firstly",
    "secondly",
    "thirdly",
    "finally",
    "additionally",
    "in addition",
];

/// Measurement units recognised after a number
pub const UNITS: &[&str] = &[
    "percent", "kg", "g", "mg", "lb", "lbs", "km", "m", "cm", "mm", "mi", "miles", "ms",
    "second", "seconds", "minute", "minutes", "hour", "hours", "day", "days", "week",
    "weeks", "month", "months", "year", "years", "gb", "mb", "kb", "tb", "ghz", "mhz", "usd",
    "dollar", "dollars", "euro", "euros", "thousand", "million", "billion", "times",
];

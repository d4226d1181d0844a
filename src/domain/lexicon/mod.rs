//! Lexicon and heuristic library
//!
//! Fixed wordlists and pattern rules shared by the quality assessor and the
//! hallucination detector. Pure data plus matching functions, no state.

mod patterns;
mod text;
mod wordlists;

pub use patterns::{
    has_citation_marker, has_enumeration, mid_sentence_capitalized, numerals,
    proper_sequences, quoted_spans, strip_quoted, ProperNoun,
};
pub use text::{
    contains_any, contains_term, content_terms, count_term, has_negation, hedge_count,
    is_negation, is_numeric, is_stop_word, split_sentences, stem, word_count, words,
};
pub use wordlists::{
    ABSOLUTE_TERMS, CITATION_MARKERS, ENUMERATION_MARKERS, HEDGE_PHRASES,
    INCOMPLETE_INDICATORS, NEGATION_MARKERS, STOP_WORDS, UNITS,
};

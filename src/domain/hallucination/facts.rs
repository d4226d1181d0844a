//! Context indexing and checkable-fact extraction

use std::collections::{BTreeSet, HashSet};

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::lexicon::{
    contains_term, content_terms, has_negation, hedge_count, mid_sentence_capitalized,
    numerals, proper_sequences, split_sentences, UNITS,
};
use crate::domain::retrieval::{combine_context, SourceChunk};

const MONTH: &str = r"(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").unwrap());

static SLASH_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4}|\d{2})\b").unwrap());

static MONTH_DAY_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b{MONTH}\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?,?\s+(\d{{4}})\b"
    ))
    .unwrap()
});

static DAY_MONTH_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\s+{MONTH}\.?,?\s+(\d{{4}})\b"
    ))
    .unwrap()
});

static NUMBER_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d+(?:[.,]\d+)*\b").unwrap());

/// A date found in text, normalized to a calendar day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMention {
    pub text: String,
    pub date: NaiveDate,
    pub start: usize,
    pub end: usize,
}

/// A checkable fact extracted from an answer sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fact {
    Date { text: String, date: NaiveDate },
    Year { text: String, year: i32 },
    Quantity { text: String, number: String, unit: Option<String> },
    ProperNoun { text: String },
}

impl Fact {
    pub fn text(&self) -> &str {
        match self {
            Fact::Date { text, .. }
            | Fact::Year { text, .. }
            | Fact::Quantity { text, .. }
            | Fact::ProperNoun { text } => text,
        }
    }
}

/// A context sentence with its precomputed features
#[derive(Debug, Clone)]
pub struct ContextSentence {
    pub text: String,
    pub terms: BTreeSet<String>,
    pub negated: bool,
    pub hedged: bool,
}

/// Lookup structures over the combined context, built once per detection
#[derive(Debug, Clone)]
pub struct ContextIndex {
    text: String,
    sentences: Vec<ContextSentence>,
    numbers: HashSet<String>,
    dates: HashSet<NaiveDate>,
    years: HashSet<i32>,
}

impl ContextIndex {
    pub fn build(context: &[SourceChunk]) -> Self {
        let combined = combine_context(context);

        let sentences = split_sentences(&combined)
            .into_iter()
            .map(|sentence| ContextSentence {
                text: sentence.to_string(),
                terms: content_terms(sentence),
                negated: has_negation(sentence),
                hedged: hedge_count(sentence) > 0,
            })
            .collect();

        let numbers = numerals(&combined)
            .into_iter()
            .map(normalize_number)
            .collect();

        let mentions = extract_dates(&combined);
        let dates: HashSet<NaiveDate> = mentions.iter().map(|m| m.date).collect();

        let mut years: HashSet<i32> = dates.iter().map(|d| d.year()).collect();
        years.extend(numerals(&combined).into_iter().filter_map(parse_year));

        Self {
            text: combined.to_lowercase(),
            sentences,
            numbers,
            dates,
            years,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn sentences(&self) -> &[ContextSentence] {
        &self.sentences
    }

    /// Bounded, case-insensitive phrase lookup
    pub fn contains(&self, phrase: &str) -> bool {
        contains_term(&self.text, phrase)
    }

    /// Whether the context backs the fact
    pub fn supports(&self, fact: &Fact) -> bool {
        match fact {
            Fact::Date { text, date } => self.contains(text) || self.dates.contains(date),
            Fact::Year { text, year } => self.contains(text) || self.years.contains(year),
            Fact::Quantity { number, unit, .. } => {
                self.numbers.contains(number) && unit.as_deref().is_none_or(|u| self.contains(u))
            }
            Fact::ProperNoun { text } => self.contains(text),
        }
    }
}

fn normalize_number(raw: &str) -> String {
    raw.replace(',', "")
}

/// Four-digit numbers read as calendar years
fn parse_year(raw: &str) -> Option<i32> {
    if raw.len() != 4 {
        return None;
    }
    raw.parse::<i32>()
        .ok()
        .filter(|year| (1000..=2099).contains(year))
}

fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn date_from_parts(year: &str, month: u32, day: &str) -> Option<NaiveDate> {
    let mut year: i32 = year.parse().ok()?;
    if year < 100 {
        year += 2000;
    }
    NaiveDate::from_ymd_opt(year, month, day.parse().ok()?)
}

/// All dates in ISO, `m/d/y`, `Month d, yyyy` and `d Month yyyy` form
///
/// Overlapping matches keep the earliest, longest mention.
pub fn extract_dates(text: &str) -> Vec<DateMention> {
    let mut mentions = Vec::new();

    for caps in ISO_DATE.captures_iter(text) {
        let month = caps[2].parse().ok();
        if let Some(date) = month.and_then(|m| date_from_parts(&caps[1], m, &caps[3])) {
            mentions.push((caps.get(0), date));
        }
    }
    for caps in SLASH_DATE.captures_iter(text) {
        let month = caps[1].parse().ok();
        if let Some(date) = month.and_then(|m| date_from_parts(&caps[3], m, &caps[2])) {
            mentions.push((caps.get(0), date));
        }
    }
    for caps in MONTH_DAY_YEAR.captures_iter(text) {
        let month = month_number(&caps[1]);
        if let Some(date) = month.and_then(|m| date_from_parts(&caps[3], m, &caps[2])) {
            mentions.push((caps.get(0), date));
        }
    }
    for caps in DAY_MONTH_YEAR.captures_iter(text) {
        let month = month_number(&caps[2]);
        if let Some(date) = month.and_then(|m| date_from_parts(&caps[3], m, &caps[1])) {
            mentions.push((caps.get(0), date));
        }
    }

    let mut found: Vec<DateMention> = mentions
        .into_iter()
        .filter_map(|(whole, date)| {
            whole.map(|m| DateMention {
                text: m.as_str().to_string(),
                date,
                start: m.start(),
                end: m.end(),
            })
        })
        .collect();

    found.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut kept: Vec<DateMention> = Vec::new();
    for mention in found {
        if kept.last().is_none_or(|last| mention.start >= last.end) {
            kept.push(mention);
        }
    }
    kept
}

fn inside(spans: &[(usize, usize)], start: usize, end: usize) -> bool {
    spans.iter().any(|&(s, e)| start < e && end > s)
}

/// Unit word or `%` directly following a number
fn unit_after(rest: &str) -> Option<String> {
    if rest.starts_with('%') {
        return Some("%".to_string());
    }

    let word: String = rest
        .trim_start()
        .chars()
        .take_while(|c| c.is_alphabetic())
        .collect::<String>()
        .to_lowercase();

    // A unit must be separated from the number by at most one space
    let gap = rest.len() - rest.trim_start().len();
    if gap <= 1 && UNITS.contains(&word.as_str()) {
        Some(word)
    } else {
        None
    }
}

/// Dates, bare years, quantities and proper nouns mentioned in a sentence
pub fn extract_facts(sentence: &str) -> Vec<Fact> {
    let mut facts = Vec::new();

    let dates = extract_dates(sentence);
    let date_spans: Vec<(usize, usize)> = dates.iter().map(|d| (d.start, d.end)).collect();

    for mention in dates {
        facts.push(Fact::Date {
            text: mention.text,
            date: mention.date,
        });
    }

    for m in NUMBER_SPAN.find_iter(sentence) {
        if inside(&date_spans, m.start(), m.end()) {
            continue;
        }

        let unit = unit_after(&sentence[m.end()..]);
        if unit.is_none() {
            if let Some(year) = parse_year(m.as_str()) {
                facts.push(Fact::Year {
                    text: m.as_str().to_string(),
                    year,
                });
                continue;
            }
        }

        let text = match &unit {
            Some(u) if u == "%" => format!("{}%", m.as_str()),
            Some(u) => format!("{} {}", m.as_str(), u),
            None => m.as_str().to_string(),
        };
        facts.push(Fact::Quantity {
            text,
            number: normalize_number(m.as_str()),
            unit,
        });
    }

    let sequences = proper_sequences(sentence);
    let sequence_spans: Vec<(usize, usize)> = sequences.iter().map(|p| (p.start, p.end)).collect();
    let mut seen_nouns: HashSet<String> = HashSet::new();

    let singles = mid_sentence_capitalized(sentence)
        .into_iter()
        .filter(|p| !inside(&sequence_spans, p.start, p.end));

    for noun in sequences.into_iter().chain(singles) {
        if inside(&date_spans, noun.start, noun.end) {
            continue;
        }
        if seen_nouns.insert(noun.text.clone()) {
            facts.push(Fact::ProperNoun { text: noun.text });
        }
    }

    facts
}

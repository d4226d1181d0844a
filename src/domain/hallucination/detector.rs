//! Heuristic hallucination detector

use std::sync::Arc;

use tracing::debug;

use super::facts::{extract_facts, ContextIndex};
use super::report::{CategoryScores, Finding, FindingCategory, HallucinationReport};
use crate::domain::guardrail::{CategoryWeights, GuardrailConfig};
use crate::domain::lexicon::{
    contains_term, content_terms, has_citation_marker, has_negation, numerals, proper_sequences,
    quoted_spans, split_sentences, word_count, ABSOLUTE_TERMS,
};
use crate::domain::retrieval::SourceChunk;

/// Answers longer than this must signal their sources
const CITATION_WORD_LIMIT: usize = 40;
const MIN_SHARED_TERMS: usize = 2;

/// Eligible and flagged sentence counts of one detection pass
#[derive(Debug, Default)]
struct PassOutcome {
    eligible: usize,
    flagged: usize,
    findings: Vec<Finding>,
}

impl PassOutcome {
    fn score(&self) -> f32 {
        if self.eligible == 0 {
            0.0
        } else {
            self.flagged as f32 / self.eligible as f32
        }
    }
}

/// Flags answer sentences the retrieved context does not support
#[derive(Debug, Clone)]
pub struct HallucinationDetector {
    config: Arc<GuardrailConfig>,
}

impl HallucinationDetector {
    pub fn new(config: Arc<GuardrailConfig>) -> Self {
        Self { config }
    }

    /// Run every detection pass over the answer and aggregate the risk
    pub fn detect(
        &self,
        question: &str,
        answer: &str,
        context: &[SourceChunk],
    ) -> HallucinationReport {
        let index = ContextIndex::build(context);
        let sentences = split_sentences(answer);

        let unsupported = unsupported_claims(&sentences, &index);
        let contradictions = contradictions(&sentences, &index);
        let fabricated = fabricated_facts(&sentences, &index);
        let exaggerations = exaggerations(&sentences, &index);
        let citation = citation_issues(answer, &index);

        let category_scores = CategoryScores {
            unsupported_claim: unsupported.score(),
            contradiction: contradictions.score(),
            fabricated_fact: fabricated.score(),
            exaggeration: exaggerations.score(),
            citation_issue: citation.score(),
        };

        let risk = weighted_risk(&self.config.category_weights(), &category_scores);

        let passes = [unsupported, contradictions, fabricated, exaggerations, citation];
        let findings: Vec<Finding> = passes
            .into_iter()
            .flat_map(|pass| pass.findings)
            .collect();

        let report = HallucinationReport {
            findings,
            category_scores,
            confidence_score: 1.0 - risk,
            overall_hallucination_risk: risk,
            is_hallucination_likely: risk > self.config.hallucination_threshold,
        };

        debug!(
            question_words = word_count(question),
            sentences = sentences.len(),
            findings = report.findings.len(),
            risk = report.overall_hallucination_risk,
            likely = report.is_hallucination_likely,
            "Detected hallucination risk"
        );

        report
    }
}

/// Numerals, quoted spans and proper-noun sequences of a sentence
fn key_phrases(sentence: &str) -> Vec<String> {
    let mut phrases: Vec<String> = numerals(sentence).into_iter().map(str::to_string).collect();
    phrases.extend(quoted_spans(sentence).into_iter().map(str::to_string));
    phrases.extend(proper_sequences(sentence).into_iter().map(|p| p.text));
    phrases
}

fn unsupported_claims(sentences: &[&str], index: &ContextIndex) -> PassOutcome {
    let mut outcome = PassOutcome::default();

    for sentence in sentences {
        let phrases = key_phrases(sentence);
        if phrases.is_empty() {
            continue;
        }
        outcome.eligible += 1;

        if let Some(missing) = phrases.iter().find(|p| !index.contains(p)) {
            outcome.flagged += 1;
            outcome.findings.push(
                Finding::new(*sentence, FindingCategory::UnsupportedClaim).with_matched(missing),
            );
        }
    }

    outcome
}

fn contradictions(sentences: &[&str], index: &ContextIndex) -> PassOutcome {
    let mut outcome = PassOutcome::default();

    for sentence in sentences {
        if !has_negation(sentence) {
            continue;
        }
        outcome.eligible += 1;

        let terms = content_terms(sentence);
        let opposing = index.sentences().iter().filter(|c| !c.negated).find(|c| {
            let shared = terms.intersection(&c.terms).count();
            shared >= MIN_SHARED_TERMS && shared * 2 >= terms.len()
        });

        if let Some(evidence) = opposing {
            outcome.flagged += 1;
            outcome.findings.push(
                Finding::new(*sentence, FindingCategory::Contradiction)
                    .with_evidence(evidence.text.clone()),
            );
        }
    }

    outcome
}

fn fabricated_facts(sentences: &[&str], index: &ContextIndex) -> PassOutcome {
    let mut outcome = PassOutcome::default();

    for sentence in sentences {
        let facts = extract_facts(sentence);
        if facts.is_empty() {
            continue;
        }
        outcome.eligible += 1;

        let unsupported: Vec<Finding> = facts
            .iter()
            .filter(|fact| !index.supports(fact))
            .map(|fact| {
                Finding::new(*sentence, FindingCategory::FabricatedFact).with_matched(fact.text())
            })
            .collect();

        if !unsupported.is_empty() {
            outcome.flagged += 1;
            outcome.findings.extend(unsupported);
        }
    }

    outcome
}

fn exaggerations(sentences: &[&str], index: &ContextIndex) -> PassOutcome {
    let mut outcome = PassOutcome::default();

    for sentence in sentences {
        let absolutes: Vec<&str> = ABSOLUTE_TERMS
            .iter()
            .copied()
            .filter(|term| contains_term(sentence, term))
            .collect();
        if absolutes.is_empty() {
            continue;
        }
        outcome.eligible += 1;

        let terms = content_terms(sentence);
        let uncorroborated = absolutes.into_iter().find(|term| {
            !index.sentences().iter().any(|c| {
                !c.hedged && contains_term(&c.text, term) && !terms.is_disjoint(&c.terms)
            })
        });

        if let Some(term) = uncorroborated {
            outcome.flagged += 1;
            outcome
                .findings
                .push(Finding::new(*sentence, FindingCategory::Exaggeration).with_matched(term));
        }
    }

    outcome
}

/// Weighted sum of the category scores, clamped to [0, 1]
fn weighted_risk(weights: &CategoryWeights, scores: &CategoryScores) -> f32 {
    (weights.unsupported_claim * scores.unsupported_claim
        + weights.contradiction * scores.contradiction
        + weights.fabricated_fact * scores.fabricated_fact
        + weights.exaggeration * scores.exaggeration
        + weights.citation_issue * scores.citation_issue)
        .clamp(0.0, 1.0)
}

/// A citation marker only counts when there is context to cite
fn citation_issues(answer: &str, index: &ContextIndex) -> PassOutcome {
    let mut outcome = PassOutcome::default();

    if word_count(answer) > CITATION_WORD_LIMIT {
        outcome.eligible = 1;
        if index.is_empty() || !has_citation_marker(answer) {
            outcome.flagged = 1;
            outcome
                .findings
                .push(Finding::new(answer.trim(), FindingCategory::CitationIssue));
        }
    }

    outcome
}

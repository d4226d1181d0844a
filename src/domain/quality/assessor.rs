//! Heuristic answer quality assessor

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::debug;

use super::metrics::{QualityDimension, QualityLevel, QualityMetrics};
use crate::domain::guardrail::{GuardrailConfig, QualityWeights};
use crate::domain::lexicon::{
    contains_any, content_terms, has_enumeration, hedge_count, is_numeric, numerals,
    proper_sequences, quoted_spans, split_sentences, strip_quoted, word_count, words,
    INCOMPLETE_INDICATORS,
};
use crate::domain::retrieval::{combine_context, SourceChunk};

const COMPLETENESS_BASE: f32 = 0.30;
const COMPLETENESS_LENGTH_GAIN: f32 = 0.55;
const TARGET_WORDS: f32 = 120.0;
const MIN_WORDS: usize = 30;
const SHORT_ANSWER_CAP: f32 = 0.30;
const INCOMPLETE_ANSWER_CAP: f32 = 0.40;

const SPECIFICITY_BASE: f32 = 0.15;
const DETAIL_GAIN: f32 = 0.70;
const VARIATION_GAIN: f32 = 0.15;
const DETAIL_SATURATION: f32 = 3.0;

const RELEVANCE_BASE: f32 = 0.25;
const OVERLAP_GAIN: f32 = 0.60;
const GROUNDING_GAIN: f32 = 0.15;
const NEUTRAL_OVERLAP: f32 = 0.5;

const FIRST_HEDGE_PENALTY: f32 = 0.35;
const HEDGE_DECAY: f32 = 0.6;

const RECOMMENDATION_THRESHOLD: f32 = 0.5;

/// Scores answers on completeness, specificity, relevance and confidence
///
/// Every score is a pure function of the inputs and the shared configuration.
#[derive(Debug, Clone)]
pub struct QualityAssessor {
    config: Arc<GuardrailConfig>,
}

impl QualityAssessor {
    pub fn new(config: Arc<GuardrailConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GuardrailConfig {
        &self.config
    }

    /// Assess one answer against its question and retrieved context
    pub fn assess(&self, question: &str, answer: &str, context: &[SourceChunk]) -> QualityMetrics {
        if question.trim().is_empty() || answer.trim().is_empty() {
            debug!("Empty question or answer, returning zero quality metrics");
            return QualityMetrics {
                needs_fallback: 0.0 < self.config.quality_threshold,
                ..QualityMetrics::zero()
            };
        }

        let context_text = combine_context(context);

        let completeness = completeness(answer);
        let specificity = specificity(answer);
        let relevance = relevance(question, answer, &context_text);
        let confidence = confidence(answer);

        let weights = self.config.quality_weights();
        let overall_score = (weights.completeness * completeness
            + weights.specificity * specificity
            + weights.relevance * relevance
            + weights.confidence * confidence)
            .clamp(0.0, 1.0);

        let mut metrics = QualityMetrics {
            completeness,
            specificity,
            relevance,
            confidence,
            overall_score,
            quality_level: QualityLevel::from_score(overall_score),
            needs_fallback: overall_score < self.config.quality_threshold,
            recommendations: Vec::new(),
        };
        metrics.recommendations = recommendations(&metrics, &weights);

        debug!(
            completeness = metrics.completeness,
            specificity = metrics.specificity,
            relevance = metrics.relevance,
            confidence = metrics.confidence,
            overall = metrics.overall_score,
            level = %metrics.quality_level,
            needs_fallback = metrics.needs_fallback,
            "Assessed answer quality"
        );

        metrics
    }
}

fn completeness(answer: &str) -> f32 {
    let word_total = word_count(answer);
    let sentence_total = split_sentences(answer).len();

    let mut score =
        COMPLETENESS_BASE + COMPLETENESS_LENGTH_GAIN * (word_total as f32 / TARGET_WORDS).min(1.0);

    if sentence_total >= 5 {
        score += 0.15;
    } else if sentence_total >= 3 {
        score += 0.10;
    }

    if has_enumeration(answer) {
        score += 0.10;
    }

    let mut score = score.min(1.0);

    if word_total < MIN_WORDS {
        score = score.min(SHORT_ANSWER_CAP);
    }
    if contains_any(answer, INCOMPLETE_INDICATORS) {
        score = score.min(INCOMPLETE_ANSWER_CAP);
    }

    score
}

fn specificity(answer: &str) -> f32 {
    let raw = numerals(answer).len() as f32
        + 1.5 * quoted_spans(answer).len() as f32
        + proper_sequences(answer).len() as f32;
    let detail = 1.0 - (-raw / DETAIL_SATURATION).exp();

    (SPECIFICITY_BASE + DETAIL_GAIN * detail + VARIATION_GAIN * length_variation(answer))
        .clamp(0.0, 1.0)
}

/// Coefficient of variation of sentence lengths, ignoring numerals and quotes
fn length_variation(answer: &str) -> f32 {
    let stripped = strip_quoted(answer);
    let lengths: Vec<f32> = split_sentences(&stripped)
        .into_iter()
        .map(|sentence| words(sentence).iter().filter(|w| !is_numeric(w)).count())
        .filter(|&len| len > 0)
        .map(|len| len as f32)
        .collect();

    if lengths.len() < 2 {
        return 0.0;
    }

    let mean = lengths.iter().sum::<f32>() / lengths.len() as f32;
    let variance =
        lengths.iter().map(|len| (len - mean).powi(2)).sum::<f32>() / lengths.len() as f32;

    (variance.sqrt() / mean).min(1.0)
}

fn relevance(question: &str, answer: &str, context_text: &str) -> f32 {
    let question_terms = content_terms(question);
    let answer_terms = content_terms(answer);
    let context_terms = content_terms(context_text);

    let overlap = if question_terms.is_empty() {
        NEUTRAL_OVERLAP
    } else {
        question_terms.intersection(&answer_terms).count() as f32 / question_terms.len() as f32
    };

    let grounding = if answer_terms.is_empty() {
        0.0
    } else {
        answer_terms.intersection(&context_terms).count() as f32 / answer_terms.len() as f32
    };

    (RELEVANCE_BASE + OVERLAP_GAIN * overlap + GROUNDING_GAIN * grounding).min(1.0)
}

fn confidence(answer: &str) -> f32 {
    let hedges = hedge_count(answer);
    let penalty: f32 = (0..hedges)
        .map(|i| FIRST_HEDGE_PENALTY * HEDGE_DECAY.powi(i as i32))
        .sum();

    (1.0 - penalty).clamp(0.0, 1.0)
}

fn recommendations(metrics: &QualityMetrics, weights: &QualityWeights) -> Vec<String> {
    let weight_of = |dimension: QualityDimension| match dimension {
        QualityDimension::Completeness => weights.completeness,
        QualityDimension::Specificity => weights.specificity,
        QualityDimension::Relevance => weights.relevance,
        QualityDimension::Confidence => weights.confidence,
    };

    let mut low: Vec<(QualityDimension, f32)> = QualityDimension::ALL
        .iter()
        .copied()
        .filter(|&d| metrics.dimension(d) < RECOMMENDATION_THRESHOLD)
        .map(|d| (d, weight_of(d) * (1.0 - metrics.dimension(d))))
        .collect();

    // Stable sort keeps dimension order on equal deficits
    low.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    low.into_iter()
        .map(|(d, _)| d.recommendation().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessor() -> QualityAssessor {
        QualityAssessor::new(Arc::new(GuardrailConfig::default()))
    }

    fn release_context() -> Vec<SourceChunk> {
        vec![SourceChunk::new("c-1", "The system was released in 2023.", 0.9)]
    }

    fn approx(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-3,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_grounded_short_answer() {
        let metrics = assessor().assess(
            "When was the system released?",
            "The system was released in 2023.",
            &release_context(),
        );

        approx(metrics.completeness, 0.30);
        approx(metrics.specificity, 0.3484);
        approx(metrics.relevance, 1.0);
        approx(metrics.confidence, 1.0);
        approx(metrics.overall_score, 0.6271);
        assert_eq!(metrics.quality_level, QualityLevel::Fair);
        assert!(!metrics.needs_fallback);
        assert_eq!(
            metrics.recommendations,
            vec![
                QualityDimension::Completeness.recommendation().to_string(),
                QualityDimension::Specificity.recommendation().to_string(),
            ]
        );
    }

    #[test]
    fn test_hedged_answer() {
        let metrics = assessor().assess(
            "When was the system released?",
            "I'm not sure, maybe it was released recently.",
            &release_context(),
        );

        approx(metrics.confidence, 0.44);
        approx(metrics.specificity, 0.15);
        approx(metrics.relevance, 0.5875);
        assert!(metrics.overall_score < 0.4);
        assert_eq!(metrics.quality_level, QualityLevel::VeryPoor);
        assert!(metrics.needs_fallback);
        assert!(metrics
            .recommendations
            .contains(&QualityDimension::Confidence.recommendation().to_string()));
    }

    #[test]
    fn test_empty_inputs_yield_zero_metrics() {
        let assessor = assessor();

        assert_eq!(assessor.assess("Question?", "", &[]), QualityMetrics::zero());
        assert_eq!(assessor.assess("", "An answer.", &[]), QualityMetrics::zero());
        assert_eq!(assessor.assess("Question?", "   \n", &[]), QualityMetrics::zero());
    }

    #[test]
    fn test_empty_answer_respects_zero_threshold() {
        let assessor = QualityAssessor::new(Arc::new(
            GuardrailConfig::default().with_quality_threshold(0.0),
        ));

        let metrics = assessor.assess("Question?", "", &[]);
        assert_eq!(metrics.overall_score, 0.0);
        assert_eq!(
            metrics.needs_fallback,
            metrics.overall_score < assessor.config().quality_threshold
        );
        assert!(!metrics.needs_fallback);
    }

    #[test]
    fn test_assessment_is_deterministic() {
        let assessor = assessor();
        let first = assessor.assess("What is it?", "It is a \"tool\" from Acme Corp.", &[]);
        let second = assessor.assess("What is it?", "It is a \"tool\" from Acme Corp.", &[]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_numeral_never_lowers_specificity() {
        let before = specificity("The update shipped last spring. It added several improvements.");
        let after =
            specificity("The update shipped last spring 2023. It added several improvements.");
        assert!(after > before);
    }

    #[test]
    fn test_quote_never_lowers_specificity() {
        let before = specificity("The feature is called fast mode.");
        let after = specificity("The feature is called \"fast mode\".");
        assert!(after >= before);
    }

    #[test]
    fn test_long_structured_answer_is_complete() {
        let mut answer = String::from("Firstly, the service stores data. ");
        answer.push_str(&"The service stores every record in a replicated log. ".repeat(14));

        approx(completeness(&answer), 1.0);
    }

    #[test]
    fn test_incomplete_indicator_caps_completeness() {
        let mut answer = String::from("I don't know the exact figure. ");
        answer.push_str(&"The report covers regional sales trends for the quarter. ".repeat(4));

        assert!(word_count(&answer) >= MIN_WORDS);
        approx(completeness(&answer), INCOMPLETE_ANSWER_CAP);
    }

    #[test]
    fn test_confidence_penalty_diminishes() {
        approx(confidence("It works."), 1.0);
        approx(confidence("Maybe it works."), 0.65);
        approx(confidence("Maybe it works, perhaps."), 0.44);

        let heavy = confidence(&"maybe ".repeat(40));
        assert!(heavy > 0.0);
        assert!(heavy < 0.2);
    }

    #[test]
    fn test_question_without_content_terms_uses_neutral_overlap() {
        let score = relevance("What is it?", "Rust", "");
        approx(score, RELEVANCE_BASE + OVERLAP_GAIN * NEUTRAL_OVERLAP);
    }

    #[test]
    fn test_metrics_stay_in_range() {
        let assessor = assessor();
        let answers = [
            "Yes.",
            "ALL ALL ALL 1 2 3 4 5 6 7 8 9 10 \"a b\" \"c d\" New York City",
            "maybe maybe maybe maybe maybe maybe",
        ];

        for answer in answers {
            let metrics = assessor.assess("Why?", answer, &release_context());
            for value in [
                metrics.completeness,
                metrics.specificity,
                metrics.relevance,
                metrics.confidence,
                metrics.overall_score,
            ] {
                assert!((0.0..=1.0).contains(&value), "{answer}: {value}");
            }
        }
    }

    #[test]
    fn test_needs_fallback_follows_threshold() {
        let strict = QualityAssessor::new(Arc::new(
            GuardrailConfig::default().with_quality_threshold(0.9),
        ));
        let lenient = QualityAssessor::new(Arc::new(
            GuardrailConfig::default().with_quality_threshold(0.1),
        ));
        let question = "When was the system released?";
        let answer = "The system was released in 2023.";

        let strict_metrics = strict.assess(question, answer, &release_context());
        let lenient_metrics = lenient.assess(question, answer, &release_context());

        assert!(strict_metrics.needs_fallback);
        assert!(!lenient_metrics.needs_fallback);
        assert_eq!(strict_metrics.overall_score, lenient_metrics.overall_score);
    }
}

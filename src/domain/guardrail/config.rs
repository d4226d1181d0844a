//! Guardrail configuration types

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Allowed drift when checking that a weight set sums to 1.0
pub const WEIGHT_SUM_TOLERANCE: f32 = 1e-3;

/// Weights of the four quality dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityWeights {
    pub completeness: f32,
    pub specificity: f32,
    pub relevance: f32,
    pub confidence: f32,
}

impl QualityWeights {
    pub fn sum(&self) -> f32 {
        self.completeness + self.specificity + self.relevance + self.confidence
    }
}

/// Weights of the five hallucination categories
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub unsupported_claim: f32,
    pub contradiction: f32,
    pub fabricated_fact: f32,
    pub exaggeration: f32,
    pub citation_issue: f32,
}

impl CategoryWeights {
    pub fn sum(&self) -> f32 {
        self.unsupported_claim
            + self.contradiction
            + self.fabricated_fact
            + self.exaggeration
            + self.citation_issue
    }
}

/// Process-wide guardrail configuration
///
/// Loaded once at start-up and validated with [`GuardrailConfig::validate`];
/// components hold it behind an `Arc` and never mutate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardrailConfig {
    #[serde(default = "default_completeness_weight")]
    pub completeness_weight: f32,
    #[serde(default = "default_specificity_weight")]
    pub specificity_weight: f32,
    #[serde(default = "default_relevance_weight")]
    pub relevance_weight: f32,
    #[serde(default = "default_confidence_weight")]
    pub confidence_weight: f32,

    /// Answers scoring below this need a fallback (0.0 - 1.0)
    #[serde(default = "default_quality_threshold")]
    pub quality_threshold: f32,
    /// Risk above this marks a hallucination as likely (0.0 - 1.0)
    #[serde(default = "default_hallucination_threshold")]
    pub hallucination_threshold: f32,

    #[serde(default = "default_unsupported_claim_weight")]
    pub unsupported_claim_weight: f32,
    #[serde(default = "default_contradiction_weight")]
    pub contradiction_weight: f32,
    #[serde(default = "default_fabricated_fact_weight")]
    pub fabricated_fact_weight: f32,
    #[serde(default = "default_exaggeration_weight")]
    pub exaggeration_weight: f32,
    #[serde(default = "default_citation_issue_weight")]
    pub citation_issue_weight: f32,

    /// Whether hallucination detection runs at all
    #[serde(default = "default_true")]
    pub check_hallucination: bool,
    /// Whether low-confidence answers trigger a retrieval retry
    #[serde(default = "default_true")]
    pub enable_fallback: bool,

    /// Retrieval breadth of the primary query
    #[serde(default = "default_k")]
    pub default_k: usize,
    /// Retrieval breadth of the increase-context retry
    #[serde(default = "default_fallback_k")]
    pub fallback_k: usize,
    /// Similarity cutoff of the primary retrieval
    #[serde(default = "default_similarity_cutoff")]
    pub similarity_cutoff: f32,
    /// Stricter cutoff used by the strict-matching retry
    #[serde(default = "default_strict_similarity_cutoff")]
    pub strict_similarity_cutoff: f32,
    /// Chunks retrieved per query variant during query expansion
    #[serde(default = "default_expansion_k")]
    pub expansion_k: usize,
    /// Upper bound for one fallback attempt against the collaborator
    #[serde(default = "default_collaborator_timeout_ms")]
    pub collaborator_timeout_ms: u64,
}

fn default_completeness_weight() -> f32 {
    0.30
}

fn default_specificity_weight() -> f32 {
    0.25
}

fn default_relevance_weight() -> f32 {
    0.25
}

fn default_confidence_weight() -> f32 {
    0.20
}

fn default_quality_threshold() -> f32 {
    0.6
}

fn default_hallucination_threshold() -> f32 {
    0.5
}

fn default_unsupported_claim_weight() -> f32 {
    0.30
}

fn default_contradiction_weight() -> f32 {
    0.25
}

fn default_fabricated_fact_weight() -> f32 {
    0.25
}

fn default_exaggeration_weight() -> f32 {
    0.10
}

fn default_citation_issue_weight() -> f32 {
    0.10
}

fn default_true() -> bool {
    true
}

fn default_k() -> usize {
    4
}

fn default_fallback_k() -> usize {
    8
}

fn default_similarity_cutoff() -> f32 {
    0.5
}

fn default_strict_similarity_cutoff() -> f32 {
    0.75
}

fn default_expansion_k() -> usize {
    3
}

fn default_collaborator_timeout_ms() -> u64 {
    30_000
}

impl Default for GuardrailConfig {
    fn default() -> Self {
        Self {
            completeness_weight: default_completeness_weight(),
            specificity_weight: default_specificity_weight(),
            relevance_weight: default_relevance_weight(),
            confidence_weight: default_confidence_weight(),
            quality_threshold: default_quality_threshold(),
            hallucination_threshold: default_hallucination_threshold(),
            unsupported_claim_weight: default_unsupported_claim_weight(),
            contradiction_weight: default_contradiction_weight(),
            fabricated_fact_weight: default_fabricated_fact_weight(),
            exaggeration_weight: default_exaggeration_weight(),
            citation_issue_weight: default_citation_issue_weight(),
            check_hallucination: default_true(),
            enable_fallback: default_true(),
            default_k: default_k(),
            fallback_k: default_fallback_k(),
            similarity_cutoff: default_similarity_cutoff(),
            strict_similarity_cutoff: default_strict_similarity_cutoff(),
            expansion_k: default_expansion_k(),
            collaborator_timeout_ms: default_collaborator_timeout_ms(),
        }
    }
}

impl GuardrailConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the four quality weights
    pub fn with_quality_weights(mut self, weights: QualityWeights) -> Self {
        self.completeness_weight = weights.completeness;
        self.specificity_weight = weights.specificity;
        self.relevance_weight = weights.relevance;
        self.confidence_weight = weights.confidence;
        self
    }

    /// Set the five hallucination category weights
    pub fn with_category_weights(mut self, weights: CategoryWeights) -> Self {
        self.unsupported_claim_weight = weights.unsupported_claim;
        self.contradiction_weight = weights.contradiction;
        self.fabricated_fact_weight = weights.fabricated_fact;
        self.exaggeration_weight = weights.exaggeration;
        self.citation_issue_weight = weights.citation_issue;
        self
    }

    /// Set the quality threshold
    pub fn with_quality_threshold(mut self, threshold: f32) -> Self {
        self.quality_threshold = threshold;
        self
    }

    /// Set the hallucination threshold
    pub fn with_hallucination_threshold(mut self, threshold: f32) -> Self {
        self.hallucination_threshold = threshold;
        self
    }

    /// Enable or disable hallucination detection
    pub fn with_check_hallucination(mut self, enabled: bool) -> Self {
        self.check_hallucination = enabled;
        self
    }

    /// Enable or disable the fallback loop
    pub fn with_enable_fallback(mut self, enabled: bool) -> Self {
        self.enable_fallback = enabled;
        self
    }

    /// Set the primary and fallback retrieval breadth
    pub fn with_retrieval_k(mut self, default_k: usize, fallback_k: usize) -> Self {
        self.default_k = default_k;
        self.fallback_k = fallback_k;
        self
    }

    /// Set the default and strict similarity cutoffs
    pub fn with_similarity_cutoffs(mut self, default: f32, strict: f32) -> Self {
        self.similarity_cutoff = default;
        self.strict_similarity_cutoff = strict;
        self
    }

    /// Set the fallback attempt timeout
    pub fn with_collaborator_timeout(mut self, timeout: Duration) -> Self {
        self.collaborator_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn quality_weights(&self) -> QualityWeights {
        QualityWeights {
            completeness: self.completeness_weight,
            specificity: self.specificity_weight,
            relevance: self.relevance_weight,
            confidence: self.confidence_weight,
        }
    }

    pub fn category_weights(&self) -> CategoryWeights {
        CategoryWeights {
            unsupported_claim: self.unsupported_claim_weight,
            contradiction: self.contradiction_weight,
            fabricated_fact: self.fabricated_fact_weight,
            exaggeration: self.exaggeration_weight,
            citation_issue: self.citation_issue_weight,
        }
    }

    /// Timeout applied to one fallback attempt
    pub fn collaborator_timeout(&self) -> Duration {
        Duration::from_millis(self.collaborator_timeout_ms)
    }

    /// Check every invariant, reporting all violations at once
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors = Vec::new();

        let quality_weights = [
            ("completeness_weight", self.completeness_weight),
            ("specificity_weight", self.specificity_weight),
            ("relevance_weight", self.relevance_weight),
            ("confidence_weight", self.confidence_weight),
        ];
        let category_weights = [
            ("unsupported_claim_weight", self.unsupported_claim_weight),
            ("contradiction_weight", self.contradiction_weight),
            ("fabricated_fact_weight", self.fabricated_fact_weight),
            ("exaggeration_weight", self.exaggeration_weight),
            ("citation_issue_weight", self.citation_issue_weight),
        ];
        let unit_values = [
            ("quality_threshold", self.quality_threshold),
            ("hallucination_threshold", self.hallucination_threshold),
            ("similarity_cutoff", self.similarity_cutoff),
            ("strict_similarity_cutoff", self.strict_similarity_cutoff),
        ];

        for (name, value) in quality_weights
            .iter()
            .chain(category_weights.iter())
            .chain(unit_values.iter())
        {
            if !(0.0..=1.0).contains(value) {
                errors.push(format!("{} must be between 0 and 1, got {}", name, value));
            }
        }

        let quality_sum = self.quality_weights().sum();
        if (quality_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            errors.push(format!("quality weights must sum to 1.0, got {:.3}", quality_sum));
        }

        let category_sum = self.category_weights().sum();
        if (category_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            errors.push(format!(
                "hallucination category weights must sum to 1.0, got {:.3}",
                category_sum
            ));
        }

        if self.strict_similarity_cutoff <= self.similarity_cutoff {
            errors.push(format!(
                "strict_similarity_cutoff ({}) must exceed similarity_cutoff ({})",
                self.strict_similarity_cutoff, self.similarity_cutoff
            ));
        }

        if self.default_k == 0 {
            errors.push("default_k must be greater than 0".to_string());
        }

        if self.fallback_k <= self.default_k {
            errors.push(format!(
                "fallback_k ({}) must exceed default_k ({})",
                self.fallback_k, self.default_k
            ));
        }

        if self.expansion_k == 0 {
            errors.push("expansion_k must be greater than 0".to_string());
        }

        if self.collaborator_timeout_ms == 0 {
            errors.push("collaborator_timeout_ms must be greater than 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::configuration(errors.join("; ")))
        }
    }

    /// Validate and return the configuration
    pub fn validated(self) -> Result<Self, DomainError> {
        self.validate()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GuardrailConfig::default();

        assert_eq!(config.quality_threshold, 0.6);
        assert_eq!(config.hallucination_threshold, 0.5);
        assert_eq!(config.default_k, 4);
        assert_eq!(config.fallback_k, 8);
        assert!(config.check_hallucination);
        assert!(config.enable_fallback);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let config = GuardrailConfig::default();

        assert!((config.quality_weights().sum() - 1.0).abs() < WEIGHT_SUM_TOLERANCE);
        assert!((config.category_weights().sum() - 1.0).abs() < WEIGHT_SUM_TOLERANCE);
    }

    #[test]
    fn test_quality_weights_not_normalized() {
        let config = GuardrailConfig::new().with_quality_weights(QualityWeights {
            completeness: 0.4,
            specificity: 0.3,
            relevance: 0.3,
            confidence: 0.2,
        });

        let error = config.validate().unwrap_err();
        assert!(matches!(error, DomainError::Configuration { .. }));
        assert!(error.to_string().contains("quality weights must sum to 1.0"));
        assert_eq!(config.completeness_weight, 0.4);
    }

    #[test]
    fn test_category_weights_must_sum_to_one() {
        let config = GuardrailConfig::new().with_category_weights(CategoryWeights {
            unsupported_claim: 0.5,
            contradiction: 0.5,
            fabricated_fact: 0.5,
            exaggeration: 0.0,
            citation_issue: 0.0,
        });

        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("category weights must sum to 1.0"));
    }

    #[test]
    fn test_thresholds_outside_unit_interval() {
        let config = GuardrailConfig::new()
            .with_quality_threshold(1.5)
            .with_hallucination_threshold(-0.1);

        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("quality_threshold"));
        assert!(message.contains("hallucination_threshold"));
    }

    #[test]
    fn test_nan_threshold_rejected() {
        let config = GuardrailConfig::new().with_quality_threshold(f32::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_retrieval_breadth_rules() {
        let config = GuardrailConfig::new().with_retrieval_k(4, 4);
        assert!(config.validate().unwrap_err().to_string().contains("fallback_k"));

        let config = GuardrailConfig::new().with_retrieval_k(0, 8);
        assert!(config.validate().unwrap_err().to_string().contains("default_k"));
    }

    #[test]
    fn test_strict_cutoff_must_be_stricter() {
        let config = GuardrailConfig::new().with_similarity_cutoffs(0.8, 0.7);
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("strict_similarity_cutoff"));
    }

    #[test]
    fn test_builder_pattern() {
        let config = GuardrailConfig::new()
            .with_quality_threshold(0.7)
            .with_hallucination_threshold(0.4)
            .with_check_hallucination(false)
            .with_enable_fallback(false)
            .with_retrieval_k(5, 10)
            .with_collaborator_timeout(Duration::from_secs(2));

        assert_eq!(config.quality_threshold, 0.7);
        assert_eq!(config.hallucination_threshold, 0.4);
        assert!(!config.check_hallucination);
        assert!(!config.enable_fallback);
        assert_eq!(config.default_k, 5);
        assert_eq!(config.fallback_k, 10);
        assert_eq!(config.collaborator_timeout(), Duration::from_secs(2));
        assert!(config.validated().is_ok());
    }

    #[test]
    fn test_deserialize_partial_config_uses_defaults() {
        let config: GuardrailConfig =
            serde_json::from_str(r#"{"quality_threshold": 0.65, "fallback_k": 12}"#).unwrap();

        assert_eq!(config.quality_threshold, 0.65);
        assert_eq!(config.fallback_k, 12);
        assert_eq!(config.completeness_weight, 0.30);
        assert!(config.validate().is_ok());
    }
}

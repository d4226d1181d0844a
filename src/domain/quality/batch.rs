//! Batch assessment over many question/answer pairs

use serde::{Deserialize, Serialize};

use super::assessor::QualityAssessor;
use super::metrics::QualityMetrics;
use crate::domain::retrieval::SourceChunk;

/// One item of a batch assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentInput {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub context: Vec<SourceChunk>,
}

impl AssessmentInput {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        context: Vec<SourceChunk>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            context,
        }
    }
}

/// Aggregate statistics of a batch assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchAssessment {
    pub total: usize,
    pub average_score: f32,
    pub min_score: f32,
    pub max_score: f32,
    pub assessments: Vec<QualityMetrics>,
}

impl BatchAssessment {
    fn empty() -> Self {
        Self {
            total: 0,
            average_score: 0.0,
            min_score: 0.0,
            max_score: 0.0,
            assessments: Vec::new(),
        }
    }
}

impl QualityAssessor {
    /// Assess every input, in order, and summarize the overall scores
    pub fn assess_batch(&self, inputs: &[AssessmentInput]) -> BatchAssessment {
        if inputs.is_empty() {
            return BatchAssessment::empty();
        }

        let assessments: Vec<QualityMetrics> = inputs
            .iter()
            .map(|input| self.assess(&input.question, &input.answer, &input.context))
            .collect();

        let scores = assessments.iter().map(|m| m.overall_score);
        let total = assessments.len();
        let average_score = scores.clone().sum::<f32>() / total as f32;
        let min_score = scores.clone().fold(f32::INFINITY, f32::min);
        let max_score = scores.fold(f32::NEG_INFINITY, f32::max);

        BatchAssessment {
            total,
            average_score,
            min_score,
            max_score,
            assessments,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::guardrail::GuardrailConfig;

    #[test]
    fn test_empty_batch() {
        let assessor = QualityAssessor::new(Arc::new(GuardrailConfig::default()));
        let batch = assessor.assess_batch(&[]);

        assert_eq!(batch.total, 0);
        assert_eq!(batch.average_score, 0.0);
        assert_eq!(batch.min_score, 0.0);
        assert_eq!(batch.max_score, 0.0);
        assert!(batch.assessments.is_empty());
    }

    #[test]
    fn test_batch_statistics() {
        let assessor = QualityAssessor::new(Arc::new(GuardrailConfig::default()));
        let context = vec![SourceChunk::new("c-1", "The system was released in 2023.", 0.9)];
        let inputs = vec![
            AssessmentInput::new(
                "When was the system released?",
                "The system was released in 2023.",
                context.clone(),
            ),
            AssessmentInput::new("When was the system released?", "", context),
        ];

        let batch = assessor.assess_batch(&inputs);

        assert_eq!(batch.total, 2);
        assert_eq!(batch.assessments.len(), 2);
        assert_eq!(batch.min_score, 0.0);
        assert_eq!(batch.max_score, batch.assessments[0].overall_score);
        assert!((batch.average_score - batch.max_score / 2.0).abs() < 1e-6);
    }
}

//! Guardrail pipeline implementation
//!
//! Runs quality assessment and hallucination detection side by side, then
//! hands both results to the fallback orchestrator.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::fallback::FallbackResult;
use crate::domain::guardrail::GuardrailConfig;
use crate::domain::hallucination::{HallucinationDetector, HallucinationReport};
use crate::domain::quality::{QualityAssessor, QualityMetrics};
use crate::domain::retrieval::{RagCollaborator, SourceChunk};
use crate::domain::DomainError;
use crate::infrastructure::fallback::FallbackOrchestrator;

/// Everything the guardrails concluded about one answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardrailOutcome {
    pub quality: QualityMetrics,
    /// `None` when hallucination checking is disabled
    pub hallucination: Option<HallucinationReport>,
    pub fallback: Option<FallbackResult>,
    pub final_answer: String,
    pub final_context: Vec<SourceChunk>,
    pub fallback_applied: bool,
}

/// Assessor, detector and orchestrator wired over one collaborator
pub struct GuardrailPipeline<C>
where
    C: RagCollaborator,
{
    collaborator: Arc<C>,
    config: Arc<GuardrailConfig>,
    assessor: QualityAssessor,
    detector: HallucinationDetector,
    orchestrator: FallbackOrchestrator<C>,
}

impl<C> std::fmt::Debug for GuardrailPipeline<C>
where
    C: RagCollaborator,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardrailPipeline")
            .field("config", &self.config)
            .field("orchestrator", &self.orchestrator)
            .finish_non_exhaustive()
    }
}

fn task_failed(err: JoinError) -> DomainError {
    DomainError::internal(format!("Guardrail task failed: {}", err))
}

impl<C> GuardrailPipeline<C>
where
    C: RagCollaborator,
{
    /// Create a new pipeline, rejecting an invalid configuration
    pub fn new(collaborator: Arc<C>, config: GuardrailConfig) -> Result<Self, DomainError> {
        config.validate()?;
        let config = Arc::new(config);

        Ok(Self {
            assessor: QualityAssessor::new(config.clone()),
            detector: HallucinationDetector::new(config.clone()),
            orchestrator: FallbackOrchestrator::new(collaborator.clone(), config.clone()),
            collaborator,
            config,
        })
    }

    pub fn config(&self) -> &GuardrailConfig {
        &self.config
    }

    /// Retrieve, generate and evaluate an answer to the question
    ///
    /// Failures of the primary retrieval or generation are returned as errors;
    /// only the fallback pass absorbs collaborator failures.
    pub async fn answer(&self, question: &str) -> Result<GuardrailOutcome, DomainError> {
        self.answer_with_cancel(question, &CancellationToken::new())
            .await
    }

    pub async fn answer_with_cancel(
        &self,
        question: &str,
        cancel: &CancellationToken,
    ) -> Result<GuardrailOutcome, DomainError> {
        let retrieved = self
            .collaborator
            .retrieve(question, self.config.default_k)
            .await?;
        let context: Vec<SourceChunk> = retrieved
            .into_iter()
            .filter(|chunk| chunk.similarity_score >= self.config.similarity_cutoff)
            .collect();

        debug!(chunks = context.len(), "Primary retrieval complete");

        let answer = self.collaborator.generate(question, &context).await?;
        self.evaluate_with_cancel(question, &answer, &context, cancel)
            .await
    }

    /// Evaluate an existing answer and apply a fallback if warranted
    pub async fn evaluate(
        &self,
        question: &str,
        answer: &str,
        context: &[SourceChunk],
    ) -> Result<GuardrailOutcome, DomainError> {
        self.evaluate_with_cancel(question, answer, context, &CancellationToken::new())
            .await
    }

    pub async fn evaluate_with_cancel(
        &self,
        question: &str,
        answer: &str,
        context: &[SourceChunk],
        cancel: &CancellationToken,
    ) -> Result<GuardrailOutcome, DomainError> {
        let quality_task = {
            let assessor = self.assessor.clone();
            let (question, answer, context) =
                (question.to_string(), answer.to_string(), context.to_vec());
            tokio::task::spawn_blocking(move || assessor.assess(&question, &answer, &context))
        };

        let detection = async {
            if !self.config.check_hallucination {
                return Ok(None);
            }
            let detector = self.detector.clone();
            let (question, answer, context) =
                (question.to_string(), answer.to_string(), context.to_vec());
            tokio::task::spawn_blocking(move || detector.detect(&question, &answer, &context))
                .await
                .map(Some)
        };

        let (quality, hallucination) = tokio::join!(quality_task, detection);
        let quality = quality.map_err(task_failed)?;
        let hallucination = hallucination.map_err(task_failed)?;

        let report = hallucination
            .clone()
            .unwrap_or_else(HallucinationReport::clean);

        let fallback = self
            .orchestrator
            .maybe_fallback_with_cancel(question, answer, &quality, &report, context, cancel)
            .await;

        let (final_answer, final_context, fallback_applied) = match &fallback {
            Some(result) if result.is_improvement() => {
                (result.new_answer.clone(), result.new_context.clone(), true)
            }
            _ => (answer.to_string(), context.to_vec(), false),
        };

        info!(
            overall = quality.overall_score,
            level = %quality.quality_level,
            risk = report.overall_hallucination_risk,
            fallback_attempted = fallback.is_some(),
            fallback_applied,
            "Guardrail evaluation complete"
        );

        Ok(GuardrailOutcome {
            quality,
            hallucination,
            fallback,
            final_answer,
            final_context,
            fallback_applied,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::guardrail::QualityWeights;
    use crate::domain::retrieval::MockRagCollaborator;

    const QUESTION: &str = "When was the system released?";
    const GROUNDED: &str = "The system was released in 2023.";
    const HEDGED: &str = "I'm not sure, maybe it was released recently.";
    const EMBELLISHED: &str = "The system was released in 2023 and won 3 international awards.";

    fn release_context() -> Vec<SourceChunk> {
        vec![SourceChunk::new("c-1", GROUNDED, 0.9)]
    }

    fn pipeline(
        mock: MockRagCollaborator,
        config: GuardrailConfig,
    ) -> GuardrailPipeline<MockRagCollaborator> {
        GuardrailPipeline::new(Arc::new(mock), config).unwrap()
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GuardrailConfig::default().with_quality_weights(QualityWeights {
            completeness: 0.5,
            specificity: 0.5,
            relevance: 0.5,
            confidence: 0.5,
        });

        let result = GuardrailPipeline::new(Arc::new(MockRagCollaborator::new()), config);
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_grounded_answer_passes_through() {
        let pipeline = pipeline(MockRagCollaborator::new(), GuardrailConfig::default());

        let outcome = pipeline
            .evaluate(QUESTION, GROUNDED, &release_context())
            .await
            .unwrap();

        assert!(outcome.fallback.is_none());
        assert!(!outcome.fallback_applied);
        assert_eq!(outcome.final_answer, GROUNDED);
        assert_eq!(outcome.final_context, release_context());
        assert!(outcome.hallucination.is_some());
    }

    #[tokio::test]
    async fn test_disabled_detection_hands_clean_report_to_fallback() {
        let config = GuardrailConfig::default().with_check_hallucination(false);
        let pipeline = pipeline(MockRagCollaborator::new(), config);

        let outcome = pipeline
            .evaluate(QUESTION, EMBELLISHED, &release_context())
            .await
            .unwrap();

        assert!(outcome.hallucination.is_none());
        assert!(!outcome.quality.needs_fallback);
        assert!(outcome.fallback.is_none());
        assert_eq!(outcome.final_answer, EMBELLISHED);
    }

    #[tokio::test]
    async fn test_improved_fallback_answer_is_adopted() {
        let mut mock = MockRagCollaborator::new();
        mock.expect_retrieve()
            .times(1)
            .returning(|_, _| Ok(release_context()));
        mock.expect_generate()
            .times(1)
            .returning(|_, _| Ok(GROUNDED.to_string()));
        let pipeline = pipeline(mock, GuardrailConfig::default());

        let outcome = pipeline
            .evaluate(QUESTION, HEDGED, &release_context())
            .await
            .unwrap();

        assert!(outcome.fallback_applied);
        assert_eq!(outcome.final_answer, GROUNDED);
        assert!(outcome.fallback.unwrap().improvement > 0.0);
    }

    #[tokio::test]
    async fn test_worse_fallback_answer_is_discarded() {
        let mut mock = MockRagCollaborator::new();
        mock.expect_retrieve_filtered()
            .times(1)
            .returning(|_, _| Ok(release_context()));
        mock.expect_generate()
            .times(1)
            .returning(|_, _| Ok("Maybe.".to_string()));
        let pipeline = pipeline(mock, GuardrailConfig::default());

        let outcome = pipeline
            .evaluate(QUESTION, EMBELLISHED, &release_context())
            .await
            .unwrap();

        let fallback = outcome.fallback.unwrap();
        assert!(!fallback.failed);
        assert!(fallback.improvement < 0.0);
        assert!(!outcome.fallback_applied);
        assert_eq!(outcome.final_answer, EMBELLISHED);
    }

    #[tokio::test]
    async fn test_answer_retrieves_and_generates() {
        let mut mock = MockRagCollaborator::new();
        mock.expect_retrieve()
            .withf(|query, k| query == QUESTION && *k == 4)
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    SourceChunk::new("c-1", GROUNDED, 0.9),
                    SourceChunk::new("c-2", "Unrelated text.", 0.1),
                ])
            });
        mock.expect_generate()
            .withf(|_, chunks| chunks.len() == 1)
            .times(1)
            .returning(|_, _| Ok(GROUNDED.to_string()));
        let pipeline = pipeline(mock, GuardrailConfig::default());

        let outcome = pipeline.answer(QUESTION).await.unwrap();

        assert_eq!(outcome.final_answer, GROUNDED);
        assert_eq!(outcome.final_context.len(), 1);
        assert!(outcome.fallback.is_none());
    }

    #[tokio::test]
    async fn test_primary_retrieval_failure_is_an_error() {
        let mut mock = MockRagCollaborator::new();
        mock.expect_retrieve()
            .returning(|_, _| Err(DomainError::collaborator("retrieve", "offline")));
        let pipeline = pipeline(mock, GuardrailConfig::default());

        let err = pipeline.answer(QUESTION).await.unwrap_err();
        assert!(err.is_collaborator());
    }
}

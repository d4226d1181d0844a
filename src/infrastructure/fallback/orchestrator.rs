//! Fallback orchestrator
//!
//! Decides whether a low-confidence answer warrants one retrieval retry,
//! runs the selected strategy against the RAG collaborator and re-assesses
//! the regenerated answer.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::fallback::{expand_query, FallbackFailure, FallbackResult, FallbackStrategy};
use crate::domain::guardrail::GuardrailConfig;
use crate::domain::hallucination::HallucinationReport;
use crate::domain::quality::{QualityAssessor, QualityMetrics};
use crate::domain::retrieval::{dedupe_chunks, RagCollaborator, SourceChunk};
use crate::domain::DomainError;

/// Chunks retrieved and the answer regenerated over them
struct Attempt {
    chunks: Vec<SourceChunk>,
    answer: String,
}

/// Pairs remembered before the oldest are forgotten
const REGISTRY_CAPACITY: usize = 4096;

/// Question/answer pairs that went through, or came out of, a fallback pass
///
/// Bounded: once full, the oldest pair is evicted first.
#[derive(Debug)]
struct AttemptRegistry {
    capacity: usize,
    seen: HashSet<(String, String)>,
    order: VecDeque<(String, String)>,
}

impl Default for AttemptRegistry {
    fn default() -> Self {
        Self::with_capacity(REGISTRY_CAPACITY)
    }
}

impl AttemptRegistry {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            seen: HashSet::new(),
            order: VecDeque::new(),
        }
    }

    /// Record the pair, returning false when it was already known
    fn claim(&mut self, question: &str, answer: &str) -> bool {
        let key = (question.to_string(), answer.to_string());
        if self.seen.contains(&key) {
            return false;
        }

        while self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.seen.remove(&oldest);
            }
        }

        self.seen.insert(key.clone());
        self.order.push_back(key);
        true
    }

    fn record_issued(&mut self, question: &str, answer: &str) {
        self.claim(question, answer);
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}

/// Runs at most one fallback pass per question/answer pair
pub struct FallbackOrchestrator<C>
where
    C: RagCollaborator,
{
    collaborator: Arc<C>,
    config: Arc<GuardrailConfig>,
    assessor: QualityAssessor,
    registry: Mutex<AttemptRegistry>,
}

impl<C> std::fmt::Debug for FallbackOrchestrator<C>
where
    C: RagCollaborator,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackOrchestrator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<C> FallbackOrchestrator<C>
where
    C: RagCollaborator,
{
    pub fn new(collaborator: Arc<C>, config: Arc<GuardrailConfig>) -> Self {
        let assessor = QualityAssessor::new(config.clone());
        Self {
            collaborator,
            config,
            assessor,
            registry: Mutex::new(AttemptRegistry::default()),
        }
    }

    pub fn config(&self) -> &GuardrailConfig {
        &self.config
    }

    /// Retry retrieval when the answer is weak; `None` when no retry is warranted
    pub async fn maybe_fallback(
        &self,
        question: &str,
        answer: &str,
        quality: &QualityMetrics,
        hallucination: &HallucinationReport,
        context: &[SourceChunk],
    ) -> Option<FallbackResult> {
        self.maybe_fallback_with_cancel(
            question,
            answer,
            quality,
            hallucination,
            context,
            &CancellationToken::new(),
        )
        .await
    }

    /// Same as [`Self::maybe_fallback`], aborting in-flight calls when `cancel` fires
    ///
    /// Cancellation, timeouts and collaborator errors never surface as errors:
    /// the result is marked failed and carries the original answer.
    pub async fn maybe_fallback_with_cancel(
        &self,
        question: &str,
        answer: &str,
        quality: &QualityMetrics,
        hallucination: &HallucinationReport,
        context: &[SourceChunk],
        cancel: &CancellationToken,
    ) -> Option<FallbackResult> {
        if !self.config.enable_fallback {
            debug!("Fallback disabled, keeping original answer");
            return None;
        }

        if !quality.needs_fallback && !hallucination.is_hallucination_likely {
            debug!(
                overall = quality.overall_score,
                risk = hallucination.overall_hallucination_risk,
                "Answer passed guardrails, no fallback needed"
            );
            return None;
        }

        if !self.registry.lock().await.claim(question, answer) {
            info!("Answer already went through a fallback pass, skipping");
            return None;
        }

        let strategy = FallbackStrategy::select(quality, hallucination, &self.config);
        let queries = self.queries_for(strategy, question);

        info!(
            strategy = %strategy,
            queries = queries.len(),
            overall = quality.overall_score,
            risk = hallucination.overall_hallucination_risk,
            "Applying fallback strategy"
        );

        let attempt = self.execute(strategy, question, &queries);
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FallbackFailure::Cancelled),
            timed = tokio::time::timeout(self.config.collaborator_timeout(), attempt) => {
                timed.unwrap_or(Err(FallbackFailure::TimedOut))
            }
        };

        let result = match outcome {
            Ok(attempt) => self.recombine(strategy, question, quality, attempt, queries),
            Err(failure) => {
                warn!(
                    strategy = %strategy,
                    failure = %failure.describe(),
                    "Fallback attempt failed"
                );
                FallbackResult::failed(strategy, failure, answer, context, quality, queries)
            }
        };

        if !result.failed {
            self.registry
                .lock()
                .await
                .record_issued(question, &result.new_answer);
        }

        Some(result)
    }

    fn queries_for(&self, strategy: FallbackStrategy, question: &str) -> Vec<String> {
        match strategy {
            FallbackStrategy::IncreaseContext | FallbackStrategy::StrictMatching => {
                vec![question.to_string()]
            }
            FallbackStrategy::QueryExpansion | FallbackStrategy::MultiStrategy => {
                expand_query(question)
            }
        }
    }

    async fn execute(
        &self,
        strategy: FallbackStrategy,
        question: &str,
        queries: &[String],
    ) -> Result<Attempt, FallbackFailure> {
        let chunks = match strategy {
            FallbackStrategy::IncreaseContext => {
                self.collaborator
                    .retrieve(question, self.config.fallback_k)
                    .await?
            }
            FallbackStrategy::StrictMatching => {
                self.collaborator
                    .retrieve_filtered(question, self.config.strict_similarity_cutoff)
                    .await?
            }
            FallbackStrategy::QueryExpansion => self.expanded_retrieval(queries).await?,
            FallbackStrategy::MultiStrategy => {
                let (wide, expanded) = tokio::join!(
                    self.collaborator.retrieve(question, self.config.fallback_k),
                    self.expanded_retrieval(queries)
                );
                match (wide, expanded) {
                    (Ok(wide), Ok(expanded)) => dedupe_chunks([wide, expanded]),
                    (Ok(chunks), Err(err)) | (Err(err), Ok(chunks)) => {
                        debug!("Partial multi-strategy retrieval: {}", err);
                        chunks
                    }
                    (Err(err), Err(_)) => return Err(err.into()),
                }
            }
        };

        debug!(strategy = %strategy, chunks = chunks.len(), "Fallback retrieval complete");

        if chunks.is_empty() {
            return Err(FallbackFailure::NoChunks);
        }

        let answer = self.collaborator.generate(question, &chunks).await?;

        Ok(Attempt { chunks, answer })
    }

    /// Retrieve every variant concurrently and merge in variant order
    async fn expanded_retrieval(
        &self,
        queries: &[String],
    ) -> Result<Vec<SourceChunk>, DomainError> {
        let k = self.config.expansion_k;
        let results = join_all(
            queries
                .iter()
                .map(|query| self.collaborator.retrieve(query, k)),
        )
        .await;

        let mut sets = Vec::with_capacity(results.len());
        let mut first_error = None;

        for (query, result) in queries.iter().zip(results) {
            match result {
                Ok(chunks) => sets.push(chunks),
                Err(err) => {
                    debug!("Skipping query variant '{}': {}", query, err);
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) if sets.is_empty() => Err(err),
            _ => Ok(dedupe_chunks(sets)),
        }
    }

    fn recombine(
        &self,
        strategy: FallbackStrategy,
        question: &str,
        original: &QualityMetrics,
        attempt: Attempt,
        queries: Vec<String>,
    ) -> FallbackResult {
        let new_quality = self.assessor.assess(question, &attempt.answer, &attempt.chunks);
        let improvement = new_quality.overall_score - original.overall_score;

        let summary = format!(
            "{}: regenerated over {} chunks from {} queries, quality {:.2} -> {:.2}",
            strategy,
            attempt.chunks.len(),
            queries.len(),
            original.overall_score,
            new_quality.overall_score
        );

        info!(strategy = %strategy, improvement, "Fallback complete");

        FallbackResult {
            strategy_used: strategy,
            new_answer: attempt.answer,
            new_context: attempt.chunks,
            new_quality,
            improvement,
            failed: false,
            failure: None,
            queries,
            summary,
        }
    }
}

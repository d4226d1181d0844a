//! Retrieval/generation collaborator trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::chunk::SourceChunk;
use crate::domain::DomainError;

/// The RAG layer the guardrails consume: vector retrieval plus answer generation
///
/// Implementations wrap a concrete vector store and LLM; the guardrail core
/// only ever sees chunks and answer text.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RagCollaborator: Send + Sync {
    /// Retrieve the `k` chunks most similar to the query
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<SourceChunk>, DomainError>;

    /// Retrieve every chunk whose similarity score is at least `min_score`
    async fn retrieve_filtered(
        &self,
        query: &str,
        min_score: f32,
    ) -> Result<Vec<SourceChunk>, DomainError>;

    /// Generate an answer to the question grounded on the given chunks
    async fn generate(&self, question: &str, chunks: &[SourceChunk]) -> Result<String, DomainError>;
}

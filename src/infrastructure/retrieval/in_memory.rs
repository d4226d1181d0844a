//! In-memory RAG collaborator for development and testing
//!
//! Scores chunks by lexical term overlap and answers extractively, so the
//! guardrails can run end to end without a vector store or an LLM.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::lexicon::{content_terms, split_sentences};
use crate::domain::retrieval::{RagCollaborator, SourceChunk};
use crate::domain::DomainError;

/// Answer returned when no chunk relates to the question
pub const NO_ANSWER: &str =
    "I don't have enough information in the provided documents to answer this question.";

const MAX_ANSWER_SENTENCES: usize = 3;

/// Chunk store with term-overlap similarity
#[derive(Debug, Default)]
pub struct InMemoryRagCollaborator {
    chunks: Arc<RwLock<Vec<SourceChunk>>>,
}

impl InMemoryRagCollaborator {
    /// Create an empty collaborator
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collaborator over the given chunks
    pub fn with_chunks(chunks: Vec<SourceChunk>) -> Self {
        Self {
            chunks: Arc::new(RwLock::new(chunks)),
        }
    }

    /// Parse a JSON array of chunks
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        let chunks: Vec<SourceChunk> = serde_json::from_str(json)
            .map_err(|e| DomainError::validation(format!("Invalid chunk corpus: {}", e)))?;
        Ok(Self::with_chunks(chunks))
    }

    /// Load a JSON chunk corpus from disk
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::validation(format!("Failed to read corpus {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    pub async fn add_chunks(&self, chunks: Vec<SourceChunk>) {
        self.chunks.write().await.extend(chunks);
    }

    pub async fn len(&self) -> usize {
        self.chunks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.chunks.read().await.is_empty()
    }

    /// Chunks with a non-zero score, best first, ties in insertion order
    async fn ranked(&self, query: &str) -> Vec<SourceChunk> {
        let query_terms = content_terms(query);
        let chunks = self.chunks.read().await;

        let mut scored: Vec<SourceChunk> = chunks
            .iter()
            .map(|chunk| {
                let score = overlap(&query_terms, &chunk.text);
                chunk.clone().with_score(score)
            })
            .filter(|chunk| chunk.similarity_score > 0.0)
            .collect();

        scored.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
        scored
    }
}

/// Fraction of query terms present in the text
fn overlap(query_terms: &std::collections::BTreeSet<String>, text: &str) -> f32 {
    if query_terms.is_empty() {
        return 0.0;
    }
    let text_terms = content_terms(text);
    query_terms.intersection(&text_terms).count() as f32 / query_terms.len() as f32
}

#[async_trait]
impl RagCollaborator for InMemoryRagCollaborator {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<SourceChunk>, DomainError> {
        let mut ranked = self.ranked(query).await;
        ranked.truncate(k);

        debug!(query, k, found = ranked.len(), "In-memory retrieval");
        Ok(ranked)
    }

    async fn retrieve_filtered(
        &self,
        query: &str,
        min_score: f32,
    ) -> Result<Vec<SourceChunk>, DomainError> {
        let ranked: Vec<SourceChunk> = self
            .ranked(query)
            .await
            .into_iter()
            .filter(|chunk| chunk.similarity_score >= min_score)
            .collect();

        debug!(query, min_score, found = ranked.len(), "In-memory filtered retrieval");
        Ok(ranked)
    }

    async fn generate(
        &self,
        question: &str,
        chunks: &[SourceChunk],
    ) -> Result<String, DomainError> {
        let question_terms = content_terms(question);

        let sentences: Vec<&str> = chunks
            .iter()
            .flat_map(|chunk| split_sentences(&chunk.text))
            .filter(|sentence| overlap(&question_terms, sentence) > 0.0)
            .take(MAX_ANSWER_SENTENCES)
            .collect();

        if sentences.is_empty() {
            return Ok(NO_ANSWER.to_string());
        }

        Ok(sentences.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> InMemoryRagCollaborator {
        InMemoryRagCollaborator::with_chunks(vec![
            SourceChunk::new("c-1", "The system was released in 2023.", 0.0),
            SourceChunk::new("c-2", "The cache stores results for five minutes.", 0.0),
            SourceChunk::new("c-3", "Release notes for the system list new features.", 0.0),
        ])
    }

    #[tokio::test]
    async fn test_retrieve_ranks_by_overlap() {
        let results = corpus()
            .retrieve("When was the system released?", 5)
            .await
            .unwrap();

        let ids: Vec<&str> = results.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c-1", "c-3"]);
        assert_eq!(results[0].similarity_score, 1.0);
    }

    #[tokio::test]
    async fn test_retrieve_respects_k() {
        let results = corpus()
            .retrieve("When was the system released?", 1)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_retrieve_filtered_applies_cutoff() {
        let collaborator = InMemoryRagCollaborator::with_chunks(vec![
            SourceChunk::new("full", "The system was released in 2023.", 0.0),
            SourceChunk::new("half", "The system is stable.", 0.0),
        ]);

        let results = collaborator
            .retrieve_filtered("When was the system released?", 0.75)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "full");
    }

    #[tokio::test]
    async fn test_generate_extracts_matching_sentences() {
        let collaborator = corpus();
        let chunks = collaborator
            .retrieve("When was the system released?", 1)
            .await
            .unwrap();

        let answer = collaborator
            .generate("When was the system released?", &chunks)
            .await
            .unwrap();

        assert_eq!(answer, "The system was released in 2023.");
    }

    #[tokio::test]
    async fn test_generate_without_matches() {
        let collaborator = corpus();

        let answer = collaborator.generate("Who founded it?", &[]).await.unwrap();
        assert_eq!(answer, NO_ANSWER);
    }

    #[tokio::test]
    async fn test_from_json() {
        let collaborator =
            InMemoryRagCollaborator::from_json(r#"[{"id": "a", "text": "Alpha text."}]"#).unwrap();
        assert_eq!(collaborator.len().await, 1);
        assert!(!collaborator.is_empty().await);

        assert!(InMemoryRagCollaborator::from_json("not json").is_err());
    }

    #[tokio::test]
    async fn test_add_chunks() {
        let collaborator = InMemoryRagCollaborator::new();
        assert!(collaborator.is_empty().await);

        collaborator
            .add_chunks(vec![SourceChunk::new("a", "Alpha.", 0.0)])
            .await;
        assert_eq!(collaborator.len().await, 1);
    }
}

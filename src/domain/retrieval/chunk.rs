//! Source chunk value type

use serde::{Deserialize, Serialize};

/// Where a chunk came from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Origin file or document reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Character offset of the chunk within its origin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

/// A retrieved unit of document text with its similarity score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceChunk {
    /// Unique identifier of the chunk
    pub id: String,
    /// Chunk text
    pub text: String,
    /// Origin metadata
    #[serde(default)]
    pub metadata: ChunkMetadata,
    /// Similarity score (0.0 - 1.0, higher is more similar)
    #[serde(default)]
    pub similarity_score: f32,
}

impl SourceChunk {
    /// Create a new source chunk
    pub fn new(id: impl Into<String>, text: impl Into<String>, similarity_score: f32) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata: ChunkMetadata::default(),
            similarity_score,
        }
    }

    /// Set the origin file
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.metadata.source = Some(source.into());
        self
    }

    /// Set the offset within the origin
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.metadata.offset = Some(offset);
        self
    }

    /// Replace the similarity score
    pub fn with_score(mut self, similarity_score: f32) -> Self {
        self.similarity_score = similarity_score;
        self
    }
}

/// Concatenate chunk texts into a single context string
pub fn combine_context(chunks: &[SourceChunk]) -> String {
    chunks
        .iter()
        .map(|chunk| chunk.text.trim())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Merge chunk sets in order, keeping the first chunk seen for each id
pub fn dedupe_chunks<I>(sets: I) -> Vec<SourceChunk>
where
    I: IntoIterator<Item = Vec<SourceChunk>>,
{
    let mut seen = std::collections::HashSet::new();
    let mut merged = Vec::new();

    for chunk in sets.into_iter().flatten() {
        if seen.insert(chunk.id.clone()) {
            merged.push(chunk);
        }
    }

    merged
}

//! Retrieval domain - source chunks and the external RAG collaborator

mod chunk;
mod collaborator;

pub use chunk::{combine_context, dedupe_chunks, ChunkMetadata, SourceChunk};
pub use collaborator::RagCollaborator;

#[cfg(test)]
pub use collaborator::MockRagCollaborator;

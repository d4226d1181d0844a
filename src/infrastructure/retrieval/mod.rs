//! RAG collaborator implementations

mod in_memory;

pub use in_memory::{InMemoryRagCollaborator, NO_ANSWER};

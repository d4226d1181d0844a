//! Fallback orchestration against a RAG collaborator

mod orchestrator;

pub use orchestrator::FallbackOrchestrator;

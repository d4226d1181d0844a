//! Domain layer - guardrail logic and the collaborator seam

pub mod error;
pub mod fallback;
pub mod guardrail;
pub mod hallucination;
pub mod lexicon;
pub mod quality;
pub mod retrieval;

pub use error::DomainError;

//! Infrastructure layer - pipeline wiring and collaborator implementations

pub mod fallback;
pub mod guardrail;
pub mod logging;
pub mod retrieval;

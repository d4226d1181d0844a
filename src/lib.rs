//! RAG guardrails
//!
//! Post-generation checks for retrieval-augmented answers:
//! - Heuristic quality scoring over four dimensions
//! - Hallucination detection against the retrieved context
//! - Strategy-driven fallback retrieval and regeneration

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

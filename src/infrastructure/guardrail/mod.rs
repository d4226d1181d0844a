//! End-to-end guardrail pipeline

mod pipeline;

pub use pipeline::{GuardrailOutcome, GuardrailPipeline};

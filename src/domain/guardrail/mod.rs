//! Guardrail configuration

mod config;

pub use config::{CategoryWeights, GuardrailConfig, QualityWeights, WEIGHT_SUM_TOLERANCE};

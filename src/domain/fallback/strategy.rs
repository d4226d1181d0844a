//! Fallback strategy selection

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::guardrail::GuardrailConfig;
use crate::domain::hallucination::HallucinationReport;
use crate::domain::quality::QualityMetrics;

/// Dimension score below which a targeted strategy is chosen
const WEAK_DIMENSION: f32 = 0.5;

/// Retrieval retry strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackStrategy {
    /// Retrieve more chunks for the same question
    IncreaseContext,
    /// Keep only chunks above a stricter similarity cutoff
    StrictMatching,
    /// Retrieve for several rewrites of the question
    QueryExpansion,
    /// Combine increased context with query expansion
    MultiStrategy,
}

impl FallbackStrategy {
    /// Pick a strategy from the weakest signal, first match wins
    pub fn select(
        quality: &QualityMetrics,
        hallucination: &HallucinationReport,
        config: &GuardrailConfig,
    ) -> Self {
        if hallucination.overall_hallucination_risk > config.hallucination_threshold {
            Self::StrictMatching
        } else if quality.completeness < WEAK_DIMENSION {
            Self::IncreaseContext
        } else if quality.specificity < WEAK_DIMENSION {
            Self::QueryExpansion
        } else {
            Self::MultiStrategy
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IncreaseContext => "increase_context",
            Self::StrictMatching => "strict_matching",
            Self::QueryExpansion => "query_expansion",
            Self::MultiStrategy => "multi_strategy",
        }
    }
}

impl fmt::Display for FallbackStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

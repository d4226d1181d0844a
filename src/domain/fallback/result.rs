//! Fallback result types

use serde::{Deserialize, Serialize};

use super::strategy::FallbackStrategy;
use crate::domain::quality::QualityMetrics;
use crate::domain::retrieval::SourceChunk;
use crate::domain::DomainError;

/// Why a fallback attempt produced no new answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackFailure {
    /// Retrieval returned no chunks
    NoChunks,
    /// The retrieval or generation collaborator returned an error
    CollaboratorUnavailable { message: String },
    /// The attempt exceeded the collaborator timeout
    TimedOut,
    /// The caller cancelled the attempt
    Cancelled,
}

impl FallbackFailure {
    pub fn describe(&self) -> String {
        match self {
            Self::NoChunks => "retrieval returned no chunks".to_string(),
            Self::CollaboratorUnavailable { message } => {
                format!("collaborator unavailable: {}", message)
            }
            Self::TimedOut => "collaborator timed out".to_string(),
            Self::Cancelled => "attempt cancelled".to_string(),
        }
    }
}

impl From<DomainError> for FallbackFailure {
    fn from(err: DomainError) -> Self {
        Self::CollaboratorUnavailable {
            message: err.to_string(),
        }
    }
}

/// Outcome of one fallback pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackResult {
    pub strategy_used: FallbackStrategy,
    pub new_answer: String,
    pub new_context: Vec<SourceChunk>,
    pub new_quality: QualityMetrics,
    /// New overall score minus the original one
    pub improvement: f32,
    pub failed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FallbackFailure>,
    /// Queries sent to retrieval, in issue order
    #[serde(default)]
    pub queries: Vec<String>,
    pub summary: String,
}

impl FallbackResult {
    /// Result that keeps the original answer, context and quality unchanged
    pub fn failed(
        strategy_used: FallbackStrategy,
        failure: FallbackFailure,
        answer: &str,
        context: &[SourceChunk],
        quality: &QualityMetrics,
        queries: Vec<String>,
    ) -> Self {
        let summary = format!("{} failed: {}", strategy_used, failure.describe());
        Self {
            strategy_used,
            new_answer: answer.to_string(),
            new_context: context.to_vec(),
            new_quality: quality.clone(),
            improvement: 0.0,
            failed: true,
            failure: Some(failure),
            queries,
            summary,
        }
    }

    pub fn is_improvement(&self) -> bool {
        !self.failed && self.improvement >= 0.0
    }
}

//! Answer quality assessment

mod assessor;
mod batch;
mod metrics;

pub use assessor::QualityAssessor;
pub use batch::{AssessmentInput, BatchAssessment};
pub use metrics::{QualityDimension, QualityLevel, QualityMetrics};

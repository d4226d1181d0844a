//! Assess command - scores answer quality

use std::fmt::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use tracing::info;

use super::input::{load_chunks, OutputFormat};
use crate::domain::quality::{AssessmentInput, BatchAssessment, QualityAssessor, QualityMetrics};

/// Arguments for the assess command
#[derive(Args, Clone)]
pub struct AssessArgs {
    /// Question the answer responds to
    #[arg(long, required_unless_present = "batch")]
    pub question: Option<String>,

    /// Answer to score
    #[arg(long, required_unless_present = "batch")]
    pub answer: Option<String>,

    /// JSON file with the retrieved chunks
    #[arg(long)]
    pub context: Option<PathBuf>,

    /// JSON file with an array of {question, answer, context} items
    #[arg(long, conflicts_with_all = ["question", "answer", "context"])]
    pub batch: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Run the assess command
pub async fn run(args: AssessArgs, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = super::bootstrap(config_path.as_deref())?;
    let assessor = QualityAssessor::new(Arc::new(config.guardrail));

    if let Some(batch) = &args.batch {
        let json = tokio::fs::read_to_string(batch)
            .await
            .with_context(|| format!("Failed to read {}", batch.display()))?;
        let inputs: Vec<AssessmentInput> = serde_json::from_str(&json)
            .with_context(|| format!("Invalid batch file {}", batch.display()))?;

        let summary = assessor.assess_batch(&inputs);
        info!(total = summary.total, average = summary.average_score, "Batch assessed");

        return args.format.emit(&summary, || render_batch(&summary));
    }

    let question = args.question.unwrap_or_default();
    let answer = args.answer.unwrap_or_default();
    let context = load_chunks(args.context.as_deref()).await?;

    let metrics = assessor.assess(&question, &answer, &context);
    args.format.emit(&metrics, || render_quality(&metrics))
}

/// Human-readable quality summary
pub(crate) fn render_quality(metrics: &QualityMetrics) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Quality: {} ({:.2})",
        metrics.quality_level, metrics.overall_score
    );
    let _ = writeln!(out, "  completeness: {:.2}", metrics.completeness);
    let _ = writeln!(out, "  specificity:  {:.2}", metrics.specificity);
    let _ = writeln!(out, "  relevance:    {:.2}", metrics.relevance);
    let _ = writeln!(out, "  confidence:   {:.2}", metrics.confidence);
    let _ = write!(out, "Needs fallback: {}", metrics.needs_fallback);

    for recommendation in &metrics.recommendations {
        let _ = write!(out, "\n  - {}", recommendation);
    }
    out
}

fn render_batch(summary: &BatchAssessment) -> String {
    format!(
        "Assessed {} answers: average {:.2}, min {:.2}, max {:.2}",
        summary.total, summary.average_score, summary.min_score, summary.max_score
    )
}

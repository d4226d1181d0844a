//! Detect command - checks an answer against its context

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tracing::info;

use super::input::{load_chunks, OutputFormat};
use crate::domain::hallucination::HallucinationDetector;

#[derive(Args, Clone)]
pub struct DetectArgs {
    /// Question the answer responds to
    #[arg(long, default_value = "")]
    pub question: String,

    /// Answer to check
    #[arg(long)]
    pub answer: String,

    /// JSON file with the retrieved chunks
    #[arg(long)]
    pub context: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub async fn run(args: DetectArgs, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = super::bootstrap(config_path.as_deref())?;
    let detector = HallucinationDetector::new(Arc::new(config.guardrail));

    let context = load_chunks(args.context.as_deref()).await?;
    let report = detector.detect(&args.question, &args.answer, &context);

    info!(
        risk = report.overall_hallucination_risk,
        findings = report.findings.len(),
        "Hallucination check complete"
    );

    args.format.emit(&report, || report.to_string())
}

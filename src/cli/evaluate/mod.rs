//! Evaluate command - runs the guardrail pipeline over a chunk corpus

use std::fmt::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::assess::render_quality;
use super::input::{load_chunks, OutputFormat};
use crate::domain::retrieval::RagCollaborator;
use crate::infrastructure::guardrail::{GuardrailOutcome, GuardrailPipeline};
use crate::infrastructure::retrieval::InMemoryRagCollaborator;

/// Arguments for the evaluate command
#[derive(Args, Clone)]
pub struct EvaluateArgs {
    /// JSON file with the chunk corpus to retrieve from
    #[arg(long)]
    pub corpus: PathBuf,

    /// Question to answer
    #[arg(long)]
    pub question: String,

    /// Answer to evaluate; generated from the corpus when omitted
    #[arg(long)]
    pub answer: Option<String>,

    /// Context for `--answer`; retrieved from the corpus when omitted
    #[arg(long, requires = "answer")]
    pub context: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Run the evaluate command; Ctrl-C cancels a pending fallback
pub async fn run(args: EvaluateArgs, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = super::bootstrap(config_path.as_deref())?;

    let collaborator = Arc::new(InMemoryRagCollaborator::load(&args.corpus).await?);
    info!(
        corpus = %args.corpus.display(),
        chunks = collaborator.len().await,
        "Corpus loaded"
    );

    let pipeline = GuardrailPipeline::new(collaborator.clone(), config.guardrail)?;
    let cancel = shutdown_token();

    let outcome = match &args.answer {
        None => pipeline.answer_with_cancel(&args.question, &cancel).await?,
        Some(answer) => {
            let context = match &args.context {
                Some(path) => load_chunks(Some(path)).await?,
                None => {
                    collaborator
                        .retrieve(&args.question, pipeline.config().default_k)
                        .await?
                }
            };
            pipeline
                .evaluate_with_cancel(&args.question, answer, &context, &cancel)
                .await?
        }
    };

    args.format.emit(&outcome, || render_outcome(&outcome))
}

fn shutdown_token() -> CancellationToken {
    let cancel = CancellationToken::new();
    let guard = cancel.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling");
            guard.cancel();
        }
    });

    cancel
}

fn render_outcome(outcome: &GuardrailOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Answer: {}", outcome.final_answer);
    let _ = writeln!(out, "Context chunks: {}", outcome.final_context.len());
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", render_quality(&outcome.quality));

    if let Some(report) = &outcome.hallucination {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", report);
    }

    match &outcome.fallback {
        Some(fallback) => {
            let _ = writeln!(out);
            let _ = write!(
                out,
                "Fallback: {} (applied: {})",
                fallback.summary, outcome.fallback_applied
            );
        }
        None => {
            let _ = write!(out, "\nFallback: not attempted");
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quality::QualityMetrics;

    #[test]
    fn test_render_outcome_without_fallback() {
        let outcome = GuardrailOutcome {
            quality: QualityMetrics::zero(),
            hallucination: None,
            fallback: None,
            final_answer: "Nothing.".to_string(),
            final_context: Vec::new(),
            fallback_applied: false,
        };

        let text = render_outcome(&outcome);
        assert!(text.starts_with("Answer: Nothing.\nContext chunks: 0\n"));
        assert!(text.ends_with("Fallback: not attempted"));
        assert!(!text.contains("Hallucination Analysis Report"));
    }
}

//! CLI module for RAG guardrails
//!
//! Provides subcommands for checking answers offline:
//! - `assess`: score answer quality
//! - `detect`: look for hallucinations against a context
//! - `evaluate`: run the full pipeline, with fallback, over a chunk corpus

pub mod assess;
pub mod detect;
pub mod evaluate;
mod input;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

pub use input::{load_chunks, OutputFormat};

/// RAG guardrails - quality scoring, hallucination detection and fallback
#[derive(Parser)]
#[command(name = "rag-guardrails")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Extra configuration file layered over config/default and config/local
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Score the quality of an answer
    Assess(assess::AssessArgs),

    /// Check an answer for hallucinations
    Detect(detect::DetectArgs),

    /// Run the guardrail pipeline against a chunk corpus
    Evaluate(evaluate::EvaluateArgs),
}

/// Load configuration and install logging
fn bootstrap(config_path: Option<&std::path::Path>) -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load_with(config_path)?;
    logging::init_logging(&config.logging);

    Ok(config)
}

use clap::Parser;
use rag_guardrails::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Assess(args) => cli::assess::run(args, cli.config).await,
        Command::Detect(args) => cli::detect::run(args, cli.config).await,
        Command::Evaluate(args) => cli::evaluate::run(args, cli.config).await,
    }
}

use std::path::Path;

use anyhow::Context;
use clap::ValueEnum;
use serde::Serialize;

use crate::domain::retrieval::SourceChunk;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    /// Print `value` as pretty JSON, or the text rendering otherwise
    pub fn emit<T: Serialize>(
        &self,
        value: &T,
        text: impl FnOnce() -> String,
    ) -> anyhow::Result<()> {
        match self {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::Text => println!("{}", text()),
        }
        Ok(())
    }
}

/// Read a JSON array of chunks; no path means no context
pub async fn load_chunks(path: Option<&Path>) -> anyhow::Result<Vec<SourceChunk>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };

    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    serde_json::from_str(&json).with_context(|| format!("Invalid chunk file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_path_is_empty_context() {
        let chunks = load_chunks(None).await.unwrap();
        assert!(chunks.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_path_is_error() {
        let result = load_chunks(Some(Path::new("does/not/exist.json"))).await;
        assert!(result.is_err());
    }
}

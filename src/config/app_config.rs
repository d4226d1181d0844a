use std::path::Path;

use serde::Deserialize;

use crate::domain::guardrail::GuardrailConfig;
use crate::domain::DomainError;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub guardrail: GuardrailConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Load `config/default`, `config/local` and `APP__*` environment overrides
    pub fn load() -> Result<Self, DomainError> {
        Self::load_with(None)
    }

    /// Same as [`AppConfig::load`], with an extra file layered on top
    pub fn load_with(extra: Option<&Path>) -> Result<Self, DomainError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false));

        if let Some(path) = extra {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| DomainError::configuration(e.to_string()))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| DomainError::configuration(e.to_string()))?;

        app_config.guardrail.validate()?;
        Ok(app_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> Result<AppConfig, DomainError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .map_err(|e| DomainError::configuration(e.to_string()))?;
        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(|e| DomainError::configuration(e.to_string()))?;
        app_config.guardrail.validate()?;
        Ok(app_config)
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.guardrail.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = from_toml(
            r#"
            [logging]
            format = "json"

            [guardrail]
            quality_threshold = 0.7
            enable_fallback = false
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.guardrail.quality_threshold, 0.7);
        assert!(!config.guardrail.enable_fallback);
        assert_eq!(config.guardrail.fallback_k, 8);
    }

    #[test]
    fn test_invalid_weights_fail_to_load() {
        let result = from_toml(
            r#"
            [guardrail]
            completeness_weight = 0.9
            "#,
        );

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }
}

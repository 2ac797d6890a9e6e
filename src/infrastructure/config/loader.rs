use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use thiserror::Error;

use crate::domain::models::config::{Config, RagConfig};

/// Project-local configuration directory
pub const CONFIG_DIR: &str = ".meeting-rag";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("Invalid similarity_threshold: {0}. Must be between 0.0 and 1.0")]
    InvalidSimilarityThreshold(f32),

    #[error("Invalid temperature: {0}. Must be between 0.0 and 2.0")]
    InvalidTemperature(f32),

    #[error("Invalid {0}: must be at least 1")]
    ZeroValue(&'static str),

    #[error("Provider base_url cannot be empty")]
    EmptyBaseUrl,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .meeting-rag/config.yaml (project config)
    /// 3. .meeting-rag/local.yaml (project local overrides, optional)
    /// 4. Environment variables (`MEETING_RAG_*` prefix, `__` separates nested keys)
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment()
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.as_ref().display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(format!("{CONFIG_DIR}/config.yaml")))
            .merge(Yaml::file(format!("{CONFIG_DIR}/local.yaml")))
            .merge(Env::prefixed("MEETING_RAG_").split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        Self::validate_rag(&config.rag)?;

        if config.store.dimension == 0 {
            return Err(ConfigError::ZeroValue("dimension"));
        }
        if config.store.chunk_max_length == 0 {
            return Err(ConfigError::ZeroValue("chunk_max_length"));
        }

        if config.provider.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }

        Ok(())
    }

    /// Validate the retrieval and answering settings on their own.
    ///
    /// Also applied to runtime updates of a running service.
    pub fn validate_rag(rag: &RagConfig) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&rag.similarity_threshold) {
            return Err(ConfigError::InvalidSimilarityThreshold(rag.similarity_threshold));
        }
        if !(0.0..=2.0).contains(&rag.temperature) {
            return Err(ConfigError::InvalidTemperature(rag.temperature));
        }
        if rag.retrieval_limit == 0 {
            return Err(ConfigError::ZeroValue("retrieval_limit"));
        }
        if rag.max_tokens == 0 {
            return Err(ConfigError::ZeroValue("max_tokens"));
        }
        if rag.max_context_length == 0 {
            return Err(ConfigError::ZeroValue("max_context_length"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.store.dimension, 384);
        assert_eq!(config.rag.retrieval_limit, 6);
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
logging:
  level: debug
  format: json
rag:
  similarity_threshold: 0.5
  retrieval_limit: 10
provider:
  base_url: http://localhost:11434/v1
  embedding_model: nomic-embed-text
store:
  chunk_max_length: 200
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert!((config.rag.similarity_threshold - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.rag.retrieval_limit, 10);
        assert_eq!(config.rag.max_tokens, 800);
        assert_eq!(config.provider.base_url, "http://localhost:11434/v1");
        assert_eq!(config.provider.embedding_model, "nomic-embed-text");
        assert_eq!(config.store.chunk_max_length, 200);
        assert_eq!(config.store.dimension, 384);

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "rag:\n  max_tokens: 256\nstore:\n  dimension: 64").unwrap();

        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.rag.max_tokens, 256);
        assert_eq!(config.store.dimension, 64);
    }

    #[test]
    fn test_load_from_file_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "rag:\n  similarity_threshold: 1.5").unwrap();

        assert!(ConfigLoader::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_env_overrides() {
        temp_env::with_vars(
            [
                ("MEETING_RAG_RAG__RETRIEVAL_LIMIT", Some("12")),
                ("MEETING_RAG_PROVIDER__GENERATION_MODEL", Some("qwen-plus")),
            ],
            || {
                let config = ConfigLoader::load().unwrap();
                assert_eq!(config.rag.retrieval_limit, 12);
                assert_eq!(config.provider.generation_model, "qwen-plus");
            },
        );
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "invalid"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidLogFormat(_)
        ));
    }

    #[test]
    fn test_validate_invalid_rotation() {
        let mut config = Config::default();
        config.logging.rotation = "weekly".to_string();

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidRotation(_)
        ));
    }

    #[test]
    fn test_validate_threshold_range() {
        let mut config = Config::default();
        config.rag.similarity_threshold = -0.1;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidSimilarityThreshold(_)
        ));

        config.rag.similarity_threshold = 0.0;
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_temperature_range() {
        let mut config = Config::default();
        config.rag.temperature = 2.5;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidTemperature(_)
        ));
    }

    #[test]
    fn test_validate_zero_values() {
        let mut config = Config::default();
        config.rag.retrieval_limit = 0;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::ZeroValue("retrieval_limit")
        ));

        let mut config = Config::default();
        config.store.dimension = 0;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::ZeroValue("dimension")
        ));

        let mut config = Config::default();
        config.rag.max_context_length = 0;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::ZeroValue("max_context_length")
        ));
    }

    #[test]
    fn test_validate_empty_base_url() {
        let mut config = Config::default();
        config.provider.base_url = "  ".to_string();

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::EmptyBaseUrl
        ));
    }
}

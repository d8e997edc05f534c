//! Configuration management for the ragchat CLI.
//!
//! This module handles loading and merging configuration from multiple
//! sources:
//! - Environment variables
//! - Command-line flags
//! - Config files (ragchat.yaml)
//!
//! Precedence is CLI flags > environment variables > config file > defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Environment variable holding the hosted-LLM API credential.
///
/// The credential is never read from config files or CLI flags; absence of
/// this variable is fatal to the session before any dataset is processed.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Hosted models the answering pipeline accepts.
pub const SUPPORTED_MODELS: [&str; 2] = ["mixtral-8x7b-32768", "llama2-70b-4096"];

/// Directory where exported chat history is written by default.
pub const DEFAULT_OUTPUT_DIR: &str = "response";

/// Main application configuration.
///
/// This struct holds all global configuration options that affect the
/// interactive session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Model identifier for answer generation
    pub model: String,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Directory where chat history exports are written
    pub output_dir: PathBuf,

    /// API key for the hosted LLM provider (from `GROQ_API_KEY`)
    pub api_key: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    model: Option<String>,
    output_dir: Option<String>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: SUPPORTED_MODELS[0].to_string(),
            config_file: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            api_key: None,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `RAGCHAT_MODEL`: Model identifier
    /// - `RAGCHAT_CONFIG`: Path to config file
    /// - `RAGCHAT_OUTPUT_DIR`: History export directory
    /// - `GROQ_API_KEY`: API credential
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(config_file) = std::env::var("RAGCHAT_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        // Load from YAML config file if it exists
        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("ragchat.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(model) = std::env::var("RAGCHAT_MODEL") {
            config.model = model;
        }

        if let Ok(output_dir) = std::env::var("RAGCHAT_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(output_dir);
        }

        config.api_key = std::env::var(API_KEY_ENV).ok();
        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(model) = config_file.model {
            result.model = model;
        }

        if let Some(output_dir) = config_file.output_dir {
            result.output_dir = PathBuf::from(output_dir);
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// This method merges command-line flags with the loaded configuration,
    /// giving precedence to CLI flags over environment variables.
    pub fn with_overrides(
        mut self,
        model: Option<String>,
        config_file: Option<PathBuf>,
        output_dir: Option<PathBuf>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(model) = model {
            self.model = model;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(output_dir) = output_dir {
            self.output_dir = output_dir;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Resolve the API credential, failing if it is absent.
    ///
    /// Called before any dataset is accepted: a missing credential halts the
    /// session at `Idle`.
    pub fn require_api_key(&self) -> AppResult<String> {
        self.api_key.clone().ok_or_else(|| {
            AppError::Config(format!(
                "API key not found. Set the {} environment variable.",
                API_KEY_ENV
            ))
        })
    }

    /// Validate the selected model against the supported list.
    pub fn validate(&self) -> AppResult<()> {
        if !SUPPORTED_MODELS.contains(&self.model.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown model: {}. Supported: {}",
                self.model,
                SUPPORTED_MODELS.join(", ")
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.model, "mixtral-8x7b-32768");
        assert_eq!(config.output_dir, PathBuf::from("response"));
        assert!(!config.verbose);
        assert!(!config.no_color);
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(
            Some("llama2-70b-4096".to_string()),
            None,
            Some(PathBuf::from("out")),
            None,
            true,
            false,
        );

        assert_eq!(overridden.model, "llama2-70b-4096");
        assert_eq!(overridden.output_dir, PathBuf::from("out"));
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_validate_unknown_model() {
        let mut config = AppConfig::default();
        config.model = "gpt-4".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_supported_models() {
        for model in SUPPORTED_MODELS {
            let mut config = AppConfig::default();
            config.model = model.to_string();
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_require_api_key_missing() {
        let config = AppConfig::default();
        let err = config.require_api_key().unwrap_err();
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }

    #[test]
    fn test_require_api_key_present() {
        let mut config = AppConfig::default();
        config.api_key = Some("gsk-test".to_string());
        assert_eq!(config.require_api_key().unwrap(), "gsk-test");
    }
}

//! Error types for the ragchat CLI.
//!
//! This module defines a unified error enum that covers every failure
//! category in the application: configuration, dataset loading, index
//! construction, pipeline construction, and answer generation.

use thiserror::Error;

/// Unified error type for ragchat.
///
/// All fallible functions in the application return `Result<T, AppError>`.
/// We never panic — errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (missing credential, unknown model)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Uploaded file has an unsupported type tag
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Embedding or vector index construction failure
    #[error("Index construction failed: {0}")]
    IndexConstruction(String),

    /// Answering pipeline construction failure (bad credential or model)
    #[error("Pipeline construction failed: {0}")]
    PipelineConstruction(String),

    /// Runtime failure while generating an answer
    #[error("Generation failed: {0}")]
    Generation(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::UnsupportedFormat("pdf".to_string());
        assert_eq!(err.to_string(), "Unsupported file format: pdf");

        let err = AppError::Config("GROQ_API_KEY not set".to_string());
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn test_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: AppError = json_err.into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}

//! LLM provider factory.
//!
//! This module provides a factory for creating LLM clients based on the
//! provider name. It handles provider resolution and credential injection.

use crate::client::LlmClient;
use crate::providers::GroqClient;
use ragchat_core::{AppError, AppResult};
use std::sync::Arc;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier (currently only "groq")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - API key (required for hosted providers)
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown or a required
/// credential is missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn LlmClient>> {
    match provider.to_lowercase().as_str() {
        "groq" => {
            let api_key = api_key
                .filter(|k| !k.is_empty())
                .ok_or_else(|| AppError::Config("Groq provider requires an API key".to_string()))?;

            let client = match endpoint {
                Some(endpoint) => GroqClient::with_base_url(api_key, endpoint),
                None => GroqClient::new(api_key),
            };
            Ok(Arc::new(client))
        }
        _ => Err(AppError::Config(format!("Unknown provider: {}", provider))),
    }
}

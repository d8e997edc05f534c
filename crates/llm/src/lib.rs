//! LLM integration crate for ragchat.
//!
//! This crate provides a provider-agnostic abstraction for interacting with
//! hosted Large Language Models (LLMs) through a unified trait-based
//! interface.
//!
//! # Providers
//! - **Groq**: hosted inference behind an OpenAI-compatible API (default)
//!
//! # Example
//! ```no_run
//! use ragchat_llm::{LlmClient, LlmRequest, providers::GroqClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GroqClient::new("gsk-...");
//! let request = LlmRequest::new("Hello, world!", "mixtral-8x7b-32768");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::GroqClient;

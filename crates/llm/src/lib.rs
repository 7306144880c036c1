//! Completion clients - the only place superclaw talks to an LLM.
//!
//! The router depends on the `CompletionClient` trait alone; concrete
//! providers (OpenAI-compatible HTTP, Anthropic messages API) live here
//! behind it, selected from configuration. Failures map to a small
//! taxonomy (`CompletionError`) whose `user_message` is the only text
//! that ever reaches an end user; provider detail stays in the logs.
//!
//! No retries happen at this layer. A failed completion surfaces
//! immediately and never consumes user quota.

use std::sync::Arc;

use superclaw_core::config::{LlmConfig, LlmProvider};

pub mod anthropic;
pub mod client;
pub mod mock;
pub mod openai;

pub use anthropic::AnthropicClient;
pub use client::{CompletionClient, CompletionError};
pub use mock::MockCompletionClient;
pub use openai::OpenAiClient;

/// Build the configured provider client. Ollama speaks the
/// OpenAI-compatible chat API, so it shares the OpenAI client.
pub fn build_client(config: &LlmConfig) -> Result<Arc<dyn CompletionClient>, CompletionError> {
    match config.provider {
        LlmProvider::OpenAi | LlmProvider::Ollama => Ok(Arc::new(OpenAiClient::new(config)?)),
        LlmProvider::Anthropic => Ok(Arc::new(AnthropicClient::new(config)?)),
    }
}

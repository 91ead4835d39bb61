mod anthropic;
mod factory;
mod google;
mod ollama;
mod open_ai;
mod prompt;

pub use anthropic::AnthropicProvider;
pub use factory::ProviderFactory;
pub use google::GoogleProvider;
pub use ollama::OllamaProvider;
pub use open_ai::OpenAIProvider;
pub use prompt::{build_scale_prompt, RECIPE_PARSER_PROMPT, RECIPE_SCALER_PROMPT};

use async_trait::async_trait;
use std::error::Error;

/// Error type returned by providers; kept `Send + Sync` so calls can be
/// wrapped in a tokio timeout
pub type ProviderError = Box<dyn Error + Send + Sync>;

/// The single capability the pipeline needs from an AI service: turn a
/// system prompt and a user message into text
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "openai", "anthropic")
    fn provider_name(&self) -> &str;

    /// Complete `prompt` under the `system` instructions and return the raw text
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ProviderError>;
}

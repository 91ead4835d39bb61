use crate::config::{PipelineConfig, ProviderConfig};
use crate::error::PipelineError;
use crate::providers::{
    AnthropicProvider, GoogleProvider, LlmProvider, OllamaProvider, OpenAIProvider,
};
use std::sync::Arc;

pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider instance from configuration
    pub fn create(
        provider_name: &str,
        config: &ProviderConfig,
    ) -> Result<Arc<dyn LlmProvider>, PipelineError> {
        // Validate that provider is enabled
        if !config.enabled {
            return Err(PipelineError::ProviderError(format!(
                "Provider '{}' is not enabled in configuration",
                provider_name
            )));
        }

        let provider: Arc<dyn LlmProvider> = match provider_name {
            "openai" => Arc::new(OpenAIProvider::new(config).map_err(provider_error)?),
            "anthropic" => Arc::new(AnthropicProvider::new(config).map_err(provider_error)?),
            "google" => Arc::new(GoogleProvider::new(config).map_err(provider_error)?),
            "ollama" => Arc::new(OllamaProvider::new(config).map_err(provider_error)?),
            _ => {
                return Err(PipelineError::ProviderError(format!(
                    "Unknown provider: {} (available: {})",
                    provider_name,
                    Self::available_providers().join(", ")
                )))
            }
        };
        Ok(provider)
    }

    /// Get the default provider from configuration, `None` when AI is not configured
    pub fn get_default_provider(
        config: &PipelineConfig,
    ) -> Result<Option<Arc<dyn LlmProvider>>, PipelineError> {
        let Some(provider_name) = &config.default_provider else {
            return Ok(None);
        };
        let provider_config = config.providers.get(provider_name).ok_or_else(|| {
            PipelineError::ProviderError(format!(
                "Default provider '{}' not found in configuration",
                provider_name
            ))
        })?;

        Self::create(provider_name, provider_config).map(Some)
    }

    /// List all available provider names
    pub fn available_providers() -> Vec<&'static str> {
        vec!["openai", "anthropic", "google", "ollama"]
    }
}

fn provider_error(err: Box<dyn std::error::Error + Send + Sync>) -> PipelineError {
    PipelineError::ProviderError(err.to_string())
}

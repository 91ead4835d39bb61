use std::sync::Arc;
use std::time::Duration;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::model::{ParsedRecipe, ScaleRequest, ScaledRecipe};
use crate::parsers::{ParseOptions, RecipeParser};
use crate::providers::{LlmProvider, ProviderFactory};
use crate::scaling::{ScalingInput, ScalingNormalizer, ScalingOptions};

/// Builder for configuring a [`RecipePipeline`]
#[derive(Default)]
pub struct RecipePipelineBuilder {
    config: Option<PipelineConfig>,
    provider: Option<Arc<dyn LlmProvider>>,
    provider_name: Option<String>,
    use_ai_by_default: Option<bool>,
    use_ai_for_scaling: Option<bool>,
    timeout: Option<Duration>,
}

impl RecipePipelineBuilder {
    /// Start from a loaded configuration instead of the defaults
    ///
    /// # Example
    /// ```
    /// use recipe_pipeline::{PipelineConfig, RecipePipeline};
    ///
    /// let builder = RecipePipeline::builder()
    ///     .config(PipelineConfig::default());
    /// ```
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use this provider for AI parsing and scaling
    ///
    /// Takes precedence over [`provider_name`](Self::provider_name) and the
    /// configured default provider.
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Pick a provider from the configuration by name
    ///
    /// # Example
    /// ```
    /// use recipe_pipeline::RecipePipeline;
    ///
    /// let builder = RecipePipeline::builder()
    ///     .provider_name("anthropic");
    /// ```
    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.provider_name = Some(name.into());
        self
    }

    /// Try the AI parser first on every parse
    pub fn use_ai_by_default(mut self, enabled: bool) -> Self {
        self.use_ai_by_default = Some(enabled);
        self
    }

    /// Ask the AI service for scaled quantities before the scaling engine
    pub fn use_ai_for_scaling(mut self, enabled: bool) -> Self {
        self.use_ai_for_scaling = Some(enabled);
        self
    }

    /// Set a timeout for AI requests
    ///
    /// # Example
    /// ```
    /// use recipe_pipeline::RecipePipeline;
    /// use std::time::Duration;
    ///
    /// let builder = RecipePipeline::builder()
    ///     .timeout(Duration::from_secs(10));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Resolve the provider and assemble the pipeline
    ///
    /// # Errors
    /// Returns `PipelineError::ProviderError` if a named or default provider
    /// is missing from the configuration or cannot be created.
    ///
    /// # Example
    /// ```
    /// use recipe_pipeline::RecipePipeline;
    ///
    /// let pipeline = RecipePipeline::builder().build().unwrap();
    /// assert!(!pipeline.ai_configured());
    /// ```
    pub fn build(self) -> Result<RecipePipeline> {
        let mut config = self.config.unwrap_or_default();
        if let Some(enabled) = self.use_ai_by_default {
            config.parser.use_ai_by_default = enabled;
        }
        if let Some(enabled) = self.use_ai_for_scaling {
            config.scaling.use_ai = enabled;
        }
        let timeout = self
            .timeout
            .unwrap_or_else(|| Duration::from_secs(config.timeout));

        let provider = match (self.provider, self.provider_name) {
            (Some(provider), _) => Some(provider),
            (None, Some(name)) => {
                let provider_config = config.providers.get(&name).ok_or_else(|| {
                    PipelineError::ProviderError(format!(
                        "Provider '{}' not found in configuration",
                        name
                    ))
                })?;
                Some(ProviderFactory::create(&name, provider_config)?)
            }
            (None, None) => ProviderFactory::get_default_provider(&config)?,
        };

        let parser = RecipeParser::new(provider.clone(), config.parser.clone(), timeout);
        let normalizer =
            ScalingNormalizer::new(parser.clone(), provider, config.scaling.clone(), timeout);
        Ok(RecipePipeline { parser, normalizer })
    }
}

/// Parser facade and scaling normalizer sharing one provider and timeout
#[derive(Clone)]
pub struct RecipePipeline {
    parser: RecipeParser,
    normalizer: ScalingNormalizer,
}

impl RecipePipeline {
    /// Creates a new builder
    pub fn builder() -> RecipePipelineBuilder {
        RecipePipelineBuilder::default()
    }

    pub fn ai_configured(&self) -> bool {
        self.parser.ai_configured()
    }

    pub fn parser(&self) -> &RecipeParser {
        &self.parser
    }

    pub fn normalizer(&self) -> &ScalingNormalizer {
        &self.normalizer
    }

    /// Parse raw recipe text
    ///
    /// # Example
    /// ```
    /// # use recipe_pipeline::{ParseOptions, RecipePipeline};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let pipeline = RecipePipeline::builder().build()?;
    /// let recipe = pipeline
    ///     .parse("Pancakes\n2 cups flour\n1. Mix everything", ParseOptions::default())
    ///     .await?;
    /// assert_eq!(recipe.name, "Pancakes");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn parse(&self, text: &str, options: ParseOptions) -> Result<ParsedRecipe> {
        self.parser.parse(text, options).await
    }

    /// Normalize and scale a recipe
    pub async fn scale(
        &self,
        input: impl Into<ScalingInput>,
        request: &ScaleRequest,
        options: ScalingOptions,
    ) -> Result<ScaledRecipe> {
        self.normalizer.scale(input.into(), request, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;

    #[test]
    fn test_builder_without_ai() {
        let pipeline = RecipePipeline::builder().build().unwrap();
        assert!(!pipeline.ai_configured());
    }

    #[test]
    fn test_builder_unknown_provider_name() {
        let result = RecipePipeline::builder().provider_name("openai").build();
        assert!(matches!(result, Err(PipelineError::ProviderError(msg)) if msg.contains("not found")));
    }

    #[test]
    fn test_builder_named_provider() {
        let mut config = PipelineConfig::default();
        config.providers.insert(
            "ollama".to_string(),
            ProviderConfig {
                enabled: true,
                model: "llama3".to_string(),
                temperature: 0.2,
                max_tokens: 2000,
                api_key: None,
                base_url: None,
            },
        );

        let pipeline = RecipePipeline::builder()
            .config(config)
            .provider_name("ollama")
            .build()
            .unwrap();
        assert!(pipeline.ai_configured());
    }
}

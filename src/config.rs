use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;

/// Main pipeline configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct PipelineConfig {
    /// Provider used for AI parsing and scaling; AI is off when unset
    #[serde(default)]
    pub default_provider: Option<String>,
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Parser facade settings
    #[serde(default)]
    pub parser: ParserConfig,
    /// Scaling normalizer settings
    #[serde(default)]
    pub scaling: ScalingConfig,
    /// AI request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_provider: None,
            providers: HashMap::new(),
            parser: ParserConfig::default(),
            scaling: ScalingConfig::default(),
            timeout: default_timeout(),
        }
    }
}

/// Configuration for a specific AI provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    pub enabled: bool,
    /// Model identifier (e.g., "gpt-4.1-mini", "claude-sonnet-4-5")
    pub model: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key for authentication (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom, proxy or local endpoints)
    pub base_url: Option<String>,
}

/// Parser facade settings
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ParserConfig {
    /// Try the AI parser first even when the caller does not force it
    #[serde(default)]
    pub use_ai_by_default: bool,
}

/// Scaling normalizer settings
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ScalingConfig {
    /// Ask the AI service for scaled quantities before using the scaling engine
    #[serde(default)]
    pub use_ai: bool,
}

// Default value functions
fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_timeout() -> u64 {
    30
}

impl PipelineConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_PIPELINE__ prefix
    /// 2. recipe-pipeline.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_PIPELINE__PROVIDERS__OPENAI__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Whether the default provider is named and enabled
    pub fn ai_configured(&self) -> bool {
        self.default_provider
            .as_ref()
            .and_then(|name| self.providers.get(name))
            .is_some_and(|provider| provider.enabled)
    }
}

/// Load configuration from file and environment variables
///
/// Environment variable format: RECIPE_PIPELINE__PARSER__USE_AI_BY_DEFAULT=true
pub fn load_config() -> Result<PipelineConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe-pipeline").required(false))
        // Use double underscore for nested: RECIPE_PIPELINE__PROVIDERS__OPENAI__API_KEY
        .add_source(
            Environment::with_prefix("RECIPE_PIPELINE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

pub mod ai;
pub mod heuristic;
pub mod sections;

pub use ai::AiParser;
pub use heuristic::HeuristicParser;

use crate::config::ParserConfig;
use crate::error::{PipelineError, Result};
use crate::model::ParsedRecipe;
use crate::providers::LlmProvider;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;

/// Per-call parser options
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Use the AI parser and surface its failure instead of falling back
    pub force_ai: bool,
}

impl ParseOptions {
    pub fn forced() -> Self {
        ParseOptions { force_ai: true }
    }
}

/// Chooses between the AI parser and the heuristic parser.
///
/// The AI parser runs first when the caller forces it or when
/// [`ParserConfig::use_ai_by_default`] is set. A failed AI attempt falls back
/// to the heuristic parser unless the call was forced.
#[derive(Clone)]
pub struct RecipeParser {
    ai: AiParser,
    heuristic: HeuristicParser,
    config: ParserConfig,
}

impl RecipeParser {
    pub fn new(
        provider: Option<Arc<dyn LlmProvider>>,
        config: ParserConfig,
        timeout: Duration,
    ) -> Self {
        RecipeParser {
            ai: AiParser::new(provider, timeout),
            heuristic: HeuristicParser::new(),
            config,
        }
    }

    /// Parser with no AI provider; every call goes to the heuristic parser
    /// unless forced, in which case it fails with `AiParsingForced`.
    pub fn heuristic_only() -> Self {
        Self::new(None, ParserConfig::default(), Duration::from_secs(30))
    }

    pub fn ai_configured(&self) -> bool {
        self.ai.is_configured()
    }

    pub async fn parse(&self, text: &str, options: ParseOptions) -> Result<ParsedRecipe> {
        if !(options.force_ai || self.config.use_ai_by_default) {
            return Ok(self.parse_heuristic(text));
        }

        match self.ai.parse(text).await {
            Ok(recipe) => {
                info!("Parsed recipe '{}' with AI", recipe.name);
                Ok(recipe.with_placeholders())
            }
            Err(e) if options.force_ai => Err(PipelineError::AiParsingForced(Box::new(e))),
            Err(e) if e.is_recoverable() => {
                warn!("AI parsing failed, using heuristic parser: {}", e);
                Ok(self.parse_heuristic(text))
            }
            Err(e) => Err(e),
        }
    }

    pub fn parse_heuristic(&self, text: &str) -> ParsedRecipe {
        self.heuristic.parse(text)
    }
}

impl Default for RecipeParser {
    fn default() -> Self {
        Self::heuristic_only()
    }
}

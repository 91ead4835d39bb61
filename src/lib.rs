pub mod builder;
pub mod config;
pub mod error;
pub mod ingredient;
pub mod model;
pub mod parsers;
pub mod providers;
pub mod quantity;
pub mod scaling;
pub mod units;

pub use builder::{RecipePipeline, RecipePipelineBuilder};
pub use config::{load_config, PipelineConfig, ProviderConfig};
pub use error::{PipelineError, Result};
pub use model::{
    IngredientRef, ParsedIngredient, ParsedRecipe, ScaleRequest, ScaleRequestInput,
    ScaledIngredient, ScaledRecipe,
};
pub use parsers::{ParseOptions, RecipeParser};
pub use providers::LlmProvider;
pub use scaling::{LooseRecipe, ScalingInput, ScalingNormalizer, ScalingOptions};

use log::debug;

/// Parse recipe text with the heuristic parser. Never fails.
pub fn parse_recipe(text: &str) -> ParsedRecipe {
    let recipe = parsers::HeuristicParser::new().parse(text);
    debug!("{:#?}", recipe);
    recipe
}

/// Scale a parsed recipe with the deterministic scaling engine
pub fn scale_recipe(recipe: &ParsedRecipe, request: &ScaleRequest) -> Result<ScaledRecipe> {
    scaling::scale(recipe, request)
}

/// Build a pipeline from `recipe-pipeline.toml` and `RECIPE_PIPELINE__*`
/// environment variables
pub fn pipeline_from_config() -> Result<RecipePipeline> {
    let config = load_config()?;
    RecipePipeline::builder().config(config).build()
}

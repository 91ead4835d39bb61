//! Command-line front end: parse or scale a recipe file and print JSON
use clap::{Args, Parser, Subcommand};
use log::debug;
use recipe_pipeline::model::ConstraintInput;
use recipe_pipeline::{
    load_config, IngredientRef, LooseRecipe, ParseOptions, RecipePipeline, ScaleRequest,
    ScaleRequestInput, ScalingInput, ScalingOptions,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "recipe-pipeline")]
#[command(about = "Parse recipe text into structured JSON and scale it")]
struct Cli {
    /// AI provider name from recipe-pipeline.toml (defaults to default_provider)
    #[arg(long, global = true)]
    provider: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a plain-text recipe
    Parse {
        /// Path to the recipe text
        file: PathBuf,
        /// Use the AI parser and fail instead of falling back
        #[arg(long)]
        force_ai: bool,
    },
    /// Scale a recipe given as text or JSON
    Scale {
        /// Path to the recipe text or JSON
        file: PathBuf,
        #[command(flatten)]
        request: ScaleArgs,
        /// Ask the AI service for scaled quantities, falling back to the engine
        #[arg(long)]
        ai: bool,
        /// Ask the AI service and fail instead of falling back
        #[arg(long)]
        force_ai: bool,
        /// Print one ingredient per line instead of JSON
        #[arg(long)]
        plain: bool,
    },
}

#[derive(Args)]
struct ScaleArgs {
    /// Multiply every quantity by this factor
    #[arg(long)]
    multiply: Option<f64>,
    /// Divide every quantity by this number
    #[arg(long)]
    divide: Option<f64>,
    /// Scale to this yield (the recipe must state one)
    #[arg(long)]
    target_yield: Option<f64>,
    /// Unit to show with the target yield
    #[arg(long, requires = "target_yield")]
    yield_unit: Option<String>,
    /// Ingredient name or zero-based index to scale by
    #[arg(long, requires = "target")]
    ingredient: Option<String>,
    /// Desired quantity of --ingredient, in its unit
    #[arg(long, requires = "ingredient")]
    target: Option<f64>,
}

impl ScaleArgs {
    fn into_request(self) -> recipe_pipeline::Result<ScaleRequest> {
        let constraint = match (self.ingredient, self.target) {
            (Some(ingredient), Some(target_quantity)) => Some(ConstraintInput {
                ingredient: match ingredient.parse::<usize>() {
                    Ok(index) => IngredientRef::Index(index),
                    Err(_) => IngredientRef::Name(ingredient),
                },
                target_quantity,
            }),
            _ => None,
        };
        ScaleRequest::try_from(ScaleRequestInput {
            multiply_by: self.multiply,
            divide_by: self.divide,
            constraint,
            target_yield: self.target_yield,
            target_yield_unit: self.yield_unit,
        })
    }
}

/// JSON documents are scaled as loose recipes, anything else as text
fn scaling_input(content: String) -> ScalingInput {
    if content.trim_start().starts_with('{') {
        match serde_json::from_str::<LooseRecipe>(&content) {
            Ok(recipe) => return ScalingInput::Recipe(recipe),
            Err(e) => debug!("Input is not a JSON recipe ({}), parsing as text", e),
        }
    }
    ScalingInput::Text(content)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config()?;
    let mut builder = RecipePipeline::builder().config(config);
    if let Some(name) = cli.provider {
        builder = builder.provider_name(name);
    }
    let pipeline = builder.build()?;

    let output = match cli.command {
        Command::Parse { file, force_ai } => {
            let text = tokio::fs::read_to_string(&file).await?;
            let recipe = pipeline.parse(&text, ParseOptions { force_ai }).await?;
            serde_json::to_string_pretty(&recipe)?
        }
        Command::Scale {
            file,
            request,
            ai,
            force_ai,
            plain,
        } => {
            let request = request.into_request()?;
            let content = tokio::fs::read_to_string(&file).await?;
            let options = ScalingOptions {
                use_ai: ai,
                force_ai,
            };
            let scaled = pipeline
                .scale(scaling_input(content), &request, options)
                .await?;
            if plain {
                scaled
                    .ingredients
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n")
            } else {
                serde_json::to_string_pretty(&scaled)?
            }
        }
    };

    println!("{}", output);
    Ok(())
}

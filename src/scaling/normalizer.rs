//! Repair loosely-typed recipes before scaling them, with or without AI.
//!
//! A UI may send ingredients as bare strings or as objects carrying only a
//! `raw` line, and instructions as an HTML list or one newline-separated
//! string. [`normalize_recipe`] turns all of that into a [`ParsedRecipe`].

use super::{resolve_factor, scale_by_factor};
use crate::config::ScalingConfig;
use crate::error::{PipelineError, Result};
use crate::ingredient::{split_ingredient_line, split_or_free_text};
use crate::model::{
    ParsedIngredient, ParsedRecipe, ScaleRequest, ScaledIngredient, ScaledRecipe,
    DEFAULT_RECIPE_NAME, DEFAULT_UNIT, PLACEHOLDER_INGREDIENT, PLACEHOLDER_INSTRUCTION,
};
use crate::parsers::ai::{
    extract_json, minutes, positive_number, recipe_from_json, request_completion,
};
use crate::parsers::sections::strip_step_number;
use crate::parsers::{ParseOptions, RecipeParser};
use crate::providers::{build_scale_prompt, LlmProvider, RECIPE_SCALER_PROMPT};
use crate::units::normalize_unit;
use html_escape::decode_html_entities;
use log::{debug, info, warn};
use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// An ingredient as a UI might send it
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LooseIngredient {
    Line(String),
    Fields(LooseIngredientFields),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LooseIngredientFields {
    #[serde(default)]
    pub quantity: Option<Value>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Original free-text line, e.g. `"1 1/2 cups flour"`
    #[serde(default)]
    pub raw: Option<String>,
}

/// Instructions as a list of steps or one block of text (plain or HTML)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LooseInstructions {
    Steps(Vec<String>),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LooseRecipe {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<LooseIngredient>,
    #[serde(default)]
    pub instructions: Option<LooseInstructions>,
    #[serde(default)]
    pub notes: Option<String>,
    /// A number or a string such as `"4"` or `"1 1/2"`
    #[serde(default, alias = "yield_quantity")]
    pub yield_quantity: Option<Value>,
    #[serde(default, alias = "yield_unit")]
    pub yield_unit: Option<String>,
    /// Minutes as a number or a duration string such as `"1 hour"`
    #[serde(default, alias = "prep_time_minutes")]
    pub prep_time_minutes: Option<Value>,
    #[serde(default, alias = "cook_time_minutes")]
    pub cook_time_minutes: Option<Value>,
}

/// What the normalizer can scale
#[derive(Debug, Clone)]
pub enum ScalingInput {
    /// A recipe that already went through a parser
    Parsed(ParsedRecipe),
    /// A loosely-typed recipe, typically from a UI
    Recipe(LooseRecipe),
    /// Raw recipe text, parsed first
    Text(String),
}

impl From<ParsedRecipe> for ScalingInput {
    fn from(recipe: ParsedRecipe) -> Self {
        ScalingInput::Parsed(recipe)
    }
}

/// Per-call scaling options
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalingOptions {
    /// Ask the AI service first, falling back to the scaling engine
    pub use_ai: bool,
    /// Ask the AI service and surface its failure instead of falling back
    pub force_ai: bool,
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|s| !s.is_empty())
}

/// Normalize one ingredient; `None` when it carries no text at all
pub fn normalize_ingredient(ingredient: &LooseIngredient) -> Option<ParsedIngredient> {
    match ingredient {
        LooseIngredient::Line(line) => non_blank(Some(line.as_str())).map(split_or_free_text),
        LooseIngredient::Fields(fields) => {
            let parsed = match non_blank(fields.name.as_deref()) {
                Some(name) => ParsedIngredient::new(
                    positive_number(fields.quantity.as_ref()).unwrap_or(1.0),
                    non_blank(fields.unit.as_deref())
                        .map(normalize_unit)
                        .unwrap_or_else(|| DEFAULT_UNIT.to_string()),
                    name,
                ),
                None => split_or_free_text(non_blank(fields.raw.as_deref())?),
            };
            Some(match non_blank(fields.notes.as_deref()) {
                Some(notes) => parsed.with_notes(notes),
                None => parsed,
            })
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn steps_from_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| strip_step_number(&decode_html_entities(line)).to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Steps from an HTML fragment: list items, else paragraphs, else text lines
fn steps_from_html(html: &str) -> Vec<String> {
    let fragment = Html::parse_fragment(html);
    for selector_str in ["li", "p"] {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        let steps: Vec<String> = fragment
            .select(&selector)
            .map(|element| collapse_whitespace(&element.text().collect::<Vec<_>>().join(" ")))
            .map(|text| strip_step_number(&text).to_string())
            .filter(|text| !text.is_empty())
            .collect();
        if !steps.is_empty() {
            return steps;
        }
    }
    steps_from_lines(&fragment.root_element().text().collect::<String>())
}

fn looks_like_html(text: &str) -> bool {
    let lower = text.to_lowercase();
    ["<li", "<ol", "<ul", "<p>", "<p ", "<br"]
        .iter()
        .any(|tag| lower.contains(tag))
}

pub fn normalize_instructions(instructions: &LooseInstructions) -> Vec<String> {
    match instructions {
        LooseInstructions::Steps(steps) => steps
            .iter()
            .flat_map(|step| {
                if looks_like_html(step) {
                    steps_from_html(step)
                } else {
                    steps_from_lines(step)
                }
            })
            .collect(),
        LooseInstructions::Text(text) if looks_like_html(text) => steps_from_html(text),
        LooseInstructions::Text(text) => steps_from_lines(text),
    }
}

/// Turn a loosely-typed recipe into a [`ParsedRecipe`] ready for scaling
pub fn normalize_recipe(loose: &LooseRecipe) -> Result<ParsedRecipe> {
    let ingredients: Vec<ParsedIngredient> = loose
        .ingredients
        .iter()
        .filter_map(normalize_ingredient)
        .collect();
    let instructions = loose
        .instructions
        .as_ref()
        .map(normalize_instructions)
        .unwrap_or_default();

    let recipe = ParsedRecipe {
        name: non_blank(loose.name.as_deref())
            .unwrap_or(DEFAULT_RECIPE_NAME)
            .to_string(),
        description: non_blank(loose.description.as_deref())
            .unwrap_or_default()
            .to_string(),
        ingredients,
        instructions,
        notes: non_blank(loose.notes.as_deref()).map(str::to_string),
        yield_quantity: positive_number(loose.yield_quantity.as_ref()),
        yield_unit: non_blank(loose.yield_unit.as_deref()).map(str::to_string),
        prep_time_minutes: minutes(loose.prep_time_minutes.as_ref()),
        cook_time_minutes: minutes(loose.cook_time_minutes.as_ref()),
    };
    ensure_scalable(recipe)
}

/// Split heuristic free-text ingredients (`1 piece "2 cups flour"`) into
/// quantity, unit and name where the strict splitter can.
pub fn resplit_free_text(mut recipe: ParsedRecipe) -> ParsedRecipe {
    for ingredient in &mut recipe.ingredients {
        let free_text = ingredient.quantity == 1.0
            && ingredient.unit == DEFAULT_UNIT
            && ingredient.notes.is_none();
        if !free_text {
            continue;
        }
        if let Some(split) = split_ingredient_line(&ingredient.name) {
            *ingredient = split;
        }
    }
    recipe
}

fn ensure_scalable(recipe: ParsedRecipe) -> Result<ParsedRecipe> {
    let has_ingredients = recipe
        .ingredients
        .iter()
        .any(|i| i.name != PLACEHOLDER_INGREDIENT);
    if !has_ingredients {
        return Err(PipelineError::InvalidRecipeForScaling(
            "recipe has no ingredients".to_string(),
        ));
    }
    let has_instructions = recipe
        .instructions
        .iter()
        .any(|step| step != PLACEHOLDER_INSTRUCTION);
    if !has_instructions {
        return Err(PipelineError::InvalidRecipeForScaling(
            "recipe has no instructions".to_string(),
        ));
    }
    Ok(recipe)
}

/// Prepares recipes for scaling and scales them through the AI service or
/// the deterministic scaling engine.
#[derive(Clone)]
pub struct ScalingNormalizer {
    parser: RecipeParser,
    provider: Option<Arc<dyn LlmProvider>>,
    config: ScalingConfig,
    timeout: Duration,
}

impl ScalingNormalizer {
    pub fn new(
        parser: RecipeParser,
        provider: Option<Arc<dyn LlmProvider>>,
        config: ScalingConfig,
        timeout: Duration,
    ) -> Self {
        ScalingNormalizer {
            parser,
            provider,
            config,
            timeout,
        }
    }

    /// Normalize any input into a recipe with real ingredients and steps
    pub async fn prepare(&self, input: ScalingInput) -> Result<ParsedRecipe> {
        match input {
            ScalingInput::Parsed(recipe) => ensure_scalable(resplit_free_text(recipe)),
            ScalingInput::Recipe(loose) => normalize_recipe(&loose),
            ScalingInput::Text(text) => {
                let recipe = self.parser.parse(&text, ParseOptions::default()).await?;
                ensure_scalable(resplit_free_text(recipe))
            }
        }
    }

    pub async fn scale(
        &self,
        input: ScalingInput,
        request: &ScaleRequest,
        options: ScalingOptions,
    ) -> Result<ScaledRecipe> {
        let recipe = self.prepare(input).await?;
        let factor = resolve_factor(&recipe, request)?;

        let use_ai = options.force_ai || options.use_ai || self.config.use_ai;
        if use_ai {
            match self.scale_with_ai(&recipe, factor).await {
                Ok(mut scaled) => {
                    info!("Scaled '{}' by {} with AI", recipe.name, factor);
                    apply_target_yield(&mut scaled, request);
                    return Ok(scaled);
                }
                Err(e) if options.force_ai => {
                    return Err(PipelineError::AiScalingForced(Box::new(e)))
                }
                Err(e) if e.is_recoverable() => {
                    warn!("AI scaling failed, using scaling engine: {}", e)
                }
                Err(e) => return Err(e),
            }
        }

        let mut scaled = scale_by_factor(&recipe, factor);
        apply_target_yield(&mut scaled, request);
        Ok(scaled)
    }

    async fn scale_with_ai(&self, recipe: &ParsedRecipe, factor: f64) -> Result<ScaledRecipe> {
        let provider = self
            .provider
            .as_deref()
            .ok_or_else(|| PipelineError::AiUnavailable("no AI provider configured".into()))?;

        let recipe_json = serde_json::to_string(recipe)
            .map_err(|e| PipelineError::InvalidRecipeForScaling(e.to_string()))?;
        let prompt = build_scale_prompt(&recipe_json, factor);
        let response =
            request_completion(provider, RECIPE_SCALER_PROMPT, &prompt, self.timeout).await?;

        let value = extract_json(&response)?;
        let suggested = recipe_from_json(&value)?;
        if suggested.ingredients.len() != recipe.ingredients.len() {
            return Err(PipelineError::AiSchemaInvalid(format!(
                "expected {} ingredients, got {}",
                recipe.ingredients.len(),
                suggested.ingredients.len()
            )));
        }
        debug!("AI suggested quantities for {} ingredients", suggested.ingredients.len());

        let items = value["ingredients"].as_array().map(Vec::as_slice).unwrap_or_default();
        // A scaled amount must be stated; the parser default of 1 does not count
        let quantities = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                positive_number(item.get("quantity")).ok_or_else(|| {
                    PipelineError::AiSchemaInvalid(format!(
                        "ingredient {} has no positive quantity",
                        index
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let notes: Vec<Option<String>> = items
            .iter()
            .map(|item| {
                non_blank(item.get("roundingNote").and_then(Value::as_str)).map(str::to_string)
            })
            .collect();

        // Only quantities come from the AI; names and prose stay as given
        let ingredients = recipe
            .ingredients
            .iter()
            .zip(quantities)
            .zip(notes)
            .map(|((original, quantity), rounding_note)| ScaledIngredient {
                ingredient: ParsedIngredient {
                    quantity,
                    ..original.clone()
                },
                rounding_note,
            })
            .collect();

        Ok(ScaledRecipe {
            name: recipe.name.clone(),
            description: recipe.description.clone(),
            ingredients,
            instructions: recipe.instructions.clone(),
            notes: recipe.notes.clone(),
            yield_quantity: recipe
                .yield_quantity
                .map(|quantity| super::snap_to_fraction(quantity * factor)),
            yield_unit: recipe.yield_unit.clone(),
            prep_time_minutes: recipe.prep_time_minutes,
            cook_time_minutes: recipe.cook_time_minutes,
            scale_factor: factor,
        })
    }
}

fn apply_target_yield(scaled: &mut ScaledRecipe, request: &ScaleRequest) {
    if let ScaleRequest::TargetYield { quantity, unit } = request {
        scaled.yield_quantity = Some(*quantity);
        if unit.is_some() {
            scaled.yield_unit.clone_from(unit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn loose(value: Value) -> LooseRecipe {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_raw_ingredient_is_split() {
        let recipe = normalize_recipe(&loose(json!({
            "name": "Bread",
            "ingredients": [{"raw": "1 1/2 cups flour"}],
            "instructions": ["Bake"]
        })))
        .unwrap();
        let flour = &recipe.ingredients[0];
        assert_eq!(flour.quantity, 1.5);
        assert_eq!(flour.unit, "cup");
        assert_eq!(flour.name, "flour");
    }

    #[test]
    fn test_unsplittable_raw_becomes_name() {
        let recipe = normalize_recipe(&loose(json!({
            "ingredients": [{"raw": "salt to taste"}, "  ", {"unit": "g"}],
            "instructions": "Season."
        })))
        .unwrap();
        assert_eq!(recipe.ingredients.len(), 1);
        assert_eq!(recipe.ingredients[0].name, "salt to taste");
        assert_eq!(recipe.ingredients[0].quantity, 1.0);
        assert_eq!(recipe.ingredients[0].unit, "piece");
        assert_eq!(recipe.name, DEFAULT_RECIPE_NAME);
    }

    #[test]
    fn test_structured_fields_are_normalized() {
        let recipe = normalize_recipe(&loose(json!({
            "name": "Soup",
            "ingredients": [
                {"name": "stock", "quantity": "2", "unit": "Cups"},
                {"name": "pepper", "quantity": 0, "notes": "freshly ground"}
            ],
            "instructions": ["Simmer"],
            "yield_quantity": 4
        })))
        .unwrap();
        assert_eq!(recipe.ingredients[0].quantity, 2.0);
        assert_eq!(recipe.ingredients[0].unit, "cup");
        assert_eq!(recipe.ingredients[1].quantity, 1.0);
        assert_eq!(recipe.ingredients[1].notes.as_deref(), Some("freshly ground"));
        assert_eq!(recipe.yield_quantity, Some(4.0));
    }

    #[test]
    fn test_html_instructions() {
        let steps = normalize_instructions(&LooseInstructions::Text(
            "<ol><li>Preheat the oven.</li><li> Mix   flour &amp; water </li></ol>".to_string(),
        ));
        assert_eq!(steps, vec!["Preheat the oven.", "Mix flour & water"]);
    }

    #[test]
    fn test_numbered_text_instructions() {
        let steps = normalize_instructions(&LooseInstructions::Text(
            "1. Boil water\n\n2) Add pasta\nStep 3: Drain".to_string(),
        ));
        assert_eq!(steps, vec!["Boil water", "Add pasta", "Drain"]);
    }

    #[test]
    fn test_empty_recipe_is_rejected() {
        let no_steps = loose(json!({"ingredients": ["2 eggs"], "instructions": []}));
        assert!(matches!(
            normalize_recipe(&no_steps),
            Err(PipelineError::InvalidRecipeForScaling(_))
        ));

        let no_ingredients = loose(json!({"ingredients": [], "instructions": ["Cook"]}));
        assert!(matches!(
            normalize_recipe(&no_ingredients),
            Err(PipelineError::InvalidRecipeForScaling(_))
        ));
    }

    #[test]
    fn test_loose_yield_and_times_accept_strings_and_decimals() {
        let recipe = normalize_recipe(&loose(json!({
            "ingredients": ["2 cups rice"],
            "instructions": ["Cook"],
            "yieldQuantity": "4",
            "prepTimeMinutes": 12.5,
            "cookTimeMinutes": "1 hour",
        })))
        .unwrap();
        assert_eq!(recipe.yield_quantity, Some(4.0));
        assert_eq!(recipe.prep_time_minutes, Some(13));
        assert_eq!(recipe.cook_time_minutes, Some(60));

        let recipe = normalize_recipe(&loose(json!({
            "ingredients": ["2 cups rice"],
            "instructions": ["Cook"],
            "yield_quantity": "plenty",
            "prep_time_minutes": "soon",
        })))
        .unwrap();
        assert_eq!(recipe.yield_quantity, None);
        assert_eq!(recipe.prep_time_minutes, None);
    }

    #[tokio::test]
    async fn test_parsed_free_text_is_split_before_scaling() {
        let normalizer = ScalingNormalizer::new(
            RecipeParser::heuristic_only(),
            None,
            ScalingConfig::default(),
            Duration::from_secs(1),
        );
        let parsed = RecipeParser::heuristic_only()
            .parse_heuristic("Pancakes\n2 cups flour\n1. Mix everything");

        let scaled = normalizer
            .scale(
                parsed.into(),
                &ScaleRequest::MultiplyBy(2.0),
                ScalingOptions::default(),
            )
            .await
            .unwrap();

        let flour = &scaled.ingredients[0].ingredient;
        assert_eq!(flour.quantity, 4.0);
        assert_eq!(flour.unit, "cup");
        assert_eq!(flour.name, "flour");
    }

    #[test]
    fn test_resplit_free_text() {
        let recipe = ParsedRecipe {
            ingredients: vec![
                ParsedIngredient::free_text("2 cups flour"),
                ParsedIngredient::free_text("salt"),
            ],
            ..Default::default()
        };
        let recipe = resplit_free_text(recipe);
        assert_eq!(recipe.ingredients[0].quantity, 2.0);
        assert_eq!(recipe.ingredients[0].unit, "cup");
        assert_eq!(recipe.ingredients[1].name, "salt");
    }
}

//! AI-backed recipe parsing.
//!
//! The AI service is untrusted: its reply may be fenced in markdown, wrapped
//! in prose, or missing fields. Everything it returns is validated and
//! normalized into the same [`ParsedRecipe`] the heuristic parser produces.

use super::sections::parse_duration_minutes;
use crate::error::{excerpt, PipelineError, Result};
use crate::ingredient::split_or_free_text;
use crate::model::{ParsedIngredient, ParsedRecipe, DEFAULT_UNIT};
use crate::providers::{LlmProvider, RECIPE_PARSER_PROMPT};
use crate::quantity::parse_quantity;
use crate::units::{is_known_unit, normalize_unit};
use log::{debug, warn};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

/// Characters of an AI response kept in log lines
const LOG_EXCERPT_CHARS: usize = 200;

/// Send one completion request, honouring `timeout`. Transport failures and
/// timeouts both surface as [`PipelineError::AiUnavailable`].
pub(crate) async fn request_completion(
    provider: &dyn LlmProvider,
    system: &str,
    prompt: &str,
    timeout: Duration,
) -> Result<String> {
    debug!(
        "Sending {} chars to {}",
        prompt.len(),
        provider.provider_name()
    );
    match tokio::time::timeout(timeout, provider.complete(system, prompt)).await {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => {
            warn!("{} request failed: {}", provider.provider_name(), e);
            Err(PipelineError::AiUnavailable(e.to_string()))
        }
        Err(_) => {
            warn!(
                "{} request timed out after {:?}",
                provider.provider_name(),
                timeout
            );
            Err(PipelineError::AiUnavailable(format!(
                "request timed out after {}s",
                timeout.as_secs_f64()
            )))
        }
    }
}

/// Remove a surrounding markdown code fence (```` ```json ... ``` ````)
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line
    let inner = match inner.find('\n') {
        Some(newline) => &inner[newline + 1..],
        None => inner,
    };
    inner.trim_end().trim_end_matches("```").trim()
}

/// Read the JSON object out of an AI reply
pub fn extract_json(response: &str) -> Result<Value> {
    let body = strip_code_fences(response);
    match serde_json::from_str::<Value>(body) {
        Ok(value) => Ok(value),
        Err(first_error) => {
            // Tolerate prose around a single object
            let embedded = match (body.find('{'), body.rfind('}')) {
                (Some(start), Some(end)) if start < end => {
                    serde_json::from_str::<Value>(&body[start..=end]).ok()
                }
                _ => None,
            };
            embedded.ok_or_else(|| {
                warn!(
                    "AI response is not JSON ({}): {}",
                    first_error,
                    excerpt(response, LOG_EXCERPT_CHARS)
                );
                PipelineError::AiMalformedResponse(first_error.to_string())
            })
        }
    }
}

fn field<'a>(object: &'a Map<String, Value>, camel: &str, snake: &str) -> Option<&'a Value> {
    object.get(camel).or_else(|| object.get(snake))
}

fn non_blank(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A positive finite number, from a JSON number or a lexable string
pub(crate) fn positive_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_quantity(s)?,
        _ => return None,
    };
    (number.is_finite() && number > 0.0).then_some(number)
}

/// Whole minutes from a JSON number or a duration string such as `"1 hour"`
pub(crate) fn minutes(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::Number(n) => n
            .as_f64()
            .filter(|m| m.is_finite() && *m >= 0.0 && *m <= u32::MAX as f64)
            .map(|m| m.round() as u32),
        Value::String(s) => parse_duration_minutes(s),
        _ => None,
    }
}

fn ingredient_from_json(index: usize, value: &Value) -> Result<ParsedIngredient> {
    if let Some(line) = value.as_str().map(str::trim).filter(|s| !s.is_empty()) {
        return Ok(split_or_free_text(line));
    }
    let object = value.as_object().ok_or_else(|| {
        PipelineError::AiSchemaInvalid(format!("ingredient {} is not an object", index))
    })?;
    let name = non_blank(object.get("name")).ok_or_else(|| {
        PipelineError::AiSchemaInvalid(format!("ingredient {} has no name", index))
    })?;

    let quantity = positive_number(object.get("quantity")).unwrap_or(1.0);
    let unit = match non_blank(object.get("unit")) {
        Some(unit) => {
            if !is_known_unit(&unit) {
                debug!("Keeping unrecognized unit {:?} for {}", unit, name);
            }
            normalize_unit(&unit)
        }
        None => DEFAULT_UNIT.to_string(),
    };
    let mut ingredient = ParsedIngredient::new(quantity, unit, name);
    if let Some(notes) = non_blank(object.get("notes")) {
        ingredient = ingredient.with_notes(notes);
    }
    Ok(ingredient)
}

/// Validate AI JSON against the recipe schema and fill in defaults.
///
/// Required: a non-empty `name`, a non-empty `ingredients` array whose
/// entries all have a name, and a non-empty `instructions` array of
/// non-empty strings. Numbers that are not finite and positive are dropped.
pub fn recipe_from_json(value: &Value) -> Result<ParsedRecipe> {
    let object = value
        .as_object()
        .ok_or_else(|| PipelineError::AiSchemaInvalid("response is not an object".into()))?;

    let name = non_blank(object.get("name"))
        .ok_or_else(|| PipelineError::AiSchemaInvalid("missing recipe name".into()))?;

    let ingredients = object
        .get("ingredients")
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .ok_or_else(|| PipelineError::AiSchemaInvalid("missing ingredients".into()))?
        .iter()
        .enumerate()
        .map(|(index, item)| ingredient_from_json(index, item))
        .collect::<Result<Vec<_>>>()?;

    let instructions = object
        .get("instructions")
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .ok_or_else(|| PipelineError::AiSchemaInvalid("missing instructions".into()))?
        .iter()
        .enumerate()
        .map(|(index, step)| {
            non_blank(Some(step)).ok_or_else(|| {
                PipelineError::AiSchemaInvalid(format!("instruction {} is empty", index))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ParsedRecipe {
        name,
        description: non_blank(object.get("description")).unwrap_or_default(),
        ingredients,
        instructions,
        notes: non_blank(object.get("notes")),
        yield_quantity: positive_number(field(object, "yieldQuantity", "yield_quantity")),
        yield_unit: non_blank(field(object, "yieldUnit", "yield_unit")),
        prep_time_minutes: minutes(field(object, "prepTimeMinutes", "prep_time_minutes")),
        cook_time_minutes: minutes(field(object, "cookTimeMinutes", "cook_time_minutes")),
    })
}

/// Parse an AI reply into a recipe, logging a truncated excerpt on failure
pub fn recipe_from_response(response: &str) -> Result<ParsedRecipe> {
    let value = extract_json(response)?;
    recipe_from_json(&value).map_err(|e| {
        warn!(
            "AI response rejected ({}): {}",
            e,
            excerpt(response, LOG_EXCERPT_CHARS)
        );
        e
    })
}

/// Parser adapter that delegates to an AI provider
#[derive(Clone)]
pub struct AiParser {
    provider: Option<Arc<dyn LlmProvider>>,
    timeout: Duration,
}

impl AiParser {
    pub fn new(provider: Option<Arc<dyn LlmProvider>>, timeout: Duration) -> Self {
        AiParser { provider, timeout }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Ask the AI service to structure `text`
    pub async fn parse(&self, text: &str) -> Result<ParsedRecipe> {
        let provider = self
            .provider
            .as_deref()
            .ok_or_else(|| PipelineError::AiUnavailable("no AI provider configured".into()))?;

        let response =
            request_completion(provider, RECIPE_PARSER_PROMPT, text, self.timeout).await?;
        recipe_from_response(&response)
    }
}

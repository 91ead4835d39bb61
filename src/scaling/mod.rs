//! Deterministic recipe scaling.

pub mod normalizer;
pub mod rounding;

pub use normalizer::{
    normalize_recipe, LooseIngredient, LooseRecipe, ScalingInput, ScalingNormalizer,
    ScalingOptions,
};
pub use rounding::{round_quantity, snap_to_fraction, RoundedQuantity};

use crate::error::{PipelineError, Result};
use crate::model::{ParsedRecipe, ScaleRequest, ScaledIngredient, ScaledRecipe};
use log::debug;

fn require_positive(what: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(PipelineError::InvalidScaleRequest(format!(
            "{} must be a positive number, got {}",
            what, value
        )))
    }
}

/// Work out the factor every quantity is multiplied by
pub fn resolve_factor(recipe: &ParsedRecipe, request: &ScaleRequest) -> Result<f64> {
    let factor = match request {
        ScaleRequest::MultiplyBy(multiplier) => require_positive("multiplier", *multiplier)?,
        ScaleRequest::DivideBy(divisor) => 1.0 / require_positive("divisor", *divisor)?,
        ScaleRequest::Constraint {
            ingredient,
            target_quantity,
        } => {
            let target = require_positive("target quantity", *target_quantity)?;
            let reference = ingredient.resolve(&recipe.ingredients).ok_or_else(|| {
                PipelineError::InvalidScaleRequest(format!("no ingredient {}", ingredient))
            })?;
            target / require_positive("reference quantity", reference.quantity)?
        }
        ScaleRequest::TargetYield { quantity, .. } => {
            let target = require_positive("target yield", *quantity)?;
            let current = recipe.yield_quantity.ok_or_else(|| {
                PipelineError::InvalidScaleRequest(
                    "recipe has no yield to scale from".to_string(),
                )
            })?;
            target / require_positive("recipe yield", current)?
        }
    };
    require_positive("scale factor", factor)
}

/// Scale a recipe according to `request`.
///
/// Ingredient quantities are rounded with [`rounding::round_quantity`]; a
/// factor of exactly 1 leaves them as they are. Instructions and other text
/// pass through untouched.
pub fn scale(recipe: &ParsedRecipe, request: &ScaleRequest) -> Result<ScaledRecipe> {
    let factor = resolve_factor(recipe, request)?;
    debug!("Scaling '{}' by {}", recipe.name, factor);

    let mut scaled = scale_by_factor(recipe, factor);
    if let ScaleRequest::TargetYield { quantity, unit } = request {
        scaled.yield_quantity = Some(*quantity);
        if unit.is_some() {
            scaled.yield_unit.clone_from(unit);
        }
    }
    Ok(scaled)
}

/// Apply an already-resolved factor
pub(crate) fn scale_by_factor(recipe: &ParsedRecipe, factor: f64) -> ScaledRecipe {
    let identity = factor == 1.0;

    let ingredients = recipe
        .ingredients
        .iter()
        .map(|ingredient| {
            let mut scaled = ingredient.clone();
            if identity {
                return ScaledIngredient {
                    ingredient: scaled,
                    rounding_note: None,
                };
            }
            let rounded = round_quantity(
                ingredient.quantity * factor,
                &ingredient.name,
                &ingredient.unit,
            );
            scaled.quantity = rounded.value;
            ScaledIngredient {
                ingredient: scaled,
                rounding_note: rounded.note,
            }
        })
        .collect();

    let yield_quantity = recipe.yield_quantity.map(|quantity| {
        if identity {
            quantity
        } else {
            snap_to_fraction(quantity * factor)
        }
    });

    ScaledRecipe {
        name: recipe.name.clone(),
        description: recipe.description.clone(),
        ingredients,
        instructions: recipe.instructions.clone(),
        notes: recipe.notes.clone(),
        yield_quantity,
        yield_unit: recipe.yield_unit.clone(),
        prep_time_minutes: recipe.prep_time_minutes,
        cook_time_minutes: recipe.cook_time_minutes,
        scale_factor: factor,
    }
}

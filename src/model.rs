//! Structured recipe values shared by the parsers and the scaling engine.
//!
//! Everything here is a plain value object: built fresh for each request,
//! never mutated after it is handed back, and serialized with camelCase keys
//! so a UI can render it directly.

use crate::quantity::format_quantity;
use serde::{Deserialize, Serialize};

pub const DEFAULT_RECIPE_NAME: &str = "Untitled Recipe";
pub const DEFAULT_UNIT: &str = "piece";
pub const PLACEHOLDER_INGREDIENT: &str = "No ingredients found";
pub const PLACEHOLDER_INSTRUCTION: &str = "No instructions found";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedIngredient {
    pub quantity: f64,
    pub unit: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ParsedIngredient {
    pub fn new(quantity: f64, unit: impl Into<String>, name: impl Into<String>) -> Self {
        ParsedIngredient {
            quantity,
            unit: unit.into(),
            name: name.into(),
            notes: None,
        }
    }

    /// A whole line kept as the ingredient name, with default quantity and unit
    pub fn free_text(line: impl Into<String>) -> Self {
        Self::new(1.0, DEFAULT_UNIT, line)
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = if notes.trim().is_empty() {
            None
        } else {
            Some(notes.trim().to_string())
        };
        self
    }
}

/// Kitchen notation: `1 1/2 cup flour, sifted`
impl std::fmt::Display for ParsedIngredient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", format_quantity(self.quantity), self.unit, self.name)?;
        if let Some(notes) = &self.notes {
            write!(f, ", {}", notes)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedRecipe {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub ingredients: Vec<ParsedIngredient>,
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yield_quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yield_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time_minutes: Option<u32>,
}

impl Default for ParsedRecipe {
    fn default() -> Self {
        ParsedRecipe {
            name: DEFAULT_RECIPE_NAME.to_string(),
            description: String::new(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
            notes: None,
            yield_quantity: None,
            yield_unit: None,
            prep_time_minutes: None,
            cook_time_minutes: None,
        }
    }
}

impl ParsedRecipe {
    /// Fill in the defaults every returned recipe must carry: a name and at
    /// least one ingredient and instruction.
    pub fn with_placeholders(mut self) -> Self {
        if self.name.trim().is_empty() {
            self.name = DEFAULT_RECIPE_NAME.to_string();
        }
        if self.ingredients.is_empty() {
            self.ingredients
                .push(ParsedIngredient::free_text(PLACEHOLDER_INGREDIENT));
        }
        if self.instructions.is_empty() {
            self.instructions.push(PLACEHOLDER_INSTRUCTION.to_string());
        }
        self
    }
}

/// Which ingredient a constraint refers to: a zero-based index or a name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IngredientRef {
    Index(usize),
    Name(String),
}

impl IngredientRef {
    pub fn resolve<'a>(&self, ingredients: &'a [ParsedIngredient]) -> Option<&'a ParsedIngredient> {
        match self {
            IngredientRef::Index(index) => ingredients.get(*index),
            IngredientRef::Name(name) => {
                let wanted = name.trim().to_lowercase();
                ingredients
                    .iter()
                    .find(|i| i.name.trim().to_lowercase() == wanted)
            }
        }
    }
}

impl std::fmt::Display for IngredientRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngredientRef::Index(index) => write!(f, "#{}", index),
            IngredientRef::Name(name) => write!(f, "'{}'", name),
        }
    }
}

/// How to derive the scale factor. Exactly one mode per request.
#[derive(Debug, Clone, PartialEq)]
pub enum ScaleRequest {
    MultiplyBy(f64),
    DivideBy(f64),
    Constraint {
        ingredient: IngredientRef,
        target_quantity: f64,
    },
    TargetYield {
        quantity: f64,
        unit: Option<String>,
    },
}

/// Loosely-typed scale request as it arrives over JSON; see
/// [`ScaleRequest::try_from`] for validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleRequestInput {
    pub multiply_by: Option<f64>,
    pub divide_by: Option<f64>,
    pub constraint: Option<ConstraintInput>,
    pub target_yield: Option<f64>,
    pub target_yield_unit: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintInput {
    pub ingredient: IngredientRef,
    pub target_quantity: f64,
}

impl TryFrom<ScaleRequestInput> for ScaleRequest {
    type Error = crate::error::PipelineError;

    fn try_from(input: ScaleRequestInput) -> Result<Self, Self::Error> {
        let mut modes = Vec::new();
        if let Some(value) = input.multiply_by {
            modes.push(ScaleRequest::MultiplyBy(value));
        }
        if let Some(value) = input.divide_by {
            modes.push(ScaleRequest::DivideBy(value));
        }
        if let Some(constraint) = input.constraint {
            modes.push(ScaleRequest::Constraint {
                ingredient: constraint.ingredient,
                target_quantity: constraint.target_quantity,
            });
        }
        if let Some(quantity) = input.target_yield {
            modes.push(ScaleRequest::TargetYield {
                quantity,
                unit: input.target_yield_unit,
            });
        }

        if modes.len() != 1 {
            return Err(crate::error::PipelineError::InvalidScaleRequest(format!(
                "exactly one of multiplyBy, divideBy, constraint or targetYield is required, got {}",
                modes.len()
            )));
        }
        Ok(modes.remove(0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaledIngredient {
    #[serde(flatten)]
    pub ingredient: ParsedIngredient,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounding_note: Option<String>,
}

impl std::fmt::Display for ScaledIngredient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.ingredient)?;
        if let Some(note) = &self.rounding_note {
            write!(f, " ({})", note)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaledRecipe {
    pub name: String,
    pub description: String,
    pub ingredients: Vec<ScaledIngredient>,
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yield_quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yield_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time_minutes: Option<u32>,
    pub scale_factor: f64,
}

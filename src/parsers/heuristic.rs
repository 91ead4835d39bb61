//! Rule-based recipe parser used when the AI service is off or failing.
//!
//! It never fails: whatever it cannot place ends up in the description, and
//! missing ingredients or instructions are replaced by placeholders.

use super::sections::{
    classify_header, is_header_shaped, looks_like_ingredient, looks_like_instruction,
    parse_duration_minutes, parse_yield, strip_step_number, HeaderKind, HeaderMatch,
};
use crate::ingredient::strip_bullet;
use crate::model::{ParsedIngredient, ParsedRecipe};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Ingredients,
    Instructions,
    Description,
    Notes,
    Other,
}

#[derive(Default)]
struct Draft {
    name: Option<String>,
    description: Vec<String>,
    ingredients: Vec<ParsedIngredient>,
    instructions: Vec<String>,
    notes: Vec<String>,
    yield_quantity: Option<f64>,
    yield_unit: Option<String>,
    prep_time_minutes: Option<u32>,
    cook_time_minutes: Option<u32>,
}

impl Draft {
    /// Store the value of a name, yield or time header
    fn apply_value(&mut self, kind: HeaderKind, value: &str) {
        let value = value.trim();
        match kind {
            HeaderKind::Name if !value.is_empty() => {
                self.name = Some(clean_title(value));
            }
            HeaderKind::Yield => {
                if let Some((quantity, unit)) = parse_yield(value) {
                    self.yield_quantity = Some(quantity);
                    self.yield_unit = unit;
                }
            }
            HeaderKind::PrepTime => {
                if let Some(minutes) = parse_duration_minutes(value) {
                    self.prep_time_minutes = Some(minutes);
                }
            }
            HeaderKind::CookTime => {
                if let Some(minutes) = parse_duration_minutes(value) {
                    self.cook_time_minutes = Some(minutes);
                }
            }
            _ => {}
        }
    }

    fn into_recipe(self) -> ParsedRecipe {
        let mut description = self.description.join("\n");
        let name = match self.name {
            Some(name) => name,
            None => {
                // Promote the first description line when no title was found
                let mut lines = description.lines();
                let promoted = lines.next().map(clean_title).unwrap_or_default();
                description = lines.collect::<Vec<_>>().join("\n");
                promoted
            }
        };
        let notes = if self.notes.is_empty() {
            None
        } else {
            Some(self.notes.join("\n"))
        };

        ParsedRecipe {
            name,
            description,
            ingredients: self.ingredients,
            instructions: self.instructions,
            notes,
            yield_quantity: self.yield_quantity,
            yield_unit: self.yield_unit,
            prep_time_minutes: self.prep_time_minutes,
            cook_time_minutes: self.cook_time_minutes,
        }
        .with_placeholders()
    }
}

fn clean_title(line: &str) -> String {
    line.trim().trim_start_matches('#').trim().to_string()
}

/// A header that starts a section or carries metadata. Header-shaped lines
/// must match a synonym. Other lines count when they are nothing but a
/// section word (`"Ingredients"`) or `Label: value` metadata such as
/// `"Prep Time: 15 minutes"` or `"Serves 4"`. Inside an ingredient or
/// instruction list, `"COOK 15 MINUTES"` stays content.
fn recognize_header(line: &str, section: Section) -> Option<HeaderMatch> {
    let header = classify_header(line)?;
    if header.verb_prefix && matches!(section, Section::Ingredients | Section::Instructions) {
        return None;
    }
    if is_header_shaped(line) {
        return Some(header);
    }
    let metadata_line = match header.kind {
        HeaderKind::Yield | HeaderKind::PrepTime | HeaderKind::CookTime => {
            !header.value.is_empty()
        }
        HeaderKind::Name => line.contains(':') && !header.value.is_empty(),
        HeaderKind::Ingredients
        | HeaderKind::Instructions
        | HeaderKind::Description
        | HeaderKind::Notes => header.value.is_empty(),
    };
    metadata_line.then_some(header)
}

/// Heuristic parser splitting plain recipe text into sections
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicParser;

impl HeuristicParser {
    pub fn new() -> Self {
        HeuristicParser
    }

    /// Parse free-form recipe text. Always returns a recipe.
    ///
    /// Ingredient lines are kept whole: each becomes quantity 1, unit
    /// `"piece"` and the full line as its name. Use
    /// [`crate::ingredient::split_ingredient_line`] to break them up.
    pub fn parse(&self, text: &str) -> ParsedRecipe {
        let mut lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let mut draft = Draft::default();

        if let Some(first) = lines.first() {
            if recognize_header(first, Section::Other).is_none() {
                draft.name = Some(clean_title(first));
                lines.remove(0);
            }
        }

        let mut section = Section::Other;
        let mut pending_value: Option<HeaderKind> = None;

        for line in lines {
            if let Some(kind) = pending_value.take() {
                if recognize_header(line, section).is_none() {
                    draft.apply_value(kind, line);
                    continue;
                }
            }

            if let Some(header) = recognize_header(line, section) {
                debug!("Section header {:?} at line {:?}", header.kind, line);
                if header.kind.carries_value() {
                    if header.value.is_empty() {
                        pending_value = Some(header.kind);
                    } else {
                        draft.apply_value(header.kind, &header.value);
                    }
                    section = Section::Other;
                    continue;
                }

                section = match header.kind {
                    HeaderKind::Ingredients => Section::Ingredients,
                    HeaderKind::Instructions => Section::Instructions,
                    HeaderKind::Description => Section::Description,
                    HeaderKind::Notes => Section::Notes,
                    _ => Section::Other,
                };
                // "Notes: keep chilled" puts content on the header line itself
                if !header.value.is_empty() {
                    place_line(&mut draft, section, &header.value);
                }
                continue;
            }

            place_line(&mut draft, section, line);
        }

        draft.into_recipe()
    }
}

fn place_line(draft: &mut Draft, section: Section, line: &str) {
    match section {
        Section::Ingredients => push_ingredient(draft, line),
        Section::Instructions => push_instruction(draft, line),
        Section::Description => draft.description.push(line.to_string()),
        Section::Notes => draft.notes.push(line.to_string()),
        Section::Other => {
            if looks_like_ingredient(line) {
                push_ingredient(draft, line);
            } else if looks_like_instruction(line) {
                push_instruction(draft, line);
            } else {
                draft.description.push(line.to_string());
            }
        }
    }
}

fn push_ingredient(draft: &mut Draft, line: &str) {
    let text = strip_bullet(line);
    if !text.is_empty() {
        draft.ingredients.push(ParsedIngredient::free_text(text));
    }
}

fn push_instruction(draft: &mut Draft, line: &str) {
    let step = strip_step_number(strip_bullet(line));
    if !step.is_empty() {
        draft.instructions.push(step.to_string());
    }
}

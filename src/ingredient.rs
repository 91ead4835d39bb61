//! Strict ingredient line splitting: `"<quantity> <unit> <name>[, notes]"`.

use crate::model::{ParsedIngredient, DEFAULT_UNIT};
use crate::quantity::split_leading_quantity;
use crate::units::canonical_unit;

const BULLETS: &[char] = &['-', '*', '•', '·', '–'];

/// Remove a leading list bullet (`-`, `*`, `•`) from a line
pub fn strip_bullet(line: &str) -> &str {
    let trimmed = line.trim_start();
    match trimmed.strip_prefix(BULLETS) {
        Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim_start(),
        _ => trimmed,
    }
}

/// Split an ingredient line into quantity, unit, name and notes.
///
/// The line must start with a quantity the lexer understands. The next token
/// becomes the unit when it is a known spelling (`"1 1/2 cups flour"`);
/// otherwise the unit defaults to `"piece"` (`"3 eggs"`). Text after the first
/// comma becomes the notes. Returns `None` when there is no quantity or no
/// name left after it.
pub fn split_ingredient_line(line: &str) -> Option<ParsedIngredient> {
    let line = strip_bullet(line);
    let (quantity, rest) = split_leading_quantity(line)?;
    if !quantity.is_finite() || quantity <= 0.0 {
        return None;
    }

    let rest = rest.trim();
    let (unit, remainder) = match take_unit(rest) {
        Some((unit, remainder)) => (unit.to_string(), remainder),
        None => (DEFAULT_UNIT.to_string(), rest),
    };

    let remainder = remainder.trim_start_matches(['.', ',']).trim();
    let remainder = remainder
        .strip_prefix("of ")
        .map(str::trim)
        .unwrap_or(remainder);

    let (name, notes) = match remainder.split_once(',') {
        Some((name, notes)) => (name.trim(), Some(notes.trim())),
        None => (remainder, None),
    };
    if name.is_empty() {
        return None;
    }

    let ingredient = ParsedIngredient::new(quantity, unit, name);
    Some(match notes {
        Some(notes) => ingredient.with_notes(notes),
        None => ingredient,
    })
}

/// Split `raw` if possible, otherwise keep the whole text as the name
pub fn split_or_free_text(raw: &str) -> ParsedIngredient {
    split_ingredient_line(raw).unwrap_or_else(|| ParsedIngredient::free_text(raw.trim()))
}

/// Known unit at the start of `text`, trying two-word spellings (`"fl oz"`)
/// before single words.
fn take_unit(text: &str) -> Option<(&'static str, &str)> {
    let mut words = text.split_whitespace();
    let first = words.next()?;
    if let Some(second) = words.next() {
        let pair = format!("{} {}", first, second);
        if let Some(unit) = canonical_unit(pair.trim_end_matches(',')) {
            let end = text.find(second)? + second.len();
            return Some((unit, &text[end..]));
        }
    }

    let unit = canonical_unit(first.trim_end_matches(','))?;
    let end = text.find(first)? + first.len();
    Some((unit, &text[end..]))
}

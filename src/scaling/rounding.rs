//! Table-driven rounding for scaled quantities.
//!
//! Scaled values are snapped to something a cook can measure. Countable
//! foods round to whole numbers; everything else snaps to a whole number or
//! one of the common culinary fractions. Extend the tables below to change
//! the policy.

use crate::quantity::format_decimal;
use crate::units::{unit_kind, UnitKind};

/// Ingredient nouns that are only ever used whole
pub const WHOLE_NUMBER_INGREDIENTS: &[&str] = &[
    "egg", "eggs", "banana", "bananas", "apple", "apples", "orange", "oranges",
];

/// Common culinary fractions with their reach: a fractional part snaps to
/// the closest fraction whose reach covers it.
pub const CULINARY_FRACTIONS: &[(f64, f64)] = &[
    (1.0 / 4.0, 0.125),
    (1.0 / 3.0, 0.05),
    (1.0 / 2.0, 0.125),
    (2.0 / 3.0, 0.05),
    (3.0 / 4.0, 0.125),
];

/// Fractional parts this close to a whole number round to it
pub const WHOLE_SNAP: f64 = 0.125;

/// Rounding that moves a value further than this gets a note
pub const NOTE_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct RoundedQuantity {
    pub value: f64,
    pub note: Option<String>,
}

/// Whether an ingredient is counted rather than measured: its head noun is
/// in [`WHOLE_NUMBER_INGREDIENTS`] or its unit is a count unit.
pub fn is_whole_number_ingredient(name: &str, unit: &str) -> bool {
    if unit_kind(unit) == UnitKind::Count {
        return true;
    }
    // "large eggs" counts, "orange juice" does not
    name.split(|c: char| !c.is_alphabetic())
        .filter(|word| !word.is_empty())
        .last()
        .map(|noun| {
            let noun = noun.to_lowercase();
            WHOLE_NUMBER_INGREDIENTS.contains(&noun.as_str())
        })
        .unwrap_or(false)
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Snap to a whole number or a whole number plus a culinary fraction.
/// Values that would snap to zero keep two decimals instead.
pub fn snap_to_fraction(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return value;
    }

    let whole = value.floor();
    let fraction = value - whole;

    let snapped = if fraction <= WHOLE_SNAP {
        whole
    } else if fraction >= 1.0 - WHOLE_SNAP {
        whole + 1.0
    } else {
        CULINARY_FRACTIONS
            .iter()
            .filter(|(target, reach)| (fraction - target).abs() <= *reach)
            .min_by(|(a, _), (b, _)| (fraction - a).abs().total_cmp(&(fraction - b).abs()))
            .map(|(target, _)| whole + target)
            .unwrap_or_else(|| round_to_hundredths(value))
    };

    if snapped <= 0.0 {
        round_to_hundredths(value)
    } else {
        snapped
    }
}

fn round_whole(value: f64) -> f64 {
    value.round().max(1.0)
}

/// Round one scaled ingredient quantity and describe the change when it is
/// large enough to matter.
pub fn round_quantity(raw: f64, name: &str, unit: &str) -> RoundedQuantity {
    let value = if is_whole_number_ingredient(name, unit) {
        round_whole(raw)
    } else {
        snap_to_fraction(raw)
    };

    let note = ((value - raw).abs() > NOTE_THRESHOLD)
        .then(|| format!("Rounded from {}", format_decimal(raw)));
    RoundedQuantity { value, note }
}

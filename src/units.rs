//! Unit spelling normalization.
//!
//! Every known spelling maps to one canonical abbreviation per unit family.
//! Unknown units are returned unchanged so unusual recipes still parse.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// What a canonical unit measures; the scaling engine rounds `Count` units
/// to whole numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Volume,
    Mass,
    Length,
    Count,
    Custom,
}

/// Canonical unit, its kind, and the spellings that map onto it
const UNIT_TABLE: &[(&str, UnitKind, &[&str])] = &[
    (
        "tsp",
        UnitKind::Volume,
        &["tsp", "tsps", "teaspoon", "teaspoons", "teaspoonful", "teaspoonfuls"],
    ),
    (
        "tbsp",
        UnitKind::Volume,
        &[
            "tbsp",
            "tbsps",
            "tbs",
            "tbl",
            "tbls",
            "tablespoon",
            "tablespoons",
            "tablespoonful",
            "tablespoonfuls",
        ],
    ),
    ("cup", UnitKind::Volume, &["cup", "cups", "c"]),
    (
        "fl oz",
        UnitKind::Volume,
        &["fl oz", "fl. oz", "floz", "fluid ounce", "fluid ounces"],
    ),
    ("pint", UnitKind::Volume, &["pint", "pints", "pt", "pts"]),
    ("quart", UnitKind::Volume, &["quart", "quarts", "qt", "qts"]),
    (
        "ml",
        UnitKind::Volume,
        &["ml", "mls", "milliliter", "milliliters", "millilitre", "millilitres"],
    ),
    (
        "l",
        UnitKind::Volume,
        &["l", "liter", "liters", "litre", "litres", "ltr"],
    ),
    ("oz", UnitKind::Mass, &["oz", "ozs", "ounce", "ounces"]),
    ("lb", UnitKind::Mass, &["lb", "lbs", "pound", "pounds"]),
    (
        "g",
        UnitKind::Mass,
        &["g", "gs", "gr", "gram", "grams", "gramme", "grammes"],
    ),
    (
        "kg",
        UnitKind::Mass,
        &["kg", "kgs", "kilo", "kilos", "kilogram", "kilograms", "kilogramme", "kilogrammes"],
    ),
    ("inch", UnitKind::Length, &["inch", "inches", "in"]),
    (
        "piece",
        UnitKind::Count,
        &["piece", "pieces", "pc", "pcs", "whole", "each", "ea"],
    ),
    ("clove", UnitKind::Count, &["clove", "cloves"]),
    ("slice", UnitKind::Count, &["slice", "slices"]),
    ("can", UnitKind::Count, &["can", "cans", "tin", "tins"]),
    ("bunch", UnitKind::Count, &["bunch", "bunches"]),
    ("sprig", UnitKind::Count, &["sprig", "sprigs"]),
    ("pinch", UnitKind::Count, &["pinch", "pinches"]),
    ("dash", UnitKind::Count, &["dash", "dashes"]),
];

static UNIT_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    UNIT_TABLE
        .iter()
        .flat_map(|(canonical, _, spellings)| spellings.iter().map(move |s| (*s, *canonical)))
        .collect()
});

static UNIT_KINDS: Lazy<HashMap<&'static str, UnitKind>> = Lazy::new(|| {
    UNIT_TABLE
        .iter()
        .map(|(canonical, kind, _)| (*canonical, *kind))
        .collect()
});

fn lookup_key(unit: &str) -> String {
    unit.trim().trim_end_matches('.').trim().to_lowercase()
}

/// Canonical abbreviation for a known spelling, `None` if the unit is unknown
pub fn canonical_unit(unit: &str) -> Option<&'static str> {
    UNIT_ALIASES.get(lookup_key(unit).as_str()).copied()
}

/// Normalize a unit spelling: `"Tablespoons"` → `"tbsp"`. Unknown units such
/// as `"knob"` pass through unchanged (only surrounding whitespace is removed).
pub fn normalize_unit(unit: &str) -> String {
    canonical_unit(unit)
        .map(str::to_string)
        .unwrap_or_else(|| unit.trim().to_string())
}

pub fn is_known_unit(unit: &str) -> bool {
    canonical_unit(unit).is_some()
}

/// Semantic type of a unit; unknown units are `Custom`
pub fn unit_kind(unit: &str) -> UnitKind {
    canonical_unit(unit)
        .and_then(|canonical| UNIT_KINDS.get(canonical).copied())
        .unwrap_or(UnitKind::Custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tablespoon_spellings() {
        assert_eq!(normalize_unit("Tablespoons"), "tbsp");
        assert_eq!(normalize_unit("tbsp"), "tbsp");
        assert_eq!(normalize_unit("TBSPS"), "tbsp");
        assert_eq!(normalize_unit(" tbsp. "), "tbsp");
    }

    #[test]
    fn test_unknown_unit_passes_through() {
        assert_eq!(normalize_unit("knob"), "knob");
        assert_eq!(normalize_unit("  Knob "), "Knob");
        assert!(!is_known_unit("knob"));
        assert_eq!(unit_kind("knob"), UnitKind::Custom);
    }

    #[test]
    fn test_families() {
        assert_eq!(normalize_unit("grams"), "g");
        assert_eq!(normalize_unit("Kilograms"), "kg");
        assert_eq!(normalize_unit("ounces"), "oz");
        assert_eq!(normalize_unit("lbs"), "lb");
        assert_eq!(normalize_unit("millilitres"), "ml");
        assert_eq!(normalize_unit("Liter"), "l");
        assert_eq!(normalize_unit("inches"), "inch");
        assert_eq!(normalize_unit("pcs"), "piece");
        assert_eq!(normalize_unit("Cups"), "cup");
    }

    #[test]
    fn test_unit_kinds() {
        assert_eq!(unit_kind("cups"), UnitKind::Volume);
        assert_eq!(unit_kind("g"), UnitKind::Mass);
        assert_eq!(unit_kind("piece"), UnitKind::Count);
        assert_eq!(unit_kind("cloves"), UnitKind::Count);
        assert_eq!(unit_kind("inch"), UnitKind::Length);
    }

    #[test]
    fn test_every_canonical_unit_maps_to_itself() {
        for (canonical, _, _) in UNIT_TABLE {
            assert_eq!(normalize_unit(canonical), *canonical);
        }
    }
}

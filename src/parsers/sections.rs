//! Line-shape heuristics for the section parser: header detection, header
//! synonyms, and the yield/duration extractors used by metadata headers.

use crate::quantity::{parse_quantity, split_leading_quantity};
use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    Name,
    Description,
    Ingredients,
    Instructions,
    Notes,
    Yield,
    PrepTime,
    CookTime,
}

impl HeaderKind {
    /// Headers whose value is read from the header line or the line after it
    pub fn carries_value(self) -> bool {
        matches!(
            self,
            HeaderKind::Name | HeaderKind::Yield | HeaderKind::PrepTime | HeaderKind::CookTime
        )
    }
}

/// Normalized header spellings. Value-carrying kinds are also matched as a
/// prefix ("serves 4"), so longer synonyms are listed before shorter ones.
const HEADER_SYNONYMS: &[(HeaderKind, &[&str])] = &[
    (
        HeaderKind::PrepTime,
        &["preparation time", "prep time", "time to prep", "prep"],
    ),
    (
        HeaderKind::CookTime,
        &[
            "cooking time",
            "cook time",
            "baking time",
            "bake time",
            "roasting time",
            "cook",
        ],
    ),
    (
        HeaderKind::Yield,
        &[
            "number of servings",
            "servings",
            "serving",
            "serves",
            "yields",
            "yield",
            "makes",
            "portions",
        ],
    ),
    (HeaderKind::Name, &["recipe name", "recipe title", "title", "name"]),
    (
        HeaderKind::Description,
        &["description", "about", "summary", "introduction", "intro", "overview"],
    ),
    (
        HeaderKind::Ingredients,
        &[
            "ingredients",
            "ingredient list",
            "ingredient",
            "what you need",
            "you will need",
            "youll need",
            "shopping list",
        ],
    ),
    (
        HeaderKind::Instructions,
        &[
            "instructions",
            "directions",
            "method",
            "steps",
            "preparation",
            "procedure",
            "how to make it",
            "how to make",
        ],
    ),
    (
        HeaderKind::Notes,
        &[
            "notes",
            "note",
            "tips",
            "chefs notes",
            "cooks notes",
            "recipe notes",
            "variations",
        ],
    ),
];

/// Synonyms that are also cooking verbs. As a prefix they only count on a
/// header-shaped line: "PREP 10 MIN" is metadata, "Cook 15 minutes" a step.
const VERB_SYNONYMS: &[&str] = &["prep", "cook"];

static NUMBERED_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+\.\s*[A-Z]").expect("numbered header pattern should be valid")
});

static NUMBER_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\s*").expect("number prefix pattern should be valid"));

static NUMBERED_STEP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:\d+[.)]|step\s*\d+\s*[:.)-]?)\s+")
        .expect("numbered step pattern should be valid")
});

static IMPERATIVE_THE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[a-z]+\s+the\b").expect("imperative pattern should be valid")
});

static DURATION_PART: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(\d+\s+\d+/\d+|\d+/\d+|\d+(?:[.,]\d+)?|[½¼¾⅓⅔])\s*(hours?|hrs?|h|minutes?|mins?|m)\b",
    )
    .expect("duration pattern should be valid")
});

static RANGE_TAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:-|–|to)\s*\d+(?:[.,]\d+)?").expect("range pattern should be valid")
});

const SEQUENCE_WORDS: &[&str] = &[
    "first",
    "firstly",
    "next",
    "then",
    "finally",
    "lastly",
    "afterwards",
    "after",
    "meanwhile",
    "once",
    "while",
    "second",
    "third",
];

/// Whether the line is shaped like a header: all caps (optional colon), a
/// markdown `#`, Title Case ending in a colon, or `"1. INGREDIENTS"`.
pub fn is_header_shaped(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() {
        return false;
    }
    line.starts_with('#')
        || is_all_caps(line)
        || is_title_case_with_colon(line)
        || NUMBERED_HEADER.is_match(line)
}

fn is_all_caps(line: &str) -> bool {
    let starts_with_letter = line.chars().next().is_some_and(char::is_alphabetic);
    let mut letters = line.chars().filter(|c| c.is_alphabetic()).peekable();
    starts_with_letter && letters.peek().is_some() && letters.all(char::is_uppercase)
}

fn is_title_case_with_colon(line: &str) -> bool {
    let Some(label) = line.strip_suffix(':') else {
        return false;
    };
    let words: Vec<&str> = label.split_whitespace().collect();
    if words.is_empty() || words.len() > 6 {
        return false;
    }
    let capitalized = |w: &&str| w.chars().next().is_some_and(char::is_uppercase);
    // Short joining words ("for the", "of") may stay lowercase
    capitalized(&words[0]) && words.iter().filter(|w| w.len() > 3).all(|w| capitalized(w))
}

/// Lowercase, strip markdown and numbering, drop punctuation, collapse spaces
pub fn normalize_header(text: &str) -> String {
    let text = text.trim().trim_start_matches('#').trim();
    let text = NUMBER_PREFIX.replace(text, "");
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// A recognized header and the value written on the same line, if any
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderMatch {
    pub kind: HeaderKind,
    pub value: String,
    /// Matched through a verb synonym followed by a number (`"PREP 10 MIN"`)
    pub verb_prefix: bool,
}

/// Match a line against the header synonym tables.
///
/// `"Ingredients:"` matches exactly; value-carrying headers also match with
/// their value attached, as in `"PREP TIME: 15 MINUTES"` or `"Serves 4"`.
pub fn classify_header(line: &str) -> Option<HeaderMatch> {
    let stripped = line.trim().trim_start_matches('#').trim();
    let stripped = NUMBER_PREFIX.replace(stripped, "");
    let (label, value) = match stripped.split_once(':') {
        Some((label, value)) => (label.trim(), value.trim()),
        None => (stripped.trim(), ""),
    };
    let normalized = normalize_header(label);
    if normalized.is_empty() {
        return None;
    }

    for (kind, synonyms) in HEADER_SYNONYMS {
        for synonym in *synonyms {
            if normalized == *synonym {
                return Some(HeaderMatch {
                    kind: *kind,
                    value: value.to_string(),
                    verb_prefix: false,
                });
            }
        }
    }

    let header_shaped = is_header_shaped(line);
    for (kind, synonyms) in HEADER_SYNONYMS.iter().filter(|(k, _)| k.carries_value()) {
        for synonym in *synonyms {
            let verb_prefix = VERB_SYNONYMS.contains(synonym);
            if verb_prefix && !header_shaped {
                continue;
            }
            if normalized.starts_with(&format!("{} ", synonym)) {
                let skip = synonym.split_whitespace().count();
                let inline: Vec<&str> = label.split_whitespace().skip(skip).collect();
                // "Serves 4" carries a value, "Cook the pasta" does not
                if !inline.first().is_some_and(|w| starts_with_number(w)) {
                    continue;
                }
                let mut joined = inline.join(" ");
                if !value.is_empty() {
                    if !joined.is_empty() {
                        joined.push(' ');
                    }
                    joined.push_str(value);
                }
                return Some(HeaderMatch {
                    kind: *kind,
                    value: joined,
                    verb_prefix,
                });
            }
        }
    }

    None
}

/// Sum `"<N> hour(s)"` and `"<N> min(s)"` parts into whole minutes.
/// A bare number counts as minutes.
pub fn parse_duration_minutes(text: &str) -> Option<u32> {
    let text = text.trim();
    let mut total = 0.0;
    let mut found = false;

    for caps in DURATION_PART.captures_iter(text) {
        let Some(amount) = parse_quantity(&caps[1]) else {
            continue;
        };
        let unit = caps[2].to_lowercase();
        total += if unit.starts_with('h') {
            amount * 60.0
        } else {
            amount
        };
        found = true;
    }

    if !found {
        let amount = parse_quantity(text)?;
        total = amount;
    }

    if total.is_finite() && total >= 0.0 {
        Some(total.round() as u32)
    } else {
        None
    }
}

/// Read a yield such as `"4"`, `"12 cookies"` or `"4-6 people"`.
/// Ranges keep their lower bound.
pub fn parse_yield(text: &str) -> Option<(f64, Option<String>)> {
    let (quantity, rest) = split_leading_quantity(text.trim())?;
    if !quantity.is_finite() || quantity <= 0.0 {
        return None;
    }
    let rest = RANGE_TAIL.replace(rest, "");
    let unit = rest.trim();
    let unit = if unit.is_empty() {
        None
    } else {
        Some(unit.to_string())
    };
    Some((quantity, unit))
}

pub fn is_numbered_step(line: &str) -> bool {
    NUMBERED_STEP.is_match(line.trim())
}

/// Drop `"1."`, `"2)"` or `"Step 3:"` from the front of an instruction
pub fn strip_step_number(line: &str) -> &str {
    let trimmed = line.trim();
    match NUMBERED_STEP.find(trimmed) {
        Some(m) => trimmed[m.end()..].trim(),
        None => trimmed,
    }
}

fn starts_with_number(text: &str) -> bool {
    text.chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || "½⅓⅔¼¾⅛⅜⅝⅞".contains(c))
}

fn starts_with_bullet(line: &str) -> bool {
    let mut chars = line.chars();
    matches!(chars.next(), Some('-' | '*' | '•' | '·'))
        && chars.next().is_some_and(char::is_whitespace)
}

/// Ingredient-shaped: starts with a digit (but is not a numbered step), a
/// fraction glyph, an indefinite article, or mentions "to taste"/"as needed"
pub fn looks_like_ingredient(line: &str) -> bool {
    let line = crate::ingredient::strip_bullet(line);
    let lower = line.to_lowercase();
    let first = line.chars().next();

    let numeric_start = first.is_some_and(|c| c.is_ascii_digit()) && !is_numbered_step(line);
    let glyph_start = first.is_some_and(|c| "½⅓⅔¼¾⅛⅜⅝⅞".contains(c));
    let article_start = lower.starts_with("a ") || lower.starts_with("an ");
    let loose_amount = lower.contains("to taste") || lower.contains("as needed");

    numeric_start || glyph_start || article_start || loose_amount
}

/// Instruction-shaped: numbered step, bullet, imperative followed by "the",
/// or a sequencing word such as "first" or "finally"
pub fn looks_like_instruction(line: &str) -> bool {
    let line = line.trim();
    if is_numbered_step(line) || starts_with_bullet(line) || IMPERATIVE_THE.is_match(line) {
        return true;
    }
    let first_word = line
        .split_whitespace()
        .next()
        .map(|w| {
            w.trim_end_matches([',', ':', '.'])
                .to_lowercase()
        })
        .unwrap_or_default();
    SEQUENCE_WORDS.contains(&first_word.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_shapes() {
        assert!(is_header_shaped("INGREDIENTS"));
        assert!(is_header_shaped("INGREDIENTS:"));
        assert!(is_header_shaped("## Method"));
        assert!(is_header_shaped("For the Sauce:"));
        assert!(is_header_shaped("1. INGREDIENTS"));
        assert!(!is_header_shaped("2 cups flour"));
        assert!(!is_header_shaped("mix well:"));
        assert!(!is_header_shaped("Whisk the eggs until fluffy"));
    }

    #[test]
    fn test_classify_section_synonyms() {
        assert_eq!(
            classify_header("Directions:").unwrap().kind,
            HeaderKind::Instructions
        );
        assert_eq!(
            classify_header("# What You Need").unwrap().kind,
            HeaderKind::Ingredients
        );
        assert_eq!(
            classify_header("1. INGREDIENTS").unwrap().kind,
            HeaderKind::Ingredients
        );
        assert_eq!(
            classify_header("Chef's Notes").unwrap().kind,
            HeaderKind::Notes
        );
        assert!(classify_header("Chocolate Cake").is_none());
    }

    #[test]
    fn test_classify_value_headers() {
        let header = classify_header("PREP TIME: 15 MINUTES").unwrap();
        assert_eq!(header.kind, HeaderKind::PrepTime);
        assert_eq!(header.value, "15 MINUTES");

        let header = classify_header("Serves 4").unwrap();
        assert_eq!(header.kind, HeaderKind::Yield);
        assert_eq!(header.value, "4");

        assert!(classify_header("Cook the pasta for 10 minutes").is_none());
        assert!(classify_header("Makes a great snack").is_none());

        let header = classify_header("Preparation").unwrap();
        assert_eq!(header.kind, HeaderKind::Instructions);

        let header = classify_header("Cook Time:").unwrap();
        assert_eq!(header.kind, HeaderKind::CookTime);
        assert!(header.value.is_empty());
    }

    #[test]
    fn test_verb_synonyms_need_header_shape() {
        assert!(classify_header("Cook 15 minutes until tender").is_none());
        assert!(classify_header("Cook 5 Minute Noodles").is_none());
        assert!(classify_header("Prep 2 onions first").is_none());

        let header = classify_header("PREP 10 MIN").unwrap();
        assert_eq!(header.kind, HeaderKind::PrepTime);
        assert_eq!(header.value, "10 MIN");
        assert!(header.verb_prefix);

        let header = classify_header("Cook: 20 minutes").unwrap();
        assert_eq!(header.kind, HeaderKind::CookTime);
        assert!(!header.verb_prefix);
    }

    #[test]
    fn test_duration_minutes() {
        assert_eq!(parse_duration_minutes("1 hour 15 minutes"), Some(75));
        assert_eq!(parse_duration_minutes("45 mins"), Some(45));
        assert_eq!(parse_duration_minutes("2 hrs"), Some(120));
        assert_eq!(parse_duration_minutes("1 1/2 hours"), Some(90));
        assert_eq!(parse_duration_minutes("20"), Some(20));
        assert_eq!(parse_duration_minutes("overnight"), None);
    }

    #[test]
    fn test_yield() {
        assert_eq!(parse_yield("4"), Some((4.0, None)));
        assert_eq!(
            parse_yield("12 cookies"),
            Some((12.0, Some("cookies".to_string())))
        );
        assert_eq!(
            parse_yield("4-6 people"),
            Some((4.0, Some("people".to_string())))
        );
        assert_eq!(parse_yield("a crowd"), None);
    }

    #[test]
    fn test_line_shapes() {
        assert!(looks_like_ingredient("2 cups flour"));
        assert!(looks_like_ingredient("1.5 kg potatoes"));
        assert!(looks_like_ingredient("½ lemon"));
        assert!(looks_like_ingredient("a pinch of salt"));
        assert!(looks_like_ingredient("Pepper to taste"));
        assert!(looks_like_ingredient("- 3 eggs"));
        assert!(!looks_like_ingredient("1. Mix everything"));

        assert!(looks_like_instruction("1. Mix everything"));
        assert!(looks_like_instruction("Step 2: Bake"));
        assert!(looks_like_instruction("- stir often"));
        assert!(looks_like_instruction("Preheat the oven to 180C"));
        assert!(looks_like_instruction("Finally, serve warm"));
        assert!(!looks_like_instruction("A lovely weeknight dinner"));
    }

    #[test]
    fn test_strip_step_number() {
        assert_eq!(strip_step_number("1. Mix"), "Mix");
        assert_eq!(strip_step_number("2) Bake"), "Bake");
        assert_eq!(strip_step_number("Step 3: Serve"), "Serve");
        assert_eq!(strip_step_number("Serve"), "Serve");
    }
}

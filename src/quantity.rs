//! Quantity lexing: turns tokens such as `"1 1/2"`, `"3/4"`, `"0.25"` or `"1½"`
//! into decimals, and renders decimals back into kitchen notation.

use once_cell::sync::Lazy;
use regex::Regex;

const GLYPHS: &str = "½⅓⅔¼¾⅛⅜⅝⅞⅕⅖⅗⅘⅙⅚";

static MIXED_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)\s+(\d+)\s*/\s*(\d+)$").expect("mixed number pattern should be valid")
});

static FRACTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\s*/\s*(\d+)$").expect("fraction pattern should be valid"));

static DECIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+(?:[.,]\d+)?|[.,]\d+)$").expect("decimal pattern should be valid")
});

static GLYPH_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^(\d*)\s*([{}])$", GLYPHS)).expect("glyph pattern should be valid")
});

/// Leading quantity of a line, longest shapes first so `"1 1/2 cups"` is not
/// read as `1`.
static LEADING_QUANTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^\s*(\d+\s+\d+\s*/\s*\d+|\d*\s*[{g}]|\d+\s*/\s*\d+|\d+(?:[.,]\d+)?|[.,]\d+)(.*)$",
        g = GLYPHS
    ))
    .expect("leading quantity pattern should be valid")
});

fn glyph_value(glyph: char) -> Option<f64> {
    let value = match glyph {
        '½' => 1.0 / 2.0,
        '⅓' => 1.0 / 3.0,
        '⅔' => 2.0 / 3.0,
        '¼' => 1.0 / 4.0,
        '¾' => 3.0 / 4.0,
        '⅛' => 1.0 / 8.0,
        '⅜' => 3.0 / 8.0,
        '⅝' => 5.0 / 8.0,
        '⅞' => 7.0 / 8.0,
        '⅕' => 1.0 / 5.0,
        '⅖' => 2.0 / 5.0,
        '⅗' => 3.0 / 5.0,
        '⅘' => 4.0 / 5.0,
        '⅙' => 1.0 / 6.0,
        '⅚' => 5.0 / 6.0,
        _ => return None,
    };
    Some(value)
}

fn divide(numerator: &str, denominator: &str) -> Option<f64> {
    let n: f64 = numerator.parse().ok()?;
    let d: f64 = denominator.parse().ok()?;
    if d == 0.0 {
        return None;
    }
    Some(n / d)
}

/// Parse a single quantity token.
///
/// Tries, in order: mixed number (`"2 1/4"`), vulgar fraction (`"3/4"`), then
/// decimal or integer (`"1.5"`, `"1,5"`, `"2"`). Unicode fraction glyphs are
/// accepted alone or after a whole number. Returns `None` for anything else,
/// including zero denominators.
pub fn parse_quantity(token: &str) -> Option<f64> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    if let Some(caps) = MIXED_NUMBER.captures(token) {
        let whole: f64 = caps[1].parse().ok()?;
        let numerator: f64 = caps[2].parse().ok()?;
        let denominator: f64 = caps[3].parse().ok()?;
        // Only a proper fraction makes a mixed number
        if denominator == 0.0 || numerator >= denominator {
            return None;
        }
        return Some(whole + numerator / denominator);
    }

    if let Some(caps) = FRACTION.captures(token) {
        return divide(&caps[1], &caps[2]);
    }

    if DECIMAL.is_match(token) {
        return token.replace(',', ".").parse().ok();
    }

    if let Some(caps) = GLYPH_NUMBER.captures(token) {
        let whole: f64 = if caps[1].is_empty() {
            0.0
        } else {
            caps[1].parse().ok()?
        };
        let fraction = caps[2].chars().next().and_then(glyph_value)?;
        return Some(whole + fraction);
    }

    None
}

/// Split a leading quantity off the front of `text`.
///
/// Returns the parsed value and the untrimmed remainder, or `None` when the
/// text does not start with a number.
pub fn split_leading_quantity(text: &str) -> Option<(f64, &str)> {
    let caps = LEADING_QUANTITY.captures(text)?;
    let token = caps.get(1)?;
    let value = parse_quantity(token.as_str()).or_else(|| {
        // "1 3/2" is not a mixed number; fall back to its first token
        token
            .as_str()
            .split_whitespace()
            .next()
            .and_then(parse_quantity)
    })?;
    let rest = if value_consumed_whole_token(token.as_str(), value) {
        caps.get(2).map(|m| m.as_str()).unwrap_or("")
    } else {
        let first = token.as_str().split_whitespace().next().unwrap_or("");
        let offset = text.find(first).unwrap_or(0) + first.len();
        &text[offset..]
    };
    Some((value, rest))
}

fn value_consumed_whole_token(token: &str, value: f64) -> bool {
    parse_quantity(token).is_some_and(|parsed| parsed == value)
}

/// Culinary fractions shown as text; the rounding tables live with the scaling engine
const DISPLAY_FRACTIONS: &[(f64, &str)] = &[
    (1.0 / 8.0, "1/8"),
    (1.0 / 4.0, "1/4"),
    (1.0 / 3.0, "1/3"),
    (1.0 / 2.0, "1/2"),
    (2.0 / 3.0, "2/3"),
    (3.0 / 4.0, "3/4"),
];

/// Render a quantity the way a cook would write it: `2`, `1 1/2`, `2/3`, or
/// at most two decimals when no common fraction fits.
pub fn format_quantity(value: f64) -> String {
    let whole = value.trunc();
    let fraction = value - whole;

    if fraction.abs() < 0.01 {
        return format!("{}", whole as i64);
    }
    if (1.0 - fraction).abs() < 0.01 {
        return format!("{}", whole as i64 + 1);
    }

    if let Some((_, text)) = DISPLAY_FRACTIONS
        .iter()
        .find(|(f, _)| (fraction - f).abs() < 0.01)
    {
        return if whole >= 1.0 {
            format!("{} {}", whole as i64, text)
        } else {
            text.to_string()
        };
    }

    format_decimal(value)
}

/// Two decimals with trailing zeros trimmed: `1.19`, `1.4`, `3`
pub fn format_decimal(value: f64) -> String {
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_number() {
        assert_eq!(parse_quantity("1 1/2"), Some(1.5));
        assert_eq!(parse_quantity("2 3/4"), Some(2.75));
    }

    #[test]
    fn test_parse_fraction_and_decimal() {
        assert_eq!(parse_quantity("3/4"), Some(0.75));
        assert_eq!(parse_quantity("2"), Some(2.0));
        assert_eq!(parse_quantity("0.25"), Some(0.25));
        assert_eq!(parse_quantity("1,5"), Some(1.5));
        assert_eq!(parse_quantity(".5"), Some(0.5));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert_eq!(parse_quantity("abc"), None);
        assert_eq!(parse_quantity(""), None);
        assert_eq!(parse_quantity("1/0"), None);
        assert_eq!(parse_quantity("2 1/0"), None);
        assert_eq!(parse_quantity("1 3/2"), None);
    }

    #[test]
    fn test_parse_unicode_glyphs() {
        assert_eq!(parse_quantity("½"), Some(0.5));
        assert_eq!(parse_quantity("1½"), Some(1.5));
        assert_eq!(parse_quantity("2 ¼"), Some(2.25));
    }

    #[test]
    fn test_split_leading_quantity() {
        let (value, rest) = split_leading_quantity("1 1/2 cups flour").unwrap();
        assert_eq!(value, 1.5);
        assert_eq!(rest.trim(), "cups flour");

        let (value, rest) = split_leading_quantity("200g butter").unwrap();
        assert_eq!(value, 200.0);
        assert_eq!(rest, "g butter");

        let (value, rest) = split_leading_quantity("½ tsp salt").unwrap();
        assert_eq!(value, 0.5);
        assert_eq!(rest.trim(), "tsp salt");

        assert!(split_leading_quantity("salt to taste").is_none());
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(2.0), "2");
        assert_eq!(format_quantity(1.5), "1 1/2");
        assert_eq!(format_quantity(2.0 / 3.0), "2/3");
        assert_eq!(format_quantity(1.19), "1.19");
        assert_eq!(format_quantity(0.999), "1");
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(1.4), "1.4");
        assert_eq!(format_decimal(1.1875), "1.19");
        assert_eq!(format_decimal(3.0), "3");
    }
}

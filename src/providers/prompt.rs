/// System prompt for turning free-form recipe text into recipe JSON.
///
/// The prompt is loaded from `parse_prompt.txt` at compile time using the
/// `include_str!` macro, making it easy to edit without dealing with
/// Rust string syntax.
pub const RECIPE_PARSER_PROMPT: &str = include_str!("parse_prompt.txt");

/// System prompt for rescaling a recipe that is already structured
pub const RECIPE_SCALER_PROMPT: &str = include_str!("scale_prompt.txt");

/// Build the user message for a scaling request
pub fn build_scale_prompt(recipe_json: &str, factor: f64) -> String {
    format!(
        "Scale this JSON recipe by a factor of {}.\n\n{}",
        factor, recipe_json
    )
}

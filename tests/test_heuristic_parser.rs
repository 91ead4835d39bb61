mod common;

use common::PANCAKES_TEXT;
use recipe_pipeline::model::{PLACEHOLDER_INGREDIENT, PLACEHOLDER_INSTRUCTION};
use recipe_pipeline::{parse_recipe, ParseOptions, RecipeParser};

#[test]
fn test_title_ingredient_step() {
    let recipe = parse_recipe("Lemonade\n4 lemons\n1. Squeeze the lemons");

    assert_eq!(recipe.name, "Lemonade");
    assert_eq!(recipe.ingredients.len(), 1);
    assert_eq!(recipe.instructions.len(), 1);
    assert_eq!(recipe.instructions[0], "Squeeze the lemons");
}

#[test]
fn test_full_recipe_with_headers() {
    let recipe = parse_recipe(PANCAKES_TEXT);

    assert_eq!(recipe.name, "Pancakes");
    assert_eq!(recipe.yield_quantity, Some(4.0));
    let names: Vec<&str> = recipe.ingredients.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["2 cups flour", "3 eggs", "1 1/2 cups milk"]);
    assert_eq!(recipe.instructions.len(), 3);
    assert_eq!(recipe.instructions[2], "Fry in a hot pan");
}

#[test]
fn test_heuristic_ingredients_are_free_text() {
    let recipe = parse_recipe(PANCAKES_TEXT);
    for ingredient in &recipe.ingredients {
        assert_eq!(ingredient.quantity, 1.0);
        assert_eq!(ingredient.unit, "piece");
        assert!(ingredient.notes.is_none());
    }
}

#[test]
fn test_bulleted_sections_and_timing() {
    let text = "Garlic Bread\n\
        Prep Time: 10 minutes\n\
        Cook Time: 1 hr 5 mins\n\
        Ingredients:\n\
        • 1 baguette\n\
        * 4 cloves garlic\n\
        Directions:\n\
        - Slice the baguette\n\
        Step 2: Spread the butter";
    let recipe = parse_recipe(text);

    assert_eq!(recipe.prep_time_minutes, Some(10));
    assert_eq!(recipe.cook_time_minutes, Some(65));
    assert_eq!(recipe.ingredients[0].name, "1 baguette");
    assert_eq!(recipe.ingredients[1].name, "4 cloves garlic");
    assert_eq!(
        recipe.instructions,
        vec!["Slice the baguette".to_string(), "Spread the butter".to_string()]
    );
}

#[test]
fn test_nothing_recognizable_gets_placeholders() {
    let recipe = parse_recipe("Just a note to myself");

    assert_eq!(recipe.name, "Just a note to myself");
    assert_eq!(recipe.ingredients[0].name, PLACEHOLDER_INGREDIENT);
    assert_eq!(recipe.instructions[0], PLACEHOLDER_INSTRUCTION);
}

#[tokio::test]
async fn test_facade_without_ai_uses_heuristics() {
    let parser = RecipeParser::heuristic_only();
    let recipe = parser.parse(PANCAKES_TEXT, ParseOptions::default()).await.unwrap();
    assert_eq!(recipe, parse_recipe(PANCAKES_TEXT));
}

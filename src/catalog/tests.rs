use super::types::{RawRecipe, Recipe, SearchResponse};

fn parse_recipe(json: serde_json::Value) -> Recipe {
    let raw: RawRecipe = serde_json::from_value(json).expect("raw recipe should parse");
    Recipe::from(raw)
}

#[test]
fn test_full_result_maps_every_field() {
    let recipe = parse_recipe(serde_json::json!({
        "title": "Pasta Primavera",
        "extendedIngredients": [
            {"original": "200g penne"},
            {"original": "1 zucchini, sliced"}
        ],
        "analyzedInstructions": [
            {"steps": [
                {"step": "Boil the penne."},
                {"step": "Toss with vegetables."}
            ]}
        ],
        "readyInMinutes": 30,
        "servings": 4,
        "sourceUrl": "https://example.com/pasta"
    }));

    assert_eq!(recipe.name, "Pasta Primavera");
    assert_eq!(recipe.ingredients, vec!["200g penne", "1 zucchini, sliced"]);
    assert_eq!(
        recipe.steps,
        vec!["Boil the penne.", "Toss with vegetables."]
    );
    assert_eq!(recipe.ready_in_minutes, 30);
    assert_eq!(recipe.servings, 4);
    assert_eq!(recipe.source_url, "https://example.com/pasta");
}

#[test]
fn test_missing_instruction_groups_fall_back_to_raw_text() {
    let recipe = parse_recipe(serde_json::json!({
        "title": "Toast",
        "instructions": "Slice bread.\nToast it.\n\nButter generously."
    }));

    assert_eq!(
        recipe.steps,
        vec!["Slice bread.", "Toast it.", "Butter generously."]
    );
}

#[test]
fn test_absent_fields_take_defaults() {
    let recipe = parse_recipe(serde_json::json!({
        "title": "Mystery Dish"
    }));

    assert!(recipe.ingredients.is_empty());
    assert!(recipe.steps.is_empty());
    assert_eq!(recipe.ready_in_minutes, 0);
    assert_eq!(recipe.servings, 0);
    assert_eq!(recipe.source_url, "");
}

#[test]
fn test_first_instruction_group_wins() {
    let recipe = parse_recipe(serde_json::json!({
        "title": "Layered",
        "analyzedInstructions": [
            {"steps": [{"step": "First group."}]},
            {"steps": [{"step": "Ignored group."}]}
        ],
        "instructions": "Also ignored."
    }));

    assert_eq!(recipe.steps, vec!["First group."]);
}

#[test]
fn test_response_without_results_key() {
    let response: SearchResponse = serde_json::from_value(serde_json::json!({})).unwrap();
    assert!(response.results.is_empty());
}

#[test]
fn test_response_with_results() {
    let response: SearchResponse = serde_json::from_value(serde_json::json!({
        "results": [{"title": "One"}, {"title": "Two"}]
    }))
    .unwrap();
    assert_eq!(response.results.len(), 2);
}

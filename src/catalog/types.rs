//! Domain and wire types for the recipe catalog.

use serde::{Deserialize, Serialize};

/// A recipe as the rest of the pipeline sees it. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub ready_in_minutes: u32,
    pub servings: u32,
    pub source_url: String,
}

/// Top-level catalog search response.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub results: Vec<RawRecipe>,
}

/// One raw catalog result. Everything is optional upstream, so every field
/// defaults.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawRecipe {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub extended_ingredients: Vec<RawIngredient>,
    #[serde(default)]
    pub analyzed_instructions: Vec<RawInstructionGroup>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub ready_in_minutes: u32,
    #[serde(default)]
    pub servings: u32,
    #[serde(default)]
    pub source_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawIngredient {
    #[serde(default)]
    pub original: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawInstructionGroup {
    #[serde(default)]
    pub steps: Vec<RawStep>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawStep {
    #[serde(default)]
    pub step: String,
}

impl From<RawRecipe> for Recipe {
    fn from(raw: RawRecipe) -> Self {
        let steps = if let Some(group) = raw.analyzed_instructions.into_iter().next() {
            group.steps.into_iter().map(|s| s.step).collect()
        } else {
            raw.instructions
                .unwrap_or_default()
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()
        };

        Self {
            name: raw.title,
            ingredients: raw
                .extended_ingredients
                .into_iter()
                .map(|i| i.original)
                .collect(),
            steps,
            ready_in_minutes: raw.ready_in_minutes,
            servings: raw.servings,
            source_url: raw.source_url,
        }
    }
}

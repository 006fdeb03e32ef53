//! Scripted recipe source for tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{CatalogError, Recipe, RecipeSource};

/// Replays queued responses in order and records every derived query it was
/// asked for. Once the queue runs dry it answers with empty result sets.
#[derive(Default)]
pub struct MockRecipeSource {
    responses: Mutex<VecDeque<Result<Vec<Recipe>, CatalogError>>>,
    seen_queries: Mutex<Vec<String>>,
}

impl MockRecipeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, response: Result<Vec<Recipe>, CatalogError>) {
        self.responses.lock().push_back(response);
    }

    /// Derived queries observed so far, in call order.
    pub fn seen_queries(&self) -> Vec<String> {
        self.seen_queries.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.seen_queries.lock().len()
    }
}

#[async_trait]
impl RecipeSource for MockRecipeSource {
    async fn search(
        &self,
        _original_query: &str,
        derived_query: &str,
        _desired_count: usize,
    ) -> Result<Vec<Recipe>, CatalogError> {
        self.seen_queries.lock().push(derived_query.to_string());
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Builds a minimal recipe for tests.
pub fn sample_recipe(name: &str, ingredients: &[&str]) -> Recipe {
    Recipe {
        name: name.to_string(),
        ingredients: ingredients.iter().map(|i| (*i).to_string()).collect(),
        steps: vec!["Combine everything.".to_string(), "Serve.".to_string()],
        ready_in_minutes: 25,
        servings: 2,
        source_url: format!("https://example.com/{}", name.replace(' ', "-")),
    }
}

//! Query analysis: keywords, the derived search string, and exclusions.
//!
//! The analyzer is purely rule-based; the optional LLM path in [`crate::llm`]
//! produces the same [`AnalyzedQuery`] shape, and the orchestrator decides
//! which of the two runs.

pub mod classifier;
pub(crate) mod vocab;


pub use classifier::{FoodRelevanceClassifier, RelevanceCheck};

#[cfg(any(test, feature = "mock"))]
pub use classifier::MockRelevance;

use std::collections::BTreeSet;

use tracing::debug;

use crate::llm::UnderstoodQuery;
use vocab::{
    ALLERGEN_BASES, HEALTH_EXCLUSION_PHRASES, HEALTH_TERMS, NEGATORS, STOP_WORDS, expand_allergens,
};

/// Structured view of a raw query, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedQuery {
    /// Food-related keywords in first-occurrence order.
    pub keywords: Vec<String>,
    /// The string sent to the catalog: joined keywords, or the trimmed
    /// lowercased query when no keyword survived.
    pub search_query: String,
    /// Excluded ingredients, deduplicated and allergen-expanded. Advisory:
    /// recorded and surfaced, not filtered from results.
    pub exclusions: BTreeSet<String>,
    /// Dietary tags (only populated by the LLM path).
    pub dietary_tags: Vec<String>,
    /// Cuisine type, when one was identified.
    pub cuisine: Option<String>,
    /// Meal type, when one was identified.
    pub meal_type: Option<String>,
}

impl AnalyzedQuery {
    /// Builds an analysis from the LLM's structured output.
    pub fn from_understood(query: &str, understood: UnderstoodQuery) -> Self {
        let keywords: Vec<String> = understood
            .keywords
            .into_iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        let search_query = if keywords.is_empty() {
            query.trim().to_lowercase()
        } else {
            keywords.join(" ")
        };

        let exclusions = expand_allergens(
            understood
                .excluded_ingredients
                .into_iter()
                .map(|e| e.trim().to_lowercase())
                .filter(|e| !e.is_empty()),
        );

        Self {
            keywords,
            search_query,
            exclusions,
            dietary_tags: understood.dietary_preferences,
            cuisine: non_empty(understood.cuisine_type),
            meal_type: non_empty(understood.meal_type),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Rule-based keyword and exclusion extraction.
pub struct QueryAnalyzer<C: RelevanceCheck> {
    classifier: C,
}

impl<C: RelevanceCheck> QueryAnalyzer<C> {
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    /// Derives keywords, the search string, and exclusions from raw text.
    pub fn analyze(&self, query: &str) -> AnalyzedQuery {
        let lowered = query.trim().to_lowercase();
        let tokens: Vec<String> = lowered
            .split_whitespace()
            .map(normalize_token)
            .filter(|t| !t.is_empty())
            .collect();

        let keywords = self.extract_keywords(&lowered, &tokens);
        let search_query = if keywords.is_empty() {
            lowered.clone()
        } else {
            keywords.join(" ")
        };

        let exclusions = self.extract_exclusions(&lowered, &tokens);

        debug!(
            query = %lowered,
            keywords = ?keywords,
            search = %search_query,
            exclusions = ?exclusions,
            "query analyzed"
        );

        AnalyzedQuery {
            keywords,
            search_query,
            exclusions,
            dietary_tags: Vec::new(),
            cuisine: None,
            meal_type: None,
        }
    }

    fn extract_keywords(&self, lowered: &str, tokens: &[String]) -> Vec<String> {
        let mut keywords: Vec<String> = Vec::new();

        for token in tokens {
            if token.len() <= 2 || STOP_WORDS.contains(&token.as_str()) {
                continue;
            }
            if keywords.iter().any(|k| k == token) {
                continue;
            }
            if self.classifier.is_food_related(token) {
                keywords.push(token.clone());
            }
        }

        if HEALTH_TERMS.iter().any(|term| lowered.contains(term))
            && !keywords.iter().any(|k| k == "healthy")
        {
            keywords.push("healthy".to_string());
        }

        keywords
    }

    fn extract_exclusions(&self, lowered: &str, tokens: &[String]) -> BTreeSet<String> {
        let mut collected: Vec<String> = Vec::new();

        // "allergic to X", "can't eat X": take the word right after the
        // phrase, if the classifier recognizes it.
        for phrase in HEALTH_EXCLUSION_PHRASES {
            if let Some(position) = lowered.find(phrase) {
                let rest = &lowered[position + phrase.len()..];
                if let Some(next) = rest.split_whitespace().next() {
                    let next = normalize_token(next);
                    if !next.is_empty() && self.classifier.is_food_related(&next) {
                        collected.push(next);
                    }
                }
            }
        }

        // "dairy-free", "gluten-free", ...
        for token in tokens {
            if let Some(base) = token.strip_suffix("-free") {
                if ALLERGEN_BASES.contains(&base) {
                    collected.push(base.to_string());
                }
            }
        }

        // "no X", "without X", ...
        for pair in tokens.windows(2) {
            if NEGATORS.contains(&pair[0].as_str()) && self.classifier.is_food_related(&pair[1]) {
                collected.push(pair[1].clone());
            }
        }

        expand_allergens(collected)
    }
}

/// Strips punctuation from a token, retaining internal hyphens.
fn normalize_token(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect();
    kept.trim_matches('-').to_string()
}

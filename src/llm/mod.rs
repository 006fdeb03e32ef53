//! Optional LLM-assisted query understanding.
//!
//! Both operations here are best-effort: guardrail violations, an unavailable
//! provider, malformed JSON, missing keys, and flagged output all collapse to
//! `None`. The caller always has the rule-based analyzer to fall back on, so
//! nothing in this module is allowed to fail a request.

pub mod provider;


pub use provider::{LlmBackend, LlmError};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::guardrail::GuardrailValidator;

const UNDERSTAND_SYSTEM_PROMPT: &str = r#"You are a food and recipe understanding assistant. Extract structured information from user queries.

Output ONLY valid JSON with this exact format:
{
  "keywords": ["list", "of", "food", "keywords"],
  "excluded_ingredients": ["ingredients", "to", "exclude"],
  "dietary_preferences": ["vegan", "gluten-free", etc],
  "cuisine_type": "italian/mexican/asian/etc or empty string",
  "meal_type": "breakfast/lunch/dinner/snack or empty string"
}

Rules:
- Only extract food-related keywords
- Detect exclusions from phrases like "no dairy", "without eggs", "I'm allergic to nuts"
- Identify dietary preferences
- Return empty arrays if nothing found
- Keep it concise"#;

const EXCLUSIONS_SYSTEM_PROMPT: &str = r#"You are a dietary restriction and allergen detection assistant.

Extract ingredients that should be EXCLUDED from recipes based on the user's query.

Output ONLY valid JSON array format:
["ingredient1", "ingredient2", "ingredient3"]

Detect exclusions from:
- "no X", "without X", "exclude X"
- "allergic to X", "intolerant to X"
- "can't eat X", "cannot have X"
- "X-free" (dairy-free, gluten-free, etc)
- Health conditions implying exclusions

Expand common allergens:
- "dairy" includes: milk, cheese, butter, cream, yogurt
- "gluten" includes: wheat, barley, rye
- "nuts" includes: peanuts, almonds, cashews, walnuts

Return empty array [] if no exclusions found."#;

/// Signals that the model refused or produced flagged content.
const REFUSAL_INDICATORS: &[&str] = &[
    "sorry, i cannot",
    "i cannot help",
    "inappropriate",
    "offensive",
    "harmful",
    "illegal",
    "unethical",
];

/// Structured extraction result. Every key is required: a response missing
/// any of the five fails deserialization and is discarded.
#[derive(Debug, Clone, Deserialize)]
pub struct UnderstoodQuery {
    pub keywords: Vec<String>,
    pub excluded_ingredients: Vec<String>,
    pub dietary_preferences: Vec<String>,
    pub cuisine_type: String,
    pub meal_type: String,
}

/// LLM-assisted understanding, gated by its own (wider) rate window.
pub struct QueryUnderstanding {
    backend: LlmBackend,
    guardrails: GuardrailValidator,
}

impl QueryUnderstanding {
    pub fn new(backend: LlmBackend, guardrails: GuardrailValidator) -> Self {
        Self {
            backend,
            guardrails,
        }
    }

    /// Whether the backend is worth calling at all.
    pub fn is_enabled(&self) -> bool {
        self.backend.is_available()
    }

    /// Extracts structured information from a query, or `None` on any failure.
    pub async fn understand(&self, query: &str, caller_id: &str) -> Option<UnderstoodQuery> {
        if let Err(violation) = self.guardrails.validate(query, caller_id) {
            warn!(%violation, "guardrail violation before LLM call");
            return None;
        }

        if !self.backend.is_available() {
            debug!("LLM not available, skipping query understanding");
            return None;
        }

        let user_prompt = format!("Extract information from this food query: '{query}'");
        let response = match self
            .backend
            .call(UNDERSTAND_SYSTEM_PROMPT, &user_prompt, 0.2, 300)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "LLM query understanding failed");
                return None;
            }
        };

        if !output_is_safe(&response) {
            warn!("LLM response flagged by output safety scan");
            return None;
        }

        match serde_json::from_str::<UnderstoodQuery>(response.trim()) {
            Ok(parsed) => {
                info!(
                    keywords = parsed.keywords.len(),
                    exclusions = parsed.excluded_ingredients.len(),
                    "query understanding successful"
                );
                Some(parsed)
            }
            Err(e) => {
                warn!(error = %e, "failed to parse LLM understanding response");
                None
            }
        }
    }

    /// Extracts a lowercased exclusion list from a query, or `None` on any
    /// failure.
    pub async fn extract_exclusions(&self, query: &str, caller_id: &str) -> Option<Vec<String>> {
        if let Err(violation) = self.guardrails.validate(query, caller_id) {
            warn!(%violation, "guardrail violation before LLM exclusion call");
            return None;
        }

        if !self.backend.is_available() {
            debug!("LLM not available, skipping ingredient extraction");
            return None;
        }

        let user_prompt = format!("What ingredients should be excluded from this query: '{query}'");
        let response = match self
            .backend
            .call(EXCLUSIONS_SYSTEM_PROMPT, &user_prompt, 0.1, 200)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "LLM ingredient extraction failed");
                return None;
            }
        };

        if !output_is_safe(&response) {
            warn!("LLM exclusion response flagged by output safety scan");
            return None;
        }

        match serde_json::from_str::<Vec<String>>(response.trim()) {
            Ok(excluded) => {
                let excluded: Vec<String> = excluded
                    .into_iter()
                    .map(|item| item.trim().to_lowercase())
                    .filter(|item| !item.is_empty())
                    .collect();
                info!(count = excluded.len(), "extracted excluded ingredients");
                Some(excluded)
            }
            Err(e) => {
                warn!(error = %e, "failed to parse LLM exclusion response");
                None
            }
        }
    }
}

/// Rejects empty output and refusal/flagged-content indicators.
pub(crate) fn output_is_safe(response: &str) -> bool {
    if response.trim().is_empty() {
        return false;
    }

    let lowered = response.to_lowercase();
    for indicator in REFUSAL_INDICATORS {
        if lowered.contains(indicator) {
            warn!(indicator, "LLM refused or flagged content");
            return false;
        }
    }

    true
}

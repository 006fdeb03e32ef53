//! Pre-flight query guardrails.
//!
//! Every query passes through [`GuardrailValidator::validate`] before any
//! expensive work happens: length bounds, injection phrases, the food-domain
//! filter, and finally the caller's rate window. The first failing check wins
//! and the later checks never run, so rate bookkeeping only happens for
//! queries that survive the content checks.

mod error;
pub mod rate;


pub use error::Violation;
pub use rate::RateLimiter;

use tracing::warn;

use crate::constants::{MAX_QUERY_LEN, MIN_QUERY_LEN};

/// Phrases that try to override the assistant's instructions.
const INJECTION_PATTERNS: &[&str] = &[
    "ignore previous",
    "ignore all previous",
    "disregard previous",
    "forget previous",
    "new instructions",
    "system prompt",
    "you are now",
    "act as",
    "roleplay",
    "pretend you are",
];

/// Terms that mark a query as belonging to some other domain entirely.
const OFF_TOPIC_INDICATORS: &[&str] = &[
    "weather",
    "temperature",
    "forecast",
    "rain",
    "sunny",
    "math",
    "calculate",
    "solve",
    "equation",
    "problem",
    "poem",
    "story",
    "write",
    "essay",
    "article",
    "president",
    "politics",
    "government",
    "election",
    "stock",
    "market",
    "investment",
    "movie",
    "film",
    "song",
    "music",
    "game",
    "sports",
    "football",
    "basketball",
    "soccer",
];

const FOOD_DOMAIN_KEYWORDS: &[&str] = &[
    "recipe", "food", "cook", "ingredient", "meal", "dish", "eat", "bake", "cuisine", "flavor",
    "taste", "spice", "vegetable", "fruit", "meat", "protein", "grain", "dairy", "dessert",
    "breakfast", "lunch", "dinner", "snack", "healthy", "diet", "vegan", "vegetarian", "gluten",
    "chicken", "beef", "pork", "fish", "seafood", "pasta", "rice", "bread", "cheese", "egg",
    "milk", "butter", "oil", "sugar", "salt", "pepper", "tomato", "onion", "garlic", "potato",
    "carrot", "soup", "salad", "sauce", "pizza", "burger", "sandwich", "cake", "cookie", "pie",
];

/// Phrasings that read as a food request even without a food keyword.
const FOOD_REQUEST_PHRASES: &[&str] = &[
    "what can i",
    "i have",
    "i want",
    "show me",
    "find me",
    "looking for",
    "need a",
    "make with",
    "to cook",
];

/// Ordered pre-flight checks over a raw query.
pub struct GuardrailValidator {
    limiter: RateLimiter,
}

impl GuardrailValidator {
    pub fn new(limiter: RateLimiter) -> Self {
        Self { limiter }
    }

    /// Runs all checks in order; the first failing check wins.
    pub fn validate(&self, query: &str, caller_id: &str) -> Result<(), Violation> {
        let trimmed = query.trim();

        if trimmed.len() < MIN_QUERY_LEN {
            return Err(Violation::TooShort);
        }

        if trimmed.len() > MAX_QUERY_LEN {
            return Err(Violation::TooLong);
        }

        let lowered = trimmed.to_lowercase();

        for pattern in INJECTION_PATTERNS {
            if lowered.contains(pattern) {
                warn!(pattern, "potential injection attempt detected");
                return Err(Violation::InjectionDetected);
            }
        }

        if !is_food_domain(&lowered) {
            warn!(query = %trimmed, "off-topic query rejected");
            return Err(Violation::OffTopic);
        }

        if !self.limiter.allow(caller_id) {
            return Err(Violation::RateLimited);
        }

        Ok(())
    }

    /// The rate limiter backing check 5 (exposed for composition and tests).
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }
}

/// Returns whether a lowercased query belongs to the food domain.
///
/// Off-topic indicators reject immediately; otherwise a food keyword (as a
/// token or substring) or a canonical food-request phrase accepts; otherwise
/// the query is rejected.
pub(crate) fn is_food_domain(lowered: &str) -> bool {
    for indicator in OFF_TOPIC_INDICATORS {
        if lowered.contains(indicator) {
            return false;
        }
    }

    for word in lowered.split_whitespace() {
        if word.len() > 2 && FOOD_DOMAIN_KEYWORDS.contains(&word) {
            return true;
        }
    }

    for keyword in FOOD_DOMAIN_KEYWORDS {
        if lowered.contains(keyword) {
            return true;
        }
    }

    for phrase in FOOD_REQUEST_PHRASES {
        if lowered.contains(phrase) {
            return true;
        }
    }

    false
}

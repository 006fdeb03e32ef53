//! Ladle library crate (used by the server binary and integration tests).
//!
//! Ladle answers natural-language food queries with a ranked list of recipes.
//! The pipeline, in order:
//!
//! - [`GuardrailValidator`] rejects unsafe, off-topic, or over-quota queries
//!   before any expensive work.
//! - [`QueryAnalyzer`] distills the query into search keywords and excluded
//!   ingredients, with [`QueryUnderstanding`] as an optional LLM-assisted
//!   first attempt.
//! - [`CatalogClient`] fetches candidates from the external catalog under the
//!   [`QuotaTracker`] daily budget.
//! - [`SemanticRanker`] orders candidates by embedding similarity to the
//!   query; [`RecipeCache`] keeps the last successful set as the fallback
//!   tier.
//! - [`RetrievalOrchestrator`] composes all of the above into the single
//!   `retrieve` operation the HTTP and CLI front ends call.
//!
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod analyzer;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod guardrail;
pub mod llm;
pub mod ranking;
pub mod retrieval;
pub mod server;

pub use analyzer::{AnalyzedQuery, FoodRelevanceClassifier, QueryAnalyzer, RelevanceCheck};
#[cfg(any(test, feature = "mock"))]
pub use analyzer::MockRelevance;

pub use cache::{CachedSet, RecipeCache};
pub use catalog::{CatalogClient, CatalogError, QuotaTracker, Recipe, RecipeSource};
#[cfg(any(test, feature = "mock"))]
pub use catalog::MockRecipeSource;

pub use config::{Config, ConfigError, LlmProvider};
pub use embedding::{EmbedderConfig, EmbeddingError, TextEmbedder};
pub use guardrail::{GuardrailValidator, RateLimiter, Violation};
pub use llm::{LlmBackend, LlmError, QueryUnderstanding, UnderstoodQuery};
pub use ranking::{SemanticRanker, cosine_similarity};
pub use retrieval::{RetrievalOrchestrator, RetrievalOutcome};
pub use server::{AppState, create_router};

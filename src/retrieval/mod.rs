//! End-to-end retrieval composition.
//!
//! One operation, [`RetrievalOrchestrator::retrieve`], glues the pipeline
//! together: guardrails, analysis (LLM-first with rule-based fallback),
//! the catalog fetch, and the rank-or-fall-back-to-cache tail.

#[cfg(test)]
mod tests;

use tracing::{debug, info, warn};

use crate::analyzer::{AnalyzedQuery, QueryAnalyzer, RelevanceCheck};
use crate::cache::RecipeCache;
use crate::catalog::{CatalogError, Recipe, RecipeSource};
use crate::guardrail::{GuardrailValidator, Violation};
use crate::llm::QueryUnderstanding;
use crate::ranking::SemanticRanker;

/// The outcome of a retrieve call, as plain data. Rejections and quota
/// exhaustion are terminal; source failures never surface here because the
/// cache fallback absorbs them.
#[derive(Debug)]
pub enum RetrievalOutcome {
    /// Ranked recipes, possibly empty when neither the catalog nor the cache
    /// had anything to offer.
    Ranked(Vec<Recipe>),
    /// A guardrail check failed; no external work was done.
    Rejected(Violation),
    /// The daily catalog budget is spent. The cache is not consulted for
    /// this case.
    QuotaExhausted,
}

/// Composes the pipeline components into the single exposed operation.
pub struct RetrievalOrchestrator<S: RecipeSource, C: RelevanceCheck> {
    guardrails: GuardrailValidator,
    analyzer: QueryAnalyzer<C>,
    understanding: QueryUnderstanding,
    source: S,
    cache: RecipeCache,
    ranker: SemanticRanker,
}

impl<S: RecipeSource, C: RelevanceCheck> RetrievalOrchestrator<S, C> {
    pub fn new(
        guardrails: GuardrailValidator,
        analyzer: QueryAnalyzer<C>,
        understanding: QueryUnderstanding,
        source: S,
        cache: RecipeCache,
        ranker: SemanticRanker,
    ) -> Self {
        Self {
            guardrails,
            analyzer,
            understanding,
            source,
            cache,
            ranker,
        }
    }

    /// Resolves a query into at most `desired_count` ranked recipes.
    pub async fn retrieve(
        &self,
        query: &str,
        caller_id: &str,
        desired_count: usize,
    ) -> RetrievalOutcome {
        if let Err(violation) = self.guardrails.validate(query, caller_id) {
            info!(caller = caller_id, %violation, "query rejected");
            return RetrievalOutcome::Rejected(violation);
        }

        let analyzed = self.analyze(query, caller_id).await;
        debug!(
            search = %analyzed.search_query,
            exclusions = ?analyzed.exclusions,
            "derived search terms"
        );

        match self
            .source
            .search(query, &analyzed.search_query, desired_count)
            .await
        {
            Err(CatalogError::QuotaExceeded) => {
                warn!("daily catalog quota exhausted");
                RetrievalOutcome::QuotaExhausted
            }
            Err(CatalogError::SourceError { reason }) => {
                warn!(reason = %reason, "catalog unavailable, falling back to cache");
                self.rank_cached(query, desired_count)
            }
            Ok(recipes) if recipes.is_empty() => {
                debug!("catalog returned nothing, falling back to cache");
                self.rank_cached(query, desired_count)
            }
            Ok(recipes) => match self.cache.store(&recipes) {
                Ok(Some(set)) => RetrievalOutcome::Ranked(self.ranker.rank(
                    query,
                    &set.recipes,
                    &set.embeddings,
                    desired_count,
                )),
                Ok(None) => RetrievalOutcome::Ranked(Vec::new()),
                Err(e) => {
                    warn!(error = %e, "failed to embed fresh recipes, falling back to cache");
                    self.rank_cached(query, desired_count)
                }
            },
        }
    }

    /// Derives the structured query: LLM-first when a backend is configured,
    /// rule-based otherwise or on any LLM failure.
    pub async fn analyze(&self, query: &str, caller_id: &str) -> AnalyzedQuery {
        if self.understanding.is_enabled() {
            if let Some(understood) = self.understanding.understand(query, caller_id).await {
                debug!("using LLM-derived analysis");
                return AnalyzedQuery::from_understood(query, understood);
            }
            debug!("LLM analysis unavailable, using rule-based analyzer");
        }

        self.analyzer.analyze(query)
    }

    fn rank_cached(&self, query: &str, desired_count: usize) -> RetrievalOutcome {
        match self.cache.current() {
            Some(set) => {
                info!(cached = set.recipes.len(), "ranking against cached recipes");
                RetrievalOutcome::Ranked(self.ranker.rank(
                    query,
                    &set.recipes,
                    &set.embeddings,
                    desired_count,
                ))
            }
            None => RetrievalOutcome::Ranked(Vec::new()),
        }
    }
}
